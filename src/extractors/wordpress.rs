use super::WpPost;
use crate::model::{Recipe, PLACEHOLDER_IMAGE};
use log::{debug, warn};
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use std::sync::OnceLock;

// Only these entities are decoded in titles
const TITLE_ENTITIES: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&#8217;", "'"),
    ("&#8211;", "-"),
    ("&#8220;", "\""),
    ("&#8221;", "\""),
];

fn ingredient_regex() -> Option<&'static Regex> {
    static INGREDIENT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    INGREDIENT_REGEX
        .get_or_init(|| Regex::new(r"<li><span>([^<]+)</span></li>").ok())
        .as_ref()
}

fn instruction_regex() -> Option<&'static Regex> {
    static INSTRUCTION_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    INSTRUCTION_REGEX
        .get_or_init(|| Regex::new(r#"<div class="step-content">\s*<p>([^<]+)</p>"#).ok())
        .as_ref()
}

fn image_src_regex() -> Option<&'static Regex> {
    static IMAGE_SRC_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    IMAGE_SRC_REGEX
        .get_or_init(|| Regex::new(r#"src="([^"]+)""#).ok())
        .as_ref()
}

/// Decode the handful of entities WordPress puts in titles.
///
/// Replacement repeats until none of the entities remain, so `&amp;#8217;`
/// ends up as `'`.
pub fn decode_title(raw: &str) -> String {
    let mut title = raw.to_string();
    loop {
        let decoded = TITLE_ENTITIES
            .iter()
            .fold(title.clone(), |acc, (entity, literal)| {
                acc.replace(entity, literal)
            });
        if decoded == title {
            return decoded;
        }
        title = decoded;
    }
}

/// Featured media first, then the first `src` attribute in the body, then the placeholder
pub fn extract_image(post: &WpPost) -> String {
    if let Some(url) = post.featured_image() {
        return url.to_string();
    }

    image_src_regex()
        .and_then(|re| re.captures(&post.content.rendered))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

fn capture_all(re: Option<&Regex>, html: &str) -> Vec<String> {
    let Some(re) = re else {
        return Vec::new();
    };
    re.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Every `<li><span>…</span></li>` in the body, in document order
pub fn extract_ingredients(html: &str) -> Vec<String> {
    capture_all(ingredient_regex(), html)
}

/// Every `<div class="step-content"><p>…</p>` in the body, in document order
pub fn extract_instructions(html: &str) -> Vec<String> {
    capture_all(instruction_regex(), html)
}

/// Excerpt as plain text. Text nodes come out of the parser already decoded.
pub fn extract_excerpt(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<String>();
    text.trim().to_string()
}

/// Turn one post into a [`Recipe`] filed under `category`
pub fn normalize_post(post: &WpPost, category: &str) -> Recipe {
    let content = &post.content.rendered;
    let recipe = Recipe {
        id: post.id.to_string(),
        name: decode_title(&post.title.rendered),
        image: extract_image(post),
        category: category.to_string(),
        slug: post.slug.clone(),
        link: post.link.clone(),
        excerpt: extract_excerpt(&post.excerpt.rendered),
        ingredients: extract_ingredients(content),
        instructions: extract_instructions(content),
        date_published: post.date.clone(),
        content: Some(content.clone()),
    };
    debug!(
        "Normalized post {} ({} ingredients, {} steps)",
        recipe.id,
        recipe.ingredients.len(),
        recipe.instructions.len()
    );
    recipe
}

/// Normalize a raw JSON array of posts. Entries that are not posts are skipped.
pub fn normalize_posts(posts: Vec<Value>, category: &str) -> Vec<Recipe> {
    posts
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<WpPost>(value) {
            Ok(post) => Some(normalize_post(&post, category)),
            Err(e) => {
                warn!("Skipping unreadable {} post: {}", category, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{Embedded, FeaturedMedia, Rendered};

    fn post_with_content(content: &str) -> WpPost {
        WpPost {
            id: 7,
            content: Rendered {
                rendered: content.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_title_known_entities() {
        let raw = "Mac &amp; cheese &#8211; Mom&#8217;s &#8220;best&#8221;";
        let decoded = decode_title(raw);
        assert_eq!(decoded, "Mac & cheese - Mom's \"best\"");
        for (entity, _) in TITLE_ENTITIES {
            assert!(!decoded.contains(entity));
        }
    }

    #[test]
    fn test_decode_title_nested_entities() {
        assert_eq!(decode_title("Rock&amp;#8217;n roll"), "Rock'n roll");
        assert_eq!(decode_title("Salt &amp;amp; pepper"), "Salt & pepper");
    }

    #[test]
    fn test_decode_title_leaves_other_entities() {
        assert_eq!(decode_title("Cr&egrave;me br&ucirc;l&eacute;e"), "Cr&egrave;me br&ucirc;l&eacute;e");
    }

    #[test]
    fn test_image_prefers_featured_media() {
        let mut post = post_with_content(r#"<img src="https://cdn.example.com/body.jpg">"#);
        post.embedded = Some(Embedded {
            featured_media: vec![FeaturedMedia {
                source_url: Some("https://cdn.example.com/featured.jpg".to_string()),
            }],
        });
        assert_eq!(extract_image(&post), "https://cdn.example.com/featured.jpg");
    }

    #[test]
    fn test_image_falls_back_to_body_src() {
        let post = post_with_content(
            r#"<p>Intro</p><img class="x" src="https://cdn.example.com/a.jpg"><img src="https://cdn.example.com/b.jpg">"#,
        );
        assert_eq!(extract_image(&post), "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn test_image_placeholder_when_nothing_found() {
        let mut post = post_with_content("<p>No pictures here</p>");
        post.embedded = Some(Embedded {
            featured_media: vec![FeaturedMedia { source_url: None }],
        });
        assert_eq!(extract_image(&post), PLACEHOLDER_IMAGE);
        assert_eq!(extract_image(&WpPost::default()), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_extract_ingredients_in_order() {
        let html = "<ul><li><span> 2 eggs </span></li><li><span>1 cup milk</span></li>\
                    <li><strong>ignored</strong></li><li><span>   </span></li></ul>";
        assert_eq!(extract_ingredients(html), vec!["2 eggs", "1 cup milk"]);
    }

    #[test]
    fn test_extract_instructions_allows_whitespace() {
        let html = r#"<div class="step-content">
                <p>Whisk the eggs.</p></div>
            <div class="step-content"><p> Fry gently. </p></div>
            <div class="step-other"><p>Not a step</p></div>"#;
        assert_eq!(
            extract_instructions(html),
            vec!["Whisk the eggs.", "Fry gently."]
        );
    }

    #[test]
    fn test_malformed_html_degrades_to_empty() {
        let html = "<li><span>unterminated <div class=\"step-content\"><p>";
        assert!(extract_ingredients(html).is_empty());
        assert!(extract_instructions(html).is_empty());
        assert!(extract_ingredients("").is_empty());
    }

    #[test]
    fn test_excerpt_is_plain_text() {
        assert_eq!(
            extract_excerpt("<p>Quick &amp; easy <em>weeknight</em> supper</p>\n"),
            "Quick & easy weeknight supper"
        );
    }

    #[test]
    fn test_excerpt_entities_are_decoded_once() {
        assert_eq!(
            extract_excerpt("<p>Use &amp;lt;b&amp;gt; tags</p>"),
            "Use &lt;b&gt; tags"
        );
    }

    #[test]
    fn test_normalize_posts_skips_unreadable_entries() {
        let posts = vec![
            serde_json::json!({
                "id": 11,
                "title": {"rendered": "Oats &amp; berries"},
                "content": {"rendered": "<li><span>oats</span></li>"},
                "excerpt": {"rendered": ""}
            }),
            serde_json::json!({"id": "not-a-number"}),
        ];
        let recipes = normalize_posts(posts, "breakfast");
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].id, "11");
        assert_eq!(recipes[0].name, "Oats & berries");
        assert_eq!(recipes[0].ingredients, vec!["oats"]);
        assert_eq!(recipes[0].image, PLACEHOLDER_IMAGE);
        assert_eq!(recipes[0].category, "breakfast");
    }
}
