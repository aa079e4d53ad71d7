use serde::Deserialize;

mod wordpress;

pub use wordpress::{
    decode_title, extract_excerpt, extract_image, extract_ingredients, extract_instructions,
    normalize_post, normalize_posts,
};

/// A post as returned by `/wp-json/wp/v2/posts?_embed=true`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WpPost {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Embedded {
    #[serde(rename = "wp:featuredmedia", default)]
    pub featured_media: Vec<FeaturedMedia>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedMedia {
    pub source_url: Option<String>,
}

impl WpPost {
    /// URL of the first embedded featured media item, if any
    pub fn featured_image(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .featured_media
            .first()?
            .source_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}
