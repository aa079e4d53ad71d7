use crate::config::ContentConfig;
use crate::error::PlannerError;
use crate::extractors::normalize_posts;
use crate::model::Recipe;
use crate::routing::ContentCategory;
use crate::sources::CategoryFetcher;
use async_trait::async_trait;
use log::info;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Client for a WordPress REST API serving recipe posts
pub struct WordPressClient {
    client: Client,
    base_url: String,
}

impl WordPressClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, PlannerError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let timeout = timeout.unwrap_or(Duration::from_secs(10));

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_str(&format!("{}/", base_url))?);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ContentConfig) -> Result<Self, PlannerError> {
        Self::new(&config.base_url, Some(Duration::from_secs(config.timeout)))
    }

    /// Raw post objects for one category
    pub async fn fetch_posts(
        &self,
        category: &ContentCategory,
        limit: u32,
    ) -> Result<Vec<Value>, PlannerError> {
        let url = format!("{}/wp-json/wp/v2/posts", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("categories", category.id.to_string()),
                ("per_page", limit.to_string()),
                ("_embed", "true".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::UpstreamUnavailable {
                status: status.as_u16(),
                message: format!(
                    "Content API returned {} for category {}",
                    status, category.key
                ),
            });
        }

        let body = response.text().await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(posts)) => Ok(posts),
            Ok(_) => Err(PlannerError::ParseFailure(
                "Invalid response format from content API".to_string(),
            )),
            Err(e) => Err(PlannerError::ParseFailure(e.to_string())),
        }
    }
}

#[async_trait]
impl CategoryFetcher for WordPressClient {
    fn fetcher_name(&self) -> &str {
        "wordpress"
    }

    async fn fetch_category(
        &self,
        category: &ContentCategory,
        limit: u32,
    ) -> Result<Vec<Recipe>, PlannerError> {
        info!("Fetching {} recipes from content API", category.key);
        let posts = self.fetch_posts(category, limit).await?;
        let recipes = normalize_posts(posts, category.key);
        info!("Fetched {} {} recipes", recipes.len(), category.key);
        Ok(recipes)
    }
}
