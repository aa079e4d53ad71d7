use crate::error::PlannerError;
use crate::model::Recipe;
use crate::routing::ContentCategory;
use crate::server::types::{CategoryResponse, ErrorResponse};
use crate::sources::CategoryFetcher;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

/// Client half of the recipe proxy (`GET /api/recipes/{category}`)
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CategoryFetcher for ProxyClient {
    fn fetcher_name(&self) -> &str {
        "proxy"
    }

    async fn fetch_category(
        &self,
        category: &ContentCategory,
        limit: u32,
    ) -> Result<Vec<Recipe>, PlannerError> {
        let url = format!("{}/api/recipes/{}", self.base_url, category.key);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Proxy answered {} for {}", status, category.key);

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message.unwrap_or(e.error))
                .unwrap_or(body);
            return Err(PlannerError::UpstreamUnavailable {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CategoryResponse = serde_json::from_str(&body)
            .map_err(|e| PlannerError::ParseFailure(e.to_string()))?;
        Ok(parsed.recipes)
    }
}
