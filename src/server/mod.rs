//! HTTP proxy in front of the WordPress content API.

mod handlers;
pub mod types;

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::fetchers::WordPressClient;
use crate::sources::CategoryFetcher;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared, read-only state of the proxy
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn CategoryFetcher>,
    pub default_limit: u32,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn CategoryFetcher>, default_limit: u32) -> Self {
        Self {
            fetcher,
            default_limit,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        let client = WordPressClient::from_config(&config.content)?;
        Ok(Self::new(Arc::new(client), config.content.default_limit))
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid allowed origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(origins)
        .allow_headers([CONTENT_TYPE, ACCEPT])
}

/// Returns the [`Router`] of the proxy.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/recipes/batch", post(handlers::batch_recipes))
        .route("/api/recipes/{category}", get(handlers::get_recipes))
        .route("/api/health", get(handlers::health))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(config: &PlannerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_config(config)?;
    let app = router(state, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Recipe proxy listening on {}", addr);
    info!("  GET  /api/recipes/{{category}}?limit=3");
    info!("  POST /api/recipes/batch");
    info!("  GET  /api/health");

    axum::serve(listener, app).await?;
    Ok(())
}
