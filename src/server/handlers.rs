use super::types::{
    BatchEntry, BatchRequest, BatchResponse, CategoryResponse, ErrorResponse, HealthResponse,
    LimitQuery,
};
use super::AppState;
use crate::error::PlannerError;
use crate::routing;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::future::join_all;
use log::{error, info, warn};

// WordPress refuses per_page above 100
const MAX_LIMIT: u32 = 100;

fn clamp_limit(limit: Option<u32>, default: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

fn upstream_status(e: &PlannerError) -> StatusCode {
    if e.is_upstream() || matches!(e, PlannerError::ParseFailure(_)) {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn invalid_category() -> ErrorResponse {
    ErrorResponse {
        valid_categories: Some(
            routing::category_keys()
                .into_iter()
                .map(String::from)
                .collect(),
        ),
        ..ErrorResponse::new("Invalid category")
    }
}

pub(super) async fn get_recipes(
    State(state): State<AppState>,
    Path(category): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Response {
    let content_category = match routing::require_category(&category) {
        Ok(content_category) => content_category,
        Err(e) => {
            warn!("{}", e);
            return (StatusCode::BAD_REQUEST, Json(invalid_category())).into_response();
        }
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!("Rejected {} query: {}", category, rejection);
            let body = ErrorResponse {
                message: Some(rejection.body_text()),
                category: Some(category),
                ..ErrorResponse::new("Limit must be a positive integer")
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };
    let limit = clamp_limit(query.limit, state.default_limit);

    match state.fetcher.fetch_category(content_category, limit).await {
        Ok(recipes) => {
            info!("Served {} {} recipes", recipes.len(), category);
            Json(CategoryResponse {
                success: true,
                count: recipes.len(),
                category,
                recipes,
            })
            .into_response()
        }
        Err(e) => {
            error!("Error fetching {} recipes: {}", category, e);
            let body = ErrorResponse {
                message: Some(e.to_string()),
                category: Some(category),
                ..ErrorResponse::new("Failed to fetch recipes from content API")
            };
            (upstream_status(&e), Json(body)).into_response()
        }
    }
}

pub(super) async fn batch_recipes(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected batch request: {}", rejection);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Categories must be an array")),
            )
                .into_response();
        }
    };
    let limit = clamp_limit(request.limit, state.default_limit);
    info!(
        "Batch fetching recipes for categories: {}",
        request.categories.join(", ")
    );

    let fetches = request.categories.iter().map(|key| {
        let fetcher = state.fetcher.clone();
        async move {
            let content_category = match routing::require_category(key) {
                Ok(content_category) => content_category,
                Err(e) => {
                    warn!("{}", e);
                    return BatchEntry {
                        category: key.clone(),
                        recipes: Vec::new(),
                        count: None,
                        error: Some("Invalid category".to_string()),
                    };
                }
            };
            match fetcher.fetch_category(content_category, limit).await {
                Ok(recipes) => {
                    // Batch results leave out the raw post body
                    let recipes: Vec<_> = recipes
                        .into_iter()
                        .map(|mut r| {
                            r.content = None;
                            r
                        })
                        .collect();
                    BatchEntry {
                        category: key.clone(),
                        count: Some(recipes.len()),
                        recipes,
                        error: None,
                    }
                }
                Err(e) => {
                    error!("Error fetching {}: {}", key, e);
                    BatchEntry {
                        category: key.clone(),
                        recipes: Vec::new(),
                        count: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        }
    });
    let results = join_all(fetches).await;

    let successful_categories = results.iter().filter(|r| !r.recipes.is_empty()).count();
    Json(BatchResponse {
        success: true,
        total_categories: request.categories.len(),
        successful_categories,
        results,
    })
    .into_response()
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        available_categories: routing::category_keys()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}
