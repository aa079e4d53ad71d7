use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use meal_planner::fetchers::WordPressClient;
use meal_planner::server::{router, AppState};
use mockito::{Matcher, ServerGuard};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const POSTS: &str = r#"[
    {
        "id": 501,
        "title": {"rendered": "Chakalaka &amp; pap"},
        "content": {"rendered": "<li><span>1 onion</span></li><div class=\"step-content\"><p>Fry the onion.</p></div>"},
        "excerpt": {"rendered": "<p>A spicy relish.</p>"},
        "date": "2024-05-01T10:00:00",
        "_embedded": {"wp:featuredmedia": [{"source_url": "https://cdn.example.com/chakalaka.jpg"}]}
    }
]"#;

fn app(server: &ServerGuard) -> Router {
    let client = WordPressClient::new(&server.url(), None).unwrap();
    router(
        AppState::new(Arc::new(client), 3),
        &["http://localhost:3000".to_string()],
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_lists_categories() {
    let server = mockito::Server::new_async().await;
    let (status, body) = send(app(&server), get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().unwrap().contains('T'));
    assert_eq!(body["availableCategories"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_unknown_category_is_bad_request() {
    let server = mockito::Server::new_async().await;
    let (status, body) = send(app(&server), get("/api/recipes/brunch")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid category");
    let valid = body["validCategories"].as_array().unwrap();
    assert!(valid.iter().any(|c| c == "vegan-veg"));
}

#[tokio::test]
async fn test_category_is_fetched_and_normalized() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/wp-json/wp/v2/posts")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("categories".into(), "26191".into()),
            Matcher::UrlEncoded("per_page".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(POSTS)
        .create_async()
        .await;

    let (status, body) = send(app(&server), get("/api/recipes/lunch?limit=5")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["category"], "lunch");
    assert_eq!(body["count"], 1);
    let recipe = &body["recipes"][0];
    assert_eq!(recipe["id"], "501");
    assert_eq!(recipe["name"], "Chakalaka & pap");
    assert_eq!(recipe["datePublished"], "2024-05-01T10:00:00");
    assert_eq!(recipe["image"], "https://cdn.example.com/chakalaka.jpg");
    assert_eq!(recipe["ingredients"][0], "1 onion");
    assert_eq!(recipe["instructions"][0], "Fry the onion.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_oversized_limit_is_clamped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/wp-json/wp/v2/posts")
        .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let (status, body) = send(app(&server), get("/api/recipes/desserts?limit=5000")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/wp-json/wp/v2/posts")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let (status, body) = send(app(&server), get("/api/recipes/dinner")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["category"], "dinner");
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn test_batch_reports_each_category() {
    let mut server = mockito::Server::new_async().await;
    let _breakfast = server
        .mock("GET", "/wp-json/wp/v2/posts")
        .match_query(Matcher::UrlEncoded("categories".into(), "2608".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(POSTS)
        .create_async()
        .await;
    let _meats = server
        .mock("GET", "/wp-json/wp/v2/posts")
        .match_query(Matcher::UrlEncoded("categories".into(), "26234".into()))
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let (status, body) = send(
        app(&server),
        post_json(
            "/api/recipes/batch",
            r#"{"categories": ["breakfast", "meats", "brunch"], "limit": 2}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["totalCategories"], 3);
    assert_eq!(body["successfulCategories"], 1);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["category"], "breakfast");
    assert_eq!(results[0]["count"], 1);
    assert!(results[0]["recipes"][0].get("content").is_none());
    assert_eq!(results[1]["category"], "meats");
    assert!(results[1]["error"].as_str().is_some());
    assert_eq!(results[2]["error"], "Invalid category");
}

#[tokio::test]
async fn test_batch_without_category_array_is_bad_request() {
    let server = mockito::Server::new_async().await;
    let (status, body) = send(
        app(&server),
        post_json("/api/recipes/batch", r#"{"categories": "breakfast"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Categories must be an array");
}

#[tokio::test]
async fn test_non_numeric_limit_is_json_bad_request() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("GET", "/wp-json/wp/v2/posts")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .expect(0)
        .create_async()
        .await;

    let response = app(&server)
        .oneshot(get("/api/recipes/lunch?limit=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Limit must be a positive integer");
    assert_eq!(body["category"], "lunch");
    assert!(body["message"].as_str().unwrap().contains("limit"));
    upstream.assert_async().await;
}
