use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use waratah_api::build_app;

fn places_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/places.json")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn bullet_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .filter(|line| line.starts_with("- "))
        .map(ToString::to_string)
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_app(places_path()).expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["ok"], json!(true));
}

#[tokio::test]
async fn chat_recommends_sydney_places() {
    let app = build_app(places_path()).expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "message": "best brunch in sydney cbd"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = body_json(response).await;
    let reply = parsed["reply"].as_str().expect("reply should be a string");

    assert!(reply.contains("Sydney"));
    let lines = bullet_lines(reply);
    assert!(!lines.is_empty() && lines.len() <= 5);
    // Candidates come from the requested city only.
    assert!(!reply.contains("Chin Chin"));
    assert!(!reply.contains("Patricia Coffee Brewers"));
}

#[tokio::test]
async fn chat_is_deterministic_for_the_same_message() {
    let app = build_app(places_path()).expect("app should build");

    let send = |app: axum::Router| async move {
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "message": "good coffee near the harbour"
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let parsed = body_json(response).await;
        bullet_lines(parsed["reply"].as_str().unwrap())
    };

    let first = send(app.clone()).await;
    let second = send(app).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn chat_unknown_city_gets_fallback_reply() {
    let app = build_app(places_path()).expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "message": "anything fun",
                "city": "perth"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = body_json(response).await;
    let reply = parsed["reply"].as_str().unwrap();
    assert!(reply.contains("don't have data for perth"));
    assert!(bullet_lines(reply).is_empty());
}

#[tokio::test]
async fn nearby_filters_sorts_and_limits() {
    let app = build_app(places_path()).expect("app should build");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nearby?lat=-33.8688&lng=151.2093&kind=cafe&city=sydney&limit=3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = body_json(response).await;
    let hits = parsed.as_array().expect("nearby returns a list");
    assert_eq!(hits.len(), 3);

    let mut previous = 0.0_f64;
    for hit in hits {
        assert_eq!(hit["type"], json!("cafe"));
        assert_eq!(hit["city"], json!("sydney"));
        let distance = hit["distance_km"].as_f64().unwrap();
        assert!(distance >= previous);
        previous = distance;
    }
}

#[tokio::test]
async fn nearby_limit_is_clamped() {
    let app = build_app(places_path()).expect("app should build");

    let low = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/nearby?lat=-33.8688&lng=151.2093&limit=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(low).await.as_array().unwrap().len(), 1);

    let high = app
        .oneshot(
            Request::builder()
                .uri("/nearby?lat=-33.8688&lng=151.2093&limit=50")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_json(high).await.as_array().unwrap().len() <= 10);
}

#[tokio::test]
async fn nearby_rejects_non_numeric_coordinates() {
    let app = build_app(places_path()).expect("app should build");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nearby?lat=abc&lng=151.2093")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nearby_unmatched_filter_returns_empty_list() {
    let app = build_app(places_path()).expect("app should build");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nearby?lat=-33.8688&lng=151.2093&kind=museum")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}
