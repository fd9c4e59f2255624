use super::*;
use crate::VideoFetcher;
use crate::fetcher::test_helpers::{
    FakeFetch, FakeProbe, create_test_fetcher, create_test_fetcher_with_config, sample_video_info,
};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;


/// Build a router (and keep the fetcher handle) around a scripted fake backend
fn test_router(probe: FakeProbe, fetch: FakeFetch) -> (Router, Arc<VideoFetcher>) {
    let (fetcher, _) = create_test_fetcher(probe, fetch);
    let config = fetcher.get_config();
    (create_router(fetcher.clone(), config), fetcher)
}

/// POST a JSON body and return the response
async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body as JSON
async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let mut config = crate::Config::default();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port

    let (fetcher, _) = create_test_fetcher_with_config(
        config,
        FakeProbe::Ok(sample_video_info()),
        FakeFetch::Fail("unused"),
    );

    // Spawn the API server
    let api_handle = fetcher.spawn_api_server();

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Abort the server task
    api_handle.abort();

    // The test passes if we got here without panicking
}

#[tokio::test]
async fn test_cors_enabled() {
    // Default config has CORS enabled with origin "*"
    let (app, _fetcher) = test_router(
        FakeProbe::Ok(sample_video_info()),
        FakeFetch::Fail("unused"),
    );

    // Make a request with Origin header
    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // The CORS middleware should add access-control-allow-origin header
    let headers = response.headers();
    assert!(
        headers.contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled_omits_headers() {
    let mut config = crate::Config::default();
    config.server.api.cors_enabled = false;

    let (fetcher, _) = create_test_fetcher_with_config(
        config,
        FakeProbe::Ok(sample_video_info()),
        FakeFetch::Fail("unused"),
    );
    let app = create_router(fetcher.clone(), fetcher.get_config());

    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be absent when CORS is disabled"
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _fetcher) = test_router(
        FakeProbe::Ok(sample_video_info()),
        FakeFetch::Fail("unused"),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
