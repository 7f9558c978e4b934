#![cfg(feature = "ledserver")]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
    Router,
};
use chrono::Utc;
use ledrotation::{ConfigPatch, LiveManager, LiveState, live_api_router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn create_test_api() -> (LiveState, Router) {
    let state = LiveState::new(LiveManager::builtin());
    let router = live_api_router(state.clone());
    (state, router)
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_get_current() {
    let (_state, router) = create_test_api();
    let (status, body) = call(&router, Method::GET, "/current", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Weather & Time");
    assert_eq!(body["url"], "/dashboard/weather-time");
    assert_eq!(body["index"], 0);
    assert!(body["lastUpdate"].is_string());
}

#[tokio::test]
async fn test_next_and_previous() {
    let (_state, router) = create_test_api();

    let (status, body) = call(&router, Method::POST, "/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sports Scores");

    let (_, body) = call(&router, Method::POST, "/previous", None).await;
    assert_eq!(body["name"], "Weather & Time");

    let (_, body) = call(&router, Method::POST, "/previous", None).await;
    assert_eq!(body["name"], "Heart Beat");
    assert_eq!(body["index"], 39);
}

#[tokio::test]
async fn test_set_index_errors_map_to_400() {
    let (_state, router) = create_test_api();

    let (status, body) = call(&router, Method::POST, "/index/12", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["index"], 12);

    let (status, body) = call(&router, Method::POST, "/index/40", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "IndexOutOfRange");

    let (status, _) = call(&router, Method::POST, "/index/-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(&router, Method::GET, "/current", None).await;
    assert_eq!(body["index"], 12);
}

#[tokio::test]
async fn test_by_name() {
    let (_state, router) = create_test_api();

    let (status, body) = call(&router, Method::POST, "/name/FIREWORKS", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "/dashboard/fireworks");

    let (status, body) = call(&router, Method::POST, "/name/pac-man%20maze", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pac-Man Maze");

    let (status, body) = call(&router, Method::POST, "/name/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
    assert_eq!(body["message"], "Dashboard not found: nothing-here");
}

#[tokio::test]
async fn test_get_config() {
    let (_state, router) = create_test_api();
    let (status, body) = call(&router, Method::GET, "/config", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rotationIntervalMs"], 30000);
    assert_eq!(body["autoRotate"], true);
    assert_eq!(body["transitionDurationMs"], 500);
    assert_eq!(body["dashboardOrder"], json!([]));
    assert_eq!(body["items"].as_array().unwrap().len(), 40);
}

#[tokio::test]
async fn test_post_config_with_string_values() {
    let (_state, router) = create_test_api();
    call(&router, Method::POST, "/next", None).await;

    let patch = json!({"rotationIntervalMs": "5000", "autoRotate": "false", "extra": 1});
    let (status, body) = call(&router, Method::POST, "/config", Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rotationIntervalMs"], 5000);
    assert_eq!(body["autoRotate"], false);

    // sans dashboardOrder, la position ne bouge pas
    let (_, body) = call(&router, Method::GET, "/current", None).await;
    assert_eq!(body["index"], 1);
}

#[tokio::test]
async fn test_patch_config_reorders_and_resets() {
    let (_state, router) = create_test_api();
    call(&router, Method::POST, "/index/20", None).await;

    let patch = json!({"dashboardOrder": "Tetris, Snake Game"});
    let (status, body) = call(&router, Method::PATCH, "/config", Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dashboardOrder"], json!(["Tetris", "Snake Game"]));

    let (_, body) = call(&router, Method::GET, "/current", None).await;
    assert_eq!(body["name"], "Tetris");
    assert_eq!(body["index"], 0);

    let (_, body) = call(&router, Method::GET, "/dashboards", None).await;
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Tetris", "Snake Game"]);
}

#[tokio::test]
async fn test_invalid_patch_is_rejected() {
    let (state, router) = create_test_api();

    let patch = json!({"rotationIntervalMs": "soon"});
    let (status, body) = call(&router, Method::POST, "/config", Some(patch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidPatch");

    let manager = state.manager().read().await;
    assert_eq!(manager.rotation_config().rotation_interval_ms, 30000);
}

#[tokio::test]
async fn test_config_update_from_query() {
    let (_state, router) = create_test_api();

    let uri = "/config/update?rotationInterval=12000&autoRotate=off&dashboardOrder=Frogger&dashboardOrder=Centipede";
    let (status, body) = call(&router, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rotationIntervalMs"], 12000);
    assert_eq!(body["autoRotate"], false);
    assert_eq!(body["dashboardOrder"], json!(["Frogger", "Centipede"]));

    let (_, body) = call(&router, Method::GET, "/current", None).await;
    assert_eq!(body["name"], "Frogger");
}

#[tokio::test]
async fn test_navigation_is_broadcast() {
    let (state, router) = create_test_api();
    let mut rx = state.subscribe();

    call(&router, Method::POST, "/name/tetris", None).await;
    let event = rx.recv().await.unwrap();
    assert_eq!(event.current.item.name, "Tetris");

    state
        .update_config(ConfigPatch::default().dashboard_order(["Fireworks"]))
        .await
        .unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event.current.item.name, "Fireworks");
}

#[tokio::test]
async fn test_advance_if_due() {
    let (state, _router) = create_test_api();
    state
        .update_config(ConfigPatch::default().rotation_interval_ms(5000))
        .await
        .unwrap();

    let start = state.manager().read().await.last_update();
    let early = state
        .advance_if_due(start + chrono::Duration::milliseconds(100))
        .await
        .unwrap();
    assert!(early.is_none());

    let due = state
        .advance_if_due(Utc::now() + chrono::Duration::seconds(6))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(due.current.index, 1);
}

#[tokio::test]
async fn test_events_stream_content_type() {
    let (_state, router) = create_test_api();
    let request = Request::builder()
        .uri("/events")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
}

#[tokio::test]
async fn test_server_extension_routes() {
    use ledrotation::LiveRotationExt;

    let mut server = ledserver::Server::new("Test", "localhost", 0);
    server.init_live_rotation(LiveManager::builtin()).await.unwrap();
    let router = server.router().await;

    let (status, body) = call(&router, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "LED Dashboard Server");
    assert_eq!(body["dashboards"].as_array().unwrap().len(), 40);
    assert_eq!(body["display"]["width"], 128);
    assert_eq!(body["display"]["mode"], "dual");

    let (status, body) = call(&router, Method::POST, "/api/live/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sports Scores");

    let (status, body) = call(&router, Method::GET, "/api-docs/live.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/live/current"].is_object());
}
