mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use placepicker::server::router;

use common::{engine, place};

async fn app() -> (tempfile::TempDir, Router) {
    let (dir, engine) = engine().await;
    let app = router(Arc::new(engine), dir.path().join("images"));

    (dir, app)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();

    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn lists_catalog() {
    let (_dir, app) = app().await;

    let (status, body) = send(&app, get("/places")).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["places"].as_array().unwrap().len(), 3);
    assert_eq!(body["places"][0]["id"], "p1");
}

#[tokio::test]
async fn fresh_selection_is_empty() {
    let (_dir, app) = app().await;

    let (status, body) = send(&app, get("/user-places")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({ "places": [] }));
}

#[tokio::test]
async fn put_replaces_whole_selection() {
    let (dir, app) = app().await;

    let first = json!({ "places": [place("p1"), place("p2")] });
    let (status, body) = send(&app, put_json("/user-places", first)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({ "message": "User places updated!" })
    );

    let second = json!({ "places": [place("p3")] });
    send(&app, put_json("/user-places", second)).await;

    let (_, body) = send(&app, get("/user-places")).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "places": [place("p3")] }));

    let on_disk: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("user-places.json")).unwrap())
            .unwrap();
    assert_eq!(on_disk, json!([place("p3")]));
}

#[tokio::test]
async fn put_without_places_is_bad_request() {
    let (dir, app) = app().await;

    let (status, body) = send(&app, put_json("/user-places", json!({ "nope": [] }))).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let on_disk = std::fs::read_to_string(dir.path().join("user-places.json")).unwrap();
    assert_eq!(on_disk, "[]");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (_dir, app) = app().await;

    let (status, body) = send(&app, get("/nowhere")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, br#"{"message":"404 - Not Found"}"#.to_vec());
}

#[tokio::test]
async fn unsupported_method_is_json_404() {
    let (_dir, app) = app().await;

    let req = Request::builder()
        .method(Method::DELETE)
        .uri("/user-places")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, br#"{"message":"404 - Not Found"}"#.to_vec());

    let (status, _) = send(&app, put_json("/places", json!({ "places": [] }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, put_json("/elsewhere", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn serves_images_from_root() {
    let (dir, app) = app().await;
    std::fs::create_dir(dir.path().join("images")).unwrap();
    std::fs::write(dir.path().join("images").join("p1.jpg"), b"jpeg bytes").unwrap();

    let (status, body) = send(&app, get("/p1.jpg")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"jpeg bytes".to_vec());
}

#[tokio::test]
async fn preflight_allows_get_and_put() {
    let (_dir, app) = app().await;

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/user-places")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);

    let headers = res.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("GET"));
    assert!(methods.contains("PUT"));
    assert!(!methods.contains("DELETE"));

    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
    assert_eq!(allowed.to_ascii_lowercase(), "content-type");
}

#[tokio::test]
async fn simple_request_gets_allow_origin() {
    let (_dir, app) = app().await;

    let req = Request::builder()
        .uri("/places")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();

    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn storage_failure_is_500_with_message() {
    let (dir, app) = app().await;
    let selection = dir.path().join("user-places.json");
    std::fs::remove_file(&selection).unwrap();
    std::fs::create_dir(&selection).unwrap();

    let (status, body) = send(&app, put_json("/user-places", json!({ "places": [] }))).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "storage error");

    let (status, _) = send(&app, get("/user-places")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
