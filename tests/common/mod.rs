#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use placepicker::api::DynAPI;
use placepicker::engine::Engine;
use placepicker::entities::{Image, Place};
use placepicker::server::router;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub fn place(id: &str) -> Place {
    Place::new(
        id,
        format!("Place {}", id),
        Image {
            src: format!("{}.jpg", id),
            alt: format!("Picture of {}", id),
        },
        10.0,
        20.0,
    )
}

/// A data directory holding a three-place catalog and an empty selection.
pub async fn engine() -> (TempDir, Engine) {
    let dir = tempfile::tempdir().unwrap();

    std::fs::write(
        dir.path().join("places.json"),
        serde_json::to_vec(&vec![place("p1"), place("p2"), place("p3")]).unwrap(),
    )
    .unwrap();

    let engine = Engine::new(dir.path()).await.unwrap();

    (dir, engine)
}

pub async fn spawn_server(api: DynAPI, images_dir: &Path) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(api, images_dir);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

pub async fn spawn_engine_server() -> (TempDir, SocketAddr) {
    let (dir, engine) = engine().await;
    let addr = spawn_server(Arc::new(engine), &dir.path().join("images")).await;

    (dir, addr)
}
