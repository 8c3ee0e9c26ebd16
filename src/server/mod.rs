mod handlers;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::Extension,
    handler::HandlerWithoutStateExt,
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::api::{DynAPI, API};
use crate::config::Config;
use crate::error::Error;
use crate::server::handlers::{not_found, places, user_places};

/// Builds the HTTP surface: catalog and selection routes, static images from
/// `images_dir` at the root path, and a JSON 404 for everything else.
pub fn router(api: DynAPI, images_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT])
        .allow_headers([CONTENT_TYPE]);

    let images = ServeDir::new(images_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .route("/places", get(places::list).fallback(not_found))
        .route(
            "/user-places",
            get(user_places::find)
                .put(user_places::replace)
                .fallback(not_found),
        )
        .fallback_service(images)
        .layer(Extension(api))
        .layer(cors)
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, config: &Config) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api, &config.images_dir);

    let listener = TcpListener::bind(config.addr()?).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(err) => {
                tracing::error!("failed to listen for Ctrl+C: {}", err);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("failed to install terminate handler: {}", err);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
