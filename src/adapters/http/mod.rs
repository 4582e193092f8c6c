//! HTTP adapter (axum). Drives the application through `ContactsPort`.

pub mod error;
pub mod handlers;

use crate::ports::ContactsPort;
use axum::Router;
use axum::routing::get;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router.
///
/// | method | path |
/// |---|---|
/// | POST, GET | /contacts |
/// | GET, PUT, PATCH, DELETE | /contacts/:id |
/// | GET | /health |
pub fn router(contacts: Arc<dyn ContactsPort>) -> Router {
    Router::new()
        .route(
            "/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route(
            "/contacts/:id",
            get(handlers::get_contact)
                .put(handlers::update_contact)
                .patch(handlers::update_contact)
                .delete(handlers::delete_contact),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::route_not_found)
        .with_state(contacts)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "contacts API listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
