//! Axum router construction for the dashboard server.
//!
//! API routes are declared as a table ([`api_routes`]) and folded into a
//! single [`Router`]. Images are served from the configured images
//! directory, and every other path falls back to static files under the
//! static root. CORS headers are stamped on every response, not only on
//! preflights, and any `OPTIONS` request is answered with an empty 200.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::inventory::IMAGES_URL_PREFIX;
use crate::state::AppState;

/// CORS headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, OPTIONS"),
    ("access-control-allow-headers", "Content-Type"),
];

/// The API route table: path pattern and its handler.
pub fn api_routes() -> Vec<(&'static str, MethodRouter<Arc<AppState>>)> {
    vec![
        ("/api/images", get(handlers::list_images)),
        ("/api/data-status", get(handlers::data_status)),
        ("/api/data/", get(handlers::get_data_file)),
        ("/api/data/{*name}", get(handlers::get_data_file)),
    ]
}

/// Answer any `OPTIONS` request with 200 and an empty body.
async fn answer_preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

/// Build the complete Axum router for the dashboard server.
///
/// The router includes:
/// - `GET /api/images` -- slideshow image list
/// - `GET /api/data-status` -- data directory listing
/// - `GET /api/data/{name}` -- raw data file (`/api/data/` answers 404)
/// - `GET /images/*` -- files from the images directory
/// - anything else -- static files under the static root
pub fn build_router(state: Arc<AppState>) -> Router {
    let images = ServeDir::new(state.inventory.images_dir());
    let statics = ServeDir::new(state.static_root());

    let mut router = api_routes()
        .into_iter()
        .fold(Router::new(), |router, (path, route)| router.route(path, route))
        .nest_service(&format!("/{IMAGES_URL_PREFIX}"), images)
        .fallback_service(statics)
        .layer(middleware::from_fn(answer_preflight));

    for (name, value) in CORS_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
