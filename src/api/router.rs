//! HTTP router.
//!
//! The three routes are served at the root and again under `/api`, which
//! is where the canvas frontend calls them. CORS and request tracing wrap
//! both mounts.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the service router.
pub fn api_router(ctx: ApiContext) -> Router {
    let cors = cors_layer(&ctx.allowed_origins);

    let routes = Router::new()
        .route("/chat", post(endpoints::chat::turn))
        .route("/generate-image", post(endpoints::image::generate))
        .route("/health", get(endpoints::health::check));

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Explicit origin list with credentials. Methods and headers are
/// mirrored from the preflight since wildcards cannot be combined with
/// credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
