//! HTTP surface: `POST /chat`, `POST /generate-image`, `GET /health`.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{serve_until, start_server_on, ServerError, ServerHandle};
pub use types::ApiContext;
