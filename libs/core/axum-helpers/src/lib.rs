//! # Axum Helpers
//!
//! Serving glue shared by the HTTP listeners in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: bind + serve with graceful shutdown, health route
//! - **[`shutdown`]**: signal handling and cross-server shutdown coordination
//! - **[`middleware`]**: response-header middleware and the permissive CORS layer

pub mod middleware;
pub mod server;
pub mod shutdown;

pub use middleware::{create_permissive_cors_layer, json_content_type};
pub use server::{health_router, serve_until};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
