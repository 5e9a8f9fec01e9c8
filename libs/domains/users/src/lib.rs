//! # Users Domain
//!
//! Account registration and login, layered so every transport shares one
//! implementation of the business rules:
//!
//! ```text
//!  HTTP JSON          gRPC            gateway (JSON -> gRPC)
//!      |                |                |
//!      +--------- endpoints (+ middleware) ---------+
//!                       |
//!                  UserService        argon2 hashing, validation
//!                       |
//!                 UserRepository      in-memory / Postgres
//! ```
//!
//! Transports only decode and encode; decisions live in [`service`] and
//! everything below it.

pub mod context;
pub mod endpoint;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use context::RequestContext;
pub use endpoint::{Endpoint, EndpointFuture, Middleware, UserEndpoints};
pub use error::{UserError, UserResult};
pub use middleware::LoggingMiddleware;
pub use models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
pub use postgres::PostgresUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
