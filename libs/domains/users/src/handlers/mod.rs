mod gateway;
mod grpc;
mod http;

use axum::{Router, middleware, routing::post};
use axum_helpers::{create_permissive_cors_layer, json_content_type};
use rpc::user::user_service_client::UserServiceClient;
use tonic::transport::Channel;

use crate::endpoint::UserEndpoints;

pub use grpc::GrpcUserService;

/// Create the JSON router backed by the endpoint layer.
pub fn router(endpoints: UserEndpoints) -> Router {
    Router::new()
        .route("/user/register", post(http::register))
        .route("/user/login", post(http::login))
        .with_state(endpoints)
        .layer(create_permissive_cors_layer())
        .layer(middleware::from_fn(json_content_type))
}

/// Create the same JSON router proxied to a gRPC upstream.
pub fn gateway_router(client: UserServiceClient<Channel>) -> Router {
    Router::new()
        .route("/user/register", post(gateway::register))
        .route("/user/login", post(gateway::login))
        .with_state(client)
        .layer(create_permissive_cors_layer())
        .layer(middleware::from_fn(json_content_type))
}
