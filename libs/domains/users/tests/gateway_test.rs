//! Gateway tests for the users domain
//!
//! Boots the tonic service on an ephemeral port, points the JSON gateway at
//! it and drives requests through the proxy: payload translation in both
//! directions plus the gRPC-to-HTTP status mapping.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::handlers::{GrpcUserService, gateway_router};
use domain_users::{
    InMemoryUserRepository, RequestContext, User, UserEndpoints, UserError, UserRepository,
    UserResult, UserService,
};
use http_body_util::BodyExt;
use rpc::user::user_service_client::UserServiceClient;
use rpc::user::user_service_server::UserServiceServer;
use serde_json::json;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tower::ServiceExt; // For oneshot()

/// Serve the gRPC service on an ephemeral port and return a gateway router
/// connected to it.
async fn gateway_over<R: UserRepository + 'static>(repository: R) -> Router {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let grpc = GrpcUserService::new(UserEndpoints::new(UserService::new(repository)));
    tokio::spawn(async move {
        Server::builder()
            .add_service(UserServiceServer::new(grpc))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    let channel = Channel::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .unwrap();
    gateway_router(UserServiceClient::new(channel))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn json_body(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Repository double that counts how often storage is reached.
#[derive(Clone, Default)]
struct CountingRepository {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl UserRepository for CountingRepository {
    async fn register(&self, _cx: &RequestContext, _user: User) -> UserResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn login(&self, _cx: &RequestContext, email: &str, _passwords: &str) -> UserResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(UserError::NotFound(email.to_string()))
    }
}

#[tokio::test]
async fn test_gateway_register_translates_payloads() {
    let app = gateway_over(InMemoryUserRepository::new()).await;

    let response = app
        .oneshot(post_json(
            "/user/register",
            json!({ "email": "a@example.com", "passwords": "hunter2" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "status": "Success" }));
}

#[tokio::test]
async fn test_gateway_register_then_login() {
    let app = gateway_over(InMemoryUserRepository::new()).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/user/register",
            json!({ "email": "a@example.com", "passwords": "hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            "/user/login",
            json!({ "email": "a@example.com", "passwords": "hunter2" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "status": "Success" }));
}

#[tokio::test]
async fn test_gateway_duplicate_maps_to_conflict() {
    let app = gateway_over(InMemoryUserRepository::new()).await;
    let payload = json!({ "email": "a@example.com", "passwords": "hunter2" });

    app.clone()
        .oneshot(post_json("/user/register", payload.clone()))
        .await
        .unwrap();
    let response = app
        .oneshot(post_json("/user/register", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!({ "error": "User with email 'a@example.com' already exists" })
    );
}

#[tokio::test]
async fn test_gateway_login_failure_maps_to_unauthorized() {
    let app = gateway_over(InMemoryUserRepository::new()).await;

    let response = app
        .oneshot(post_json(
            "/user/login",
            json!({ "email": "missing@example.com", "passwords": "hunter2" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "error": "email or password is incorrect" }));
}

#[tokio::test]
async fn test_gateway_malformed_json_never_reaches_upstream() {
    let repository = CountingRepository::default();
    let app = gateway_over(repository.clone()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/user/register")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    assert_eq!(repository.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_gateway_reports_unreachable_upstream_as_unavailable() {
    // Nothing listens on the lazily-connected channel, so the first call
    // surfaces a transport error.
    let channel = Channel::from_static("http://127.0.0.1:59999").connect_lazy();
    let app = gateway_router(UserServiceClient::new(channel));

    let response = app
        .oneshot(post_json(
            "/user/register",
            json!({ "email": "a@example.com", "passwords": "hunter2" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
