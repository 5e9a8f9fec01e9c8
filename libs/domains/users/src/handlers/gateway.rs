use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tonic::{Code, Status, transport::Channel};

use rpc::user::user_service_client::UserServiceClient;

use crate::error::UserError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

pub async fn register(
    State(mut client): State<UserServiceClient<Channel>>,
    body: Bytes,
) -> Response {
    let request: RegisterRequest = match decode(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match client
        .register(rpc::user::RegisterRequest {
            email: request.email,
            passwords: request.passwords,
        })
        .await
    {
        Ok(response) => Json(RegisterResponse {
            status: response.into_inner().status,
        })
        .into_response(),
        Err(status) => error_response(status),
    }
}

pub async fn login(State(mut client): State<UserServiceClient<Channel>>, body: Bytes) -> Response {
    let request: LoginRequest = match decode(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match client
        .login(rpc::user::LoginRequest {
            email: request.email,
            passwords: request.passwords,
        })
        .await
    {
        Ok(response) => Json(LoginResponse {
            status: response.into_inner().status,
        })
        .into_response(),
        Err(status) => error_response(status),
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|err| UserError::Decode(err.to_string()).into_response())
}

/// Translate an upstream gRPC failure into the JSON error envelope, keeping
/// the body shape identical to the directly-served routes.
fn error_response(status: Status) -> Response {
    let code = http_status(status.code());
    (code, Json(json!({ "error": status.message() }))).into_response()
}

fn http_status(code: Code) -> StatusCode {
    match code {
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            StatusCode::BAD_REQUEST
        }
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
