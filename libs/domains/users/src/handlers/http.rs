use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::context::RequestContext;
use crate::endpoint::{Endpoint, UserEndpoints};
use crate::error::UserError;

pub async fn register(State(endpoints): State<UserEndpoints>, body: Bytes) -> Response {
    handle_json(&endpoints.register, &body).await
}

pub async fn login(State(endpoints): State<UserEndpoints>, body: Bytes) -> Response {
    handle_json(&endpoints.login, &body).await
}

/// Decode the JSON body, invoke the endpoint and encode the outcome.
///
/// Undecodable payloads answer 400 without the endpoint ever running.
async fn handle_json<Req, Res>(endpoint: &Endpoint<Req, Res>, body: &[u8]) -> Response
where
    Req: DeserializeOwned + Send + 'static,
    Res: Serialize + Send + 'static,
{
    let request = match serde_json::from_slice::<Req>(body) {
        Ok(request) => request,
        Err(err) => return UserError::Decode(err.to_string()).into_response(),
    };

    match endpoint.call(RequestContext::new(), request).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => err.into_response(),
    }
}
