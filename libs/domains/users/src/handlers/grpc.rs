use rpc::user::user_service_server::UserService;
use tonic::{Request, Response, Status};

use crate::context::RequestContext;
use crate::endpoint::UserEndpoints;
use crate::models;

/// Tonic service backed by the same endpoints the JSON router uses, so both
/// transports share one code path behind the decode step.
#[derive(Clone)]
pub struct GrpcUserService {
    endpoints: UserEndpoints,
}

impl GrpcUserService {
    pub fn new(endpoints: UserEndpoints) -> Self {
        Self { endpoints }
    }
}

#[tonic::async_trait]
impl UserService for GrpcUserService {
    async fn register(
        &self,
        request: Request<rpc::user::RegisterRequest>,
    ) -> Result<Response<rpc::user::RegisterResponse>, Status> {
        let req = request.into_inner();
        let response = self
            .endpoints
            .register
            .call(
                RequestContext::new(),
                models::RegisterRequest {
                    email: req.email,
                    passwords: req.passwords,
                },
            )
            .await?;

        Ok(Response::new(rpc::user::RegisterResponse {
            status: response.status,
        }))
    }

    async fn login(
        &self,
        request: Request<rpc::user::LoginRequest>,
    ) -> Result<Response<rpc::user::LoginResponse>, Status> {
        let req = request.into_inner();
        let response = self
            .endpoints
            .login
            .call(
                RequestContext::new(),
                models::LoginRequest {
                    email: req.email,
                    passwords: req.passwords,
                },
            )
            .await?;

        Ok(Response::new(rpc::user::LoginResponse {
            status: response.status,
        }))
    }
}
