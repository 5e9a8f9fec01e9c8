use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::UserResult;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub type EndpointFuture<Res> = Pin<Box<dyn Future<Output = UserResult<Res>> + Send>>;

/// One business operation as a uniform, transport-independent callable.
///
/// The request and response shapes are fixed by the type parameters, so
/// wiring an endpoint to the wrong transport handler is a compile error
/// rather than a runtime downcast failure.
pub struct Endpoint<Req, Res> {
    inner: Arc<dyn Fn(RequestContext, Req) -> EndpointFuture<Res> + Send + Sync>,
}

impl<Req, Res> Clone for Endpoint<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Req, Res> Endpoint<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(RequestContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = UserResult<Res>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |cx, req| Box::pin(f(cx, req))),
        }
    }

    pub async fn call(&self, cx: RequestContext, req: Req) -> UserResult<Res> {
        (self.inner)(cx, req).await
    }

    /// Wrap this endpoint; the middleware applied last runs outermost.
    pub fn layer<M: Middleware<Req, Res>>(self, middleware: &M) -> Self {
        middleware.wrap(self)
    }
}

/// Decorates an endpoint without changing its shape.
pub trait Middleware<Req, Res>: Send + Sync {
    fn wrap(&self, next: Endpoint<Req, Res>) -> Endpoint<Req, Res>;
}

/// The account operations lifted to endpoints, one field per operation.
#[derive(Clone)]
pub struct UserEndpoints {
    pub register: Endpoint<RegisterRequest, RegisterResponse>,
    pub login: Endpoint<LoginRequest, LoginResponse>,
}

impl UserEndpoints {
    pub fn new<R: UserRepository + 'static>(service: UserService<R>) -> Self {
        let register_service = service.clone();
        let register = Endpoint::new(move |cx: RequestContext, req: RegisterRequest| {
            let service = register_service.clone();
            async move {
                let status = service.register(&cx, &req.email, &req.passwords).await?;
                Ok(RegisterResponse { status })
            }
        });

        let login = Endpoint::new(move |cx: RequestContext, req: LoginRequest| {
            let service = service.clone();
            async move {
                let status = service.login(&cx, &req.email, &req.passwords).await?;
                Ok(LoginResponse { status })
            }
        });

        Self { register, login }
    }
}
