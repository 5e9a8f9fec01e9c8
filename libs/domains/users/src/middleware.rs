use std::time::Instant;

use tracing::{info, warn};

use crate::endpoint::{Endpoint, Middleware};

/// Emits one structured record per endpoint call with the operation name,
/// request id, outcome and elapsed time. The wrapped result passes through
/// untouched.
pub struct LoggingMiddleware {
    operation: &'static str,
}

impl LoggingMiddleware {
    pub fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}

impl<Req, Res> Middleware<Req, Res> for LoggingMiddleware
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    fn wrap(&self, next: Endpoint<Req, Res>) -> Endpoint<Req, Res> {
        let operation = self.operation;
        Endpoint::new(move |cx, req| {
            let next = next.clone();
            async move {
                let started = Instant::now();
                let result = next.call(cx.clone(), req).await;
                let elapsed_ms = started.elapsed().as_millis() as u64;
                match &result {
                    Ok(_) => {
                        info!(
                            operation,
                            request_id = %cx.request_id(),
                            elapsed_ms,
                            "Endpoint completed"
                        );
                    }
                    Err(err) => {
                        warn!(
                            operation,
                            request_id = %cx.request_id(),
                            elapsed_ms,
                            error = %err,
                            "Endpoint failed"
                        );
                    }
                }
                result
            }
        })
    }
}
