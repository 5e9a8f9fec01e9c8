use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors raised while building or connecting gRPC channels
#[derive(Error, Debug)]
pub enum GrpcError {
    /// The address did not parse as a URI
    #[error("malformed gRPC address: {0}")]
    InvalidUri(#[from] tonic::transport::Error),

    /// The eager connect to the endpoint did not succeed
    #[error("gRPC connection failed: {0}")]
    ConnectionFailed(tonic::transport::Error),
}
