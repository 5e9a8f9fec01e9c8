//! # gRPC Client Library
//!
//! Channel creation and server configuration shared by the gRPC pieces of the
//! workspace: the account RPC listener and the JSON gateway that dials it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_client::create_channel_lazy;
//! use rpc::user::user_service_client::UserServiceClient;
//!
//! // Returns immediately; the connection is made on the first RPC.
//! let channel = create_channel_lazy("http://[::1]:50051")?;
//! let client = UserServiceClient::new(channel);
//! ```

pub mod channel;
pub mod error;
pub mod server;

pub use channel::{ChannelConfig, create_channel, create_channel_lazy};
pub use error::{GrpcError, GrpcResult};
pub use server::GrpcServerConfig;
