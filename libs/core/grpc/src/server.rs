//! Listener settings for the tonic server, sourced from the environment.

use core_config::{ConfigError, FromEnv, env_or_default};
use std::net::SocketAddr;

/// Configuration for a gRPC listener.
#[derive(Debug, Clone)]
pub struct GrpcServerConfig {
    /// Bind host, `[::1]` unless overridden.
    pub host: String,
    /// Bind port, 50051 unless overridden.
    pub port: u16,
    /// Whether responses are Zstd-compressed and compressed requests accepted.
    pub enable_compression: bool,
    /// Upper bound on inbound message size in bytes.
    pub max_decoding_message_size: usize,
    /// Upper bound on outbound message size in bytes.
    pub max_encoding_message_size: usize,
}

const DEFAULT_MAX_MESSAGE_BYTES: usize = 8 * 1024 * 1024;

impl Default for GrpcServerConfig {
    fn default() -> Self {
        Self {
            host: "[::1]".to_owned(),
            port: 50051,
            enable_compression: true,
            max_decoding_message_size: DEFAULT_MAX_MESSAGE_BYTES,
            max_encoding_message_size: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl FromEnv for GrpcServerConfig {
    /// Reads `GRPC_HOST`, `GRPC_PORT`, `GRPC_COMPRESSION` and
    /// `GRPC_MAX_MESSAGE_SIZE`, falling back to the [`Default`] values.
    /// Compression is on unless the variable is literally `false` or `0`.
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("GRPC_HOST", "[::1]");
        let port = env_or_default("GRPC_PORT", "50051")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "GRPC_PORT".to_owned(),
                details: format!("{}", e),
            })?;
        let enable_compression = std::env::var("GRPC_COMPRESSION")
            .map(|v| !matches!(v.as_str(), "false" | "0"))
            .unwrap_or(true);
        let max_message_size = env_or_default(
            "GRPC_MAX_MESSAGE_SIZE",
            &DEFAULT_MAX_MESSAGE_BYTES.to_string(),
        )
        .parse()
        .map_err(|e| ConfigError::ParseError {
            key: "GRPC_MAX_MESSAGE_SIZE".to_owned(),
            details: format!("{}", e),
        })?;

        Ok(Self {
            host,
            port,
            enable_compression,
            max_decoding_message_size: max_message_size,
            max_encoding_message_size: max_message_size,
        })
    }
}

impl GrpcServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_compression(mut self, enable: bool) -> Self {
        self.enable_compression = enable;
        self
    }

    /// Parsed bind address for `Server::serve`.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Bind address rendered for log lines and client URLs.
    pub fn addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_give_local_v6_listener() {
        let config = GrpcServerConfig::default();
        assert_eq!(config.addr_string(), "[::1]:50051");
        assert!(config.enable_compression);
        assert_eq!(config.max_decoding_message_size, 8_388_608);
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_builders_replace_each_field() {
        let config = GrpcServerConfig::new()
            .with_host("0.0.0.0")
            .with_port(6000)
            .with_compression(false);

        assert_eq!(config.addr_string(), "0.0.0.0:6000");
        assert!(!config.enable_compression);
    }

    #[test]
    fn test_env_values_win_over_defaults() {
        temp_env::with_vars(
            [
                ("GRPC_HOST", Some("[::]")),
                ("GRPC_PORT", Some("50060")),
                ("GRPC_COMPRESSION", Some("0")),
            ],
            || {
                let config = GrpcServerConfig::from_env().unwrap();
                assert_eq!(config.host, "[::]");
                assert_eq!(config.port, 50060);
                assert!(!config.enable_compression);
            },
        );
    }

    #[test]
    fn test_unparseable_port_names_the_key() {
        temp_env::with_var("GRPC_PORT", Some("fifty"), || {
            let err = GrpcServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("GRPC_PORT"));
        });
    }
}
