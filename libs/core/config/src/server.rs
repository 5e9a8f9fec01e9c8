use crate::{ConfigError, FromEnv, env_or_default};
use std::net::Ipv4Addr;

/// Listen configuration for an HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// `host:port` form, as expected by `TcpListener::bind`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reads `<PREFIX>HOST` / `<PREFIX>PORT`, so several HTTP listeners can
    /// coexist in one process (e.g. the gateway next to the main API).
    pub fn from_env_prefixed(prefix: &str, default_port: u16) -> Result<Self, ConfigError> {
        let host_key = format!("{prefix}HOST");
        let port_key = format!("{prefix}PORT");

        let host = env_or_default(&host_key, &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default(&port_key, &default_port.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: port_key,
                details: format!("{}", e),
            })?;

        Ok(Self { host, port })
    }
}

impl FromEnv for ServerConfig {
    /// `HOST` (default `0.0.0.0`, all interfaces) and `PORT` (default 8080).
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_prefixed("", 8080)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_env_falls_back_to_defaults() {
        temp_env::with_vars([("HOST", None::<&str>), ("PORT", None::<&str>)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.host, Ipv4Addr::UNSPECIFIED.to_string());
            assert_eq!(config.port, 8080);
            assert_eq!(config.address(), "0.0.0.0:8080");
        });
    }

    #[test]
    fn test_env_overrides_host_and_port() {
        temp_env::with_vars([("HOST", Some("10.0.0.7")), ("PORT", Some("4410"))], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address(), "10.0.0.7:4410");
        });
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        temp_env::with_var("PORT", Some("eighty"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_port_beyond_u16_is_rejected() {
        temp_env::with_var("PORT", Some("70000"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_prefixed_lookup_uses_prefixed_keys() {
        temp_env::with_vars(
            [
                ("GATEWAY_HOST", Some("127.0.0.1")),
                ("GATEWAY_PORT", Some("8081")),
            ],
            || {
                let config = ServerConfig::from_env_prefixed("GATEWAY_", 8081).unwrap();
                assert_eq!(config.address(), "127.0.0.1:8081");
            },
        );
    }

    #[test]
    fn test_prefixed_lookup_has_its_own_default_port() {
        temp_env::with_vars(
            [("GATEWAY_HOST", None::<&str>), ("GATEWAY_PORT", None::<&str>)],
            || {
                let config = ServerConfig::from_env_prefixed("GATEWAY_", 8081).unwrap();
                assert_eq!(config.host, Ipv4Addr::UNSPECIFIED.to_string());
                assert_eq!(config.port, 8081);
            },
        );
    }

    #[test]
    fn test_address_joins_host_and_port() {
        let config = ServerConfig::new("localhost".to_owned(), 9090);
        assert_eq!(config.address(), "localhost:9090");
    }

    #[test]
    fn test_default_binds_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(config.host, Ipv4Addr::UNSPECIFIED.to_string());
        assert_eq!(config.port, 8080);
    }
}
