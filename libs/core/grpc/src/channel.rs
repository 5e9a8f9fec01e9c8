use crate::error::{GrpcError, GrpcResult};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// Configuration for gRPC channel creation.
///
/// Defaults carry the HTTP/2 tuning used across the workspace: keep-alive on
/// a 30s interval, 1MB windows, adaptive flow control, TCP nodelay.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub http2_keep_alive_interval: Option<Duration>,
    pub keep_alive_timeout: Duration,
    pub keep_alive_while_idle: bool,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub initial_connection_window_size: Option<u32>,
    pub initial_stream_window_size: Option<u32>,
    pub http2_adaptive_window: bool,
    pub tcp_nodelay: bool,
    pub tcp_keepalive: Option<Duration>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            http2_keep_alive_interval: Some(Duration::from_secs(30)),
            keep_alive_timeout: Duration::from_secs(10),
            keep_alive_while_idle: true,
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
            initial_connection_window_size: Some(1024 * 1024),
            initial_stream_window_size: Some(1024 * 1024),
            http2_adaptive_window: true,
            tcp_nodelay: true,
            tcp_keepalive: Some(Duration::from_secs(30)),
        }
    }
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override how long connection establishment may take.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the per-RPC deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parse `addr` and apply the channel tuning to the resulting endpoint.
fn build_endpoint(addr: String, config: &ChannelConfig) -> GrpcResult<Endpoint> {
    let mut endpoint = Endpoint::from_shared(addr.clone())
        .map_err(|e| {
            tracing::error!(addr = %addr, error = ?e, "Malformed channel address");
            GrpcError::InvalidUri(e)
        })?
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .keep_alive_timeout(config.keep_alive_timeout)
        .keep_alive_while_idle(config.keep_alive_while_idle)
        .http2_adaptive_window(config.http2_adaptive_window)
        .tcp_nodelay(config.tcp_nodelay)
        .tcp_keepalive(config.tcp_keepalive)
        .initial_connection_window_size(config.initial_connection_window_size)
        .initial_stream_window_size(config.initial_stream_window_size);

    if let Some(interval) = config.http2_keep_alive_interval {
        endpoint = endpoint.http2_keep_alive_interval(interval);
    }

    Ok(endpoint)
}

/// Creates a gRPC channel, connecting eagerly with default settings.
pub async fn create_channel(addr: impl Into<String>) -> GrpcResult<Channel> {
    create_channel_with_config(addr, ChannelConfig::default()).await
}

/// Creates a gRPC channel with custom configuration.
pub async fn create_channel_with_config(
    addr: impl Into<String>,
    config: ChannelConfig,
) -> GrpcResult<Channel> {
    let addr = addr.into();
    let endpoint = build_endpoint(addr.clone(), &config)?;

    tracing::debug!(addr = %addr, "Connecting gRPC channel");
    endpoint.connect().await.map_err(|e| {
        tracing::error!(addr = %addr, error = ?e, "Channel connection failed");
        GrpcError::ConnectionFailed(e)
    })
}

/// Creates a lazy gRPC channel that connects on first request.
///
/// Returns immediately without touching the network, which lets the gateway
/// start before the RPC listener it fronts is accepting.
pub fn create_channel_lazy(addr: impl Into<String>) -> GrpcResult<Channel> {
    create_channel_lazy_with_config(addr, ChannelConfig::default())
}

/// Creates a lazy gRPC channel with custom configuration.
pub fn create_channel_lazy_with_config(
    addr: impl Into<String>,
    config: ChannelConfig,
) -> GrpcResult<Channel> {
    let addr = addr.into();
    let endpoint = build_endpoint(addr.clone(), &config)?;

    tracing::debug!(addr = %addr, "Opened lazy gRPC channel");
    Ok(endpoint.connect_lazy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_uri() {
        let result = create_channel("not a valid uri").await;
        assert!(matches!(result, Err(GrpcError::InvalidUri(_))));
    }

    #[tokio::test]
    async fn test_lazy_channel_needs_no_listener() {
        // connect_lazy never touches the network, so any well-formed URI works
        let result = create_channel_lazy("http://[::1]:50051");
        assert!(result.is_ok());
    }

    #[test]
    fn test_lazy_channel_invalid_uri() {
        let result = create_channel_lazy("not a valid uri");
        assert!(matches!(result, Err(GrpcError::InvalidUri(_))));
    }

    #[tokio::test]
    async fn test_custom_timeouts_apply() {
        let config = ChannelConfig::new()
            .with_connect_timeout(Duration::from_secs(1))
            .with_request_timeout(Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(2));

        let result = create_channel_lazy_with_config("http://[::1]:50051", config);
        assert!(result.is_ok());
    }
}
