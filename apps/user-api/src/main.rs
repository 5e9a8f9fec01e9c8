use axum_helpers::{ShutdownCoordinator, health_router, serve_until};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::DatabaseConnection;
use domain_users::handlers::{self, GrpcUserService};
use domain_users::{LoggingMiddleware, PostgresUserRepository, UserEndpoints, UserService};
use rpc::user::user_service_client::UserServiceClient;
use rpc::user::user_service_server::UserServiceServer;
use tokio::task::JoinSet;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    run(config).await
}

async fn run(config: Config) -> eyre::Result<()> {
    let coordinator = ShutdownCoordinator::new();
    let mut servers: JoinSet<eyre::Result<()>> = JoinSet::new();
    let mut db: Option<DatabaseConnection> = None;

    if config.transport.needs_database() {
        let postgres = config
            .database
            .clone()
            .ok_or_else(|| eyre::eyre!("database configuration is required for this transport mode"))?;

        info!("Connecting to database...");
        let connection = database::postgres::connect_from_config_with_retry(postgres, None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
        let endpoints = build_endpoints(connection.clone());
        db = Some(connection);

        if config.transport.serves_http() {
            let router = health_router()
                .merge(handlers::router(endpoints.clone()))
                .layer(TraceLayer::new_for_http());
            let server_config = config.server.clone();
            let shutdown = coordinator.clone();
            servers.spawn(async move {
                serve_until(router, &server_config, shutdown.notified())
                    .await
                    .map_err(|e| eyre::eyre!("HTTP server failed: {}", e))
            });
        }

        if config.transport.serves_grpc() {
            let grpc_config = config.grpc.clone();
            let addr = grpc_config
                .socket_addr()
                .map_err(|e| eyre::eyre!("Invalid gRPC listen address: {}", e))?;

            let mut service = UserServiceServer::new(GrpcUserService::new(endpoints))
                .max_decoding_message_size(grpc_config.max_decoding_message_size)
                .max_encoding_message_size(grpc_config.max_encoding_message_size);
            if grpc_config.enable_compression {
                service = service
                    .accept_compressed(CompressionEncoding::Zstd)
                    .send_compressed(CompressionEncoding::Zstd);
            }

            let shutdown = coordinator.clone();
            servers.spawn(async move {
                info!("UserService gRPC listening on {}", addr);
                Server::builder()
                    .add_service(service)
                    .serve_with_shutdown(addr, shutdown.notified())
                    .await
                    .map_err(|e| eyre::eyre!("gRPC server failed: {}", e))
            });
        }
    }

    if config.transport.serves_gateway() {
        info!("Gateway proxying to {}", config.grpc_upstream);
        // Lazy so the gateway can come up before the upstream listener binds.
        let channel = grpc_client::create_channel_lazy(config.grpc_upstream.clone())?;
        let router = health_router()
            .merge(handlers::gateway_router(UserServiceClient::new(channel)))
            .layer(TraceLayer::new_for_http());
        let gateway_config = config.gateway.clone();
        let shutdown = coordinator.clone();
        servers.spawn(async move {
            serve_until(router, &gateway_config, shutdown.notified())
                .await
                .map_err(|e| eyre::eyre!("Gateway server failed: {}", e))
        });
    }

    let signal_coordinator = coordinator.clone();
    tokio::spawn(async move { signal_coordinator.wait_for_signal().await });

    // The first listener to fail takes the rest down with it.
    let mut failure: Option<eyre::Report> = None;
    while let Some(joined) = servers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                coordinator.shutdown();
                failure.get_or_insert(err);
            }
            Err(err) => {
                coordinator.shutdown();
                failure.get_or_insert_with(|| eyre::eyre!("Server task panicked: {}", err));
            }
        }
    }

    if let Some(db) = db {
        let _ = db.close().await;
    }

    match failure {
        Some(err) => Err(err),
        None => {
            info!("All servers stopped");
            Ok(())
        }
    }
}

/// Wire repository, service and endpoints, with request logging around every
/// operation.
fn build_endpoints(db: DatabaseConnection) -> UserEndpoints {
    let service = UserService::new(PostgresUserRepository::new(db));
    let endpoints = UserEndpoints::new(service);
    UserEndpoints {
        register: endpoints.register.layer(&LoggingMiddleware::new("register")),
        login: endpoints.login.layer(&LoggingMiddleware::new("login")),
    }
}
