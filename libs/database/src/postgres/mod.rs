//! PostgreSQL support built on sea-orm.

mod config;
mod connector;

pub use config::PostgresConfig;
pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, connect_with_options,
    connect_with_retry,
};

// Re-export the sea-orm types callers need to hold connections and errors.
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
