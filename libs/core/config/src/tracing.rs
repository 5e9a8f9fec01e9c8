use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the color-eyre panic and error report hooks.
///
/// Call this early in main() before any fallible operations so error reports
/// come out colored and located. Safe to call multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with environment-aware output.
///
/// - **Production** (`APP_ENV=production`): JSON format with flattened event
///   fields, targets hidden, for log aggregation.
/// - **Development** (default): pretty-printed, human-readable.
///
/// Both variants install `tracing_error::ErrorLayer` so eyre reports carry
/// span traces. `RUST_LOG` overrides the default filter
/// (e.g. `RUST_LOG=debug` or `RUST_LOG=user_api=trace,sea_orm=warn`).
///
/// Safe to call multiple times: if a subscriber is already installed the call
/// is a no-op, which keeps tests that share a process happy.
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("info,tower_http=warn,sea_orm=warn")
        } else {
            EnvFilter::new("debug")
        }
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => {
            info!("Tracing initialized. Environment: {:?}", environment);
        }
        Err(_) => {
            // Already initialized, common in tests
            debug!("Subscriber already set, leaving it in place");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // try_init must tolerate any call order here, all four tests share one
    // process and only the first installer wins.

    #[test]
    fn test_development_init_does_not_panic() {
        init_tracing(&Environment::Development);
    }

    #[test]
    fn test_production_init_does_not_panic() {
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_repeated_init_is_a_noop() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Development);
    }

    #[test]
    fn test_rust_log_override_is_accepted() {
        temp_env::with_var("RUST_LOG", Some("warn,sea_orm=debug"), || {
            init_tracing(&Environment::Development);
        });
    }
}
