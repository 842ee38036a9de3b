//! Logging setup for the command line tool.
//!
//! The library only emits `tracing` events. `ng-template-check` installs a
//! subscriber when `NG_LS_LOG` (or `RUST_LOG`) is set:
//!
//! ```bash
//! NG_LS_LOG=debug ng-template-check project.json
//! NG_LS_LOG=angular_language_service::service=debug NG_LS_LOG_FORMAT=json ng-template-check project.json
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("NG_LS_LOG_FORMAT").unwrap_or_default())
    }
}

/// `NG_LS_LOG` wins over `RUST_LOG`; both use the `RUST_LOG` syntax.
fn build_filter() -> EnvFilter {
    match std::env::var("NG_LS_LOG") {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Installs the global subscriber, writing to stderr. Does nothing unless
/// logging was requested through the environment.
pub fn init_tracing() {
    if std::env::var("NG_LS_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
