//! # Neo-Send: the send side of a Neo wallet
//!
//! Derives which assets an account can send and drives the send form
//! through fee estimation, submission and the optional legacy-chain
//! migration follow-up.
//!
//! - [`neo_config`] - Network, chain and workflow configuration
//! - [`neo_wallets`] - Sendable assets, request validation and the send coordinator
//!
//! ```rust,no_run
//! use neo_send::prelude::*;
//!
//! # fn services() -> Collaborators { unimplemented!() }
//! # async fn run() -> anyhow::Result<()> {
//! let config = neo_send::load_config("wallet.toml")?;
//! let _logging = neo_send::init_tracing(&config.logging)?;
//!
//! let coordinator = SendCoordinator::from_config(&config, "N...", services());
//! coordinator.refresh_balances().await?;
//! coordinator.open()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

pub use neo_config as config;
pub use neo_wallets as wallets;

/// Common imports for wallet integrations
pub mod prelude {
    pub use crate::config::{ChainType, NetworkType, WalletConfig};
    pub use crate::wallets::{
        derive_sendable_assets, BalanceProvider, BalanceSnapshot, Collaborators, ConfirmOutcome,
        FeeService, MigrationTrigger, Notification, NotificationSink, Outcome, SendCoordinator,
        SendError, SubmissionService, TransactionRequest, WorkflowState,
    };
}

/// Whether a global subscriber was installed by [`init_tracing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingHandle {
    /// False when logging is inactive or another subscriber was already set
    pub installed: bool,
}

/// Loads and validates the wallet configuration file at `path`
pub fn load_config(path: impl AsRef<Path>) -> Result<config::WalletConfig> {
    let path = path.as_ref();
    config::WalletConfig::load(path)
        .with_context(|| format!("failed to load wallet config {}", path.display()))
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. Calling this again after a
/// subscriber is installed is not an error.
pub fn init_tracing(logging: &config::LoggingSettings) -> Result<LoggingHandle> {
    if !logging.active {
        return Ok(LoggingHandle { installed: false });
    }

    let level = logging.level.trim();
    if level.is_empty() {
        anyhow::bail!("log level must not be empty");
    }
    let filter_spec = format!("{level},neo_wallets={level}");
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&filter_spec))
        .with_context(|| format!("invalid log level {}", level))?;

    let builder = fmt().with_env_filter(env_filter).with_writer(io::stderr);

    let installed = match logging.format.to_ascii_lowercase().as_str() {
        "json" => builder.json().try_init().is_ok(),
        "pretty" => builder.pretty().try_init().is_ok(),
        _ => builder.try_init().is_ok(),
    };

    if installed {
        tracing::info!("Logging initialized at level {} ({})", level, logging.format);
    }

    Ok(LoggingHandle { installed })
}
