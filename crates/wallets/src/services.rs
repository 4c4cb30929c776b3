//! External collaborators of the send workflow.
//!
//! The workflow never talks to the network itself; balances, fees,
//! submission and migration are all behind these traits and injected at
//! construction.

use crate::assets::BalanceSnapshot;
use crate::transaction::{Fee, Receipt, TransactionRequest};
use async_trait::async_trait;
use neo_config::{ChainType, NetworkType};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Errors reported by external services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Rejected by node: {0}")]
    Rejected(String),

    #[error("{0}")]
    Other(String),
}

/// Supplies the balances of an account
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    async fn fetch_balances(&self, address: &str) -> Result<BalanceSnapshot, ServiceError>;
}

/// Estimates the fee of a candidate transfer
#[async_trait]
pub trait FeeService: Send + Sync {
    async fn calculate_fee(&self, request: &TransactionRequest) -> Result<Fee, ServiceError>;
}

/// Relays a transfer to the network. Not idempotent; callers submit at most once.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, request: &TransactionRequest) -> Result<Receipt, ServiceError>;
}

/// What a migration follow-up needs to know about the transfer that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationContext {
    pub tx_hash: String,
    pub symbol: String,
    pub amount: Decimal,
    pub from_address: String,
    pub swap_address: String,
    pub network: NetworkType,
    pub chain: ChainType,
}

/// Starts a migration. Fire-and-forget: the caller does not wait for it.
pub trait MigrationTrigger: Send + Sync {
    fn perform_migration(&self, context: MigrationContext);
}
