//! Send workflow coordinator.
//!
//! Sequences a user-initiated transfer through
//! `Idle → Composing → FeeCalculating → Submitting → Completed`, enforcing a
//! single in-flight submission per coordinator. Every external effect goes
//! through the injected [`Collaborators`]; every failure path ends in a
//! notification.

use crate::assets::{derive_sendable_assets, BalanceSnapshot, BalanceSummary, SendableAssetSet};
use crate::notification::{keys, Notification, NotificationSink};
use crate::services::{
    BalanceProvider, FeeService, MigrationContext, MigrationTrigger, ServiceError,
    SubmissionService,
};
use crate::transaction::{Fee, Receipt, TransactionRequest, ValidationError};
use neo_config::{ChainType, MigrationSettings, NetworkType, SendSettings, WalletConfig};
use parking_lot::Mutex;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// External call the workflow waits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCall {
    FeeCalculation,
    Submission,
}

impl fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceCall::FeeCalculation => write!(f, "fee calculation"),
            ServiceCall::Submission => write!(f, "submission"),
        }
    }
}

/// Send workflow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fee calculation failed: {0}")]
    FeeCalculation(ServiceError),

    #[error("Submission failed: {0}")]
    Submission(ServiceError),

    #[error("Balance refresh failed: {0}")]
    Balance(ServiceError),

    #[error("{stage} timed out after {after_ms} ms")]
    Timeout { stage: ServiceCall, after_ms: u64 },

    #[error("{stage} was abandoned before it finished")]
    Cancelled { stage: ServiceCall },

    #[error("Cannot {action} while {stage}")]
    InvalidTransition {
        action: &'static str,
        stage: WorkflowStage,
    },
}

/// Terminal result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Receipt),
    Failure(SendError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    /// The form is open; `fee` holds the last successful estimate
    Composing { fee: Option<Fee> },
    FeeCalculating,
    Submitting,
    Completed(Outcome),
}

impl WorkflowState {
    pub fn stage(&self) -> WorkflowStage {
        match self {
            WorkflowState::Idle => WorkflowStage::Idle,
            WorkflowState::Composing { .. } => WorkflowStage::Composing,
            WorkflowState::FeeCalculating => WorkflowStage::FeeCalculating,
            WorkflowState::Submitting => WorkflowStage::Submitting,
            WorkflowState::Completed(_) => WorkflowStage::Completed,
        }
    }
}

/// [`WorkflowState`] without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Idle,
    Composing,
    FeeCalculating,
    Submitting,
    Completed,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStage::Idle => write!(f, "idle"),
            WorkflowStage::Composing => write!(f, "composing"),
            WorkflowStage::FeeCalculating => write!(f, "calculating fee"),
            WorkflowStage::Submitting => write!(f, "submitting"),
            WorkflowStage::Completed => write!(f, "completed"),
        }
    }
}

/// Result of [`SendCoordinator::confirm`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Another operation was already in flight; nothing was submitted
    Ignored,
    Completed(Outcome),
}

/// Account and chain the coordinator sends from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendContext {
    pub network: NetworkType,
    pub chain: ChainType,
    pub from_address: String,
}

impl SendContext {
    pub fn new(network: NetworkType, chain: ChainType, from_address: impl Into<String>) -> Self {
        Self {
            network,
            chain,
            from_address: from_address.into(),
        }
    }
}

/// External services the coordinator delegates to
#[derive(Clone)]
pub struct Collaborators {
    pub balances: Arc<dyn BalanceProvider>,
    pub fees: Arc<dyn FeeService>,
    pub submitter: Arc<dyn SubmissionService>,
    pub migration: Arc<dyn MigrationTrigger>,
    pub notifications: Arc<dyn NotificationSink>,
}

#[derive(Default)]
struct BalanceCache {
    snapshot: Option<BalanceSnapshot>,
    sendable: SendableAssetSet,
}

/// Restores a settled state if the future awaiting `call` is dropped early
struct InFlight<'a> {
    coordinator: &'a SendCoordinator,
    call: ServiceCall,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(coordinator: &'a SendCoordinator, call: ServiceCall) -> Self {
        Self {
            coordinator,
            call,
            armed: true,
        }
    }

    fn settle(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let err = SendError::Cancelled { stage: self.call };
        warn!("{}", err);
        let key = match self.call {
            ServiceCall::FeeCalculation => {
                *self.coordinator.state.lock() = WorkflowState::Composing { fee: None };
                keys::FEE_CALCULATION_FAILED
            }
            ServiceCall::Submission => {
                *self.coordinator.state.lock() =
                    WorkflowState::Completed(Outcome::Failure(err.clone()));
                keys::TRANSACTION_INTERRUPTED
            }
        };
        self.coordinator.emit_failure(key, &err);
    }
}

enum Admission {
    Ignored,
    Rejected(SendError),
    Admitted(TransactionRequest),
}

/// Coordinates one account's send form
pub struct SendCoordinator {
    context: SendContext,
    settings: SendSettings,
    migration: MigrationSettings,
    services: Collaborators,
    state: Mutex<WorkflowState>,
    balances: Mutex<BalanceCache>,
    last_notification: Mutex<Option<Notification>>,
}

impl SendCoordinator {
    pub fn new(context: SendContext, services: Collaborators) -> Self {
        Self {
            context,
            settings: SendSettings::default(),
            migration: MigrationSettings::default(),
            services,
            state: Mutex::new(WorkflowState::Idle),
            balances: Mutex::new(BalanceCache::default()),
            last_notification: Mutex::new(None),
        }
    }

    /// Builds a coordinator for `from_address` using the wallet configuration
    pub fn from_config(
        config: &WalletConfig,
        from_address: impl Into<String>,
        services: Collaborators,
    ) -> Self {
        Self::new(
            SendContext::new(config.network, config.chain, from_address),
            services,
        )
        .with_settings(config.send.clone())
        .with_migration(config.migration.clone())
    }

    pub fn with_settings(mut self, settings: SendSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_migration(mut self, migration: MigrationSettings) -> Self {
        self.migration = migration;
        self
    }

    pub fn context(&self) -> &SendContext {
        &self.context
    }

    pub fn state(&self) -> WorkflowState {
        self.state.lock().clone()
    }

    pub fn stage(&self) -> WorkflowStage {
        self.state.lock().stage()
    }

    pub fn sendable_assets(&self) -> SendableAssetSet {
        self.balances.lock().sendable.clone()
    }

    pub fn balance_summary(&self) -> BalanceSummary {
        BalanceSummary::from_snapshot(self.balances.lock().snapshot.as_ref())
    }

    pub fn last_notification(&self) -> Option<Notification> {
        self.last_notification.lock().clone()
    }

    /// Replaces the balance snapshot and recomputes the sendable assets
    pub fn apply_snapshot(&self, snapshot: Option<BalanceSnapshot>) {
        let sendable = derive_sendable_assets(snapshot.as_ref());
        debug!("Applying balance snapshot, {} sendable assets", sendable.len());
        let mut cache = self.balances.lock();
        cache.snapshot = snapshot;
        cache.sendable = sendable;
    }

    /// Fetches fresh balances for the sending account.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn refresh_balances(&self) -> Result<SendableAssetSet, SendError> {
        let address = self.context.from_address.clone();
        match self.services.balances.fetch_balances(&address).await {
            Ok(snapshot) => {
                self.apply_snapshot(Some(snapshot));
                info!("Received balances for {}", address);
                self.emit(Notification::success(keys::RECEIVED_BLOCKCHAIN_INFO, json!({})));
                Ok(self.sendable_assets())
            }
            Err(err) => {
                warn!("Failed to fetch balances for {}: {}", address, err);
                self.emit(Notification::failure(
                    keys::BLOCKCHAIN_INFO_FAILURE,
                    json!({ "error": err.to_string() }),
                ));
                Err(SendError::Balance(err))
            }
        }
    }

    /// Opens the send form
    pub fn open(&self) -> Result<(), SendError> {
        let mut state = self.state.lock();
        match &*state {
            WorkflowState::Idle => {
                debug!("Send form opened");
                *state = WorkflowState::Composing { fee: None };
                Ok(())
            }
            WorkflowState::Composing { .. } => Ok(()),
            other => Err(SendError::InvalidTransition {
                action: "open the send form",
                stage: other.stage(),
            }),
        }
    }

    /// Closes the send form without sending
    pub fn close(&self) -> Result<(), SendError> {
        let mut state = self.state.lock();
        match &*state {
            WorkflowState::Composing { .. } | WorkflowState::Idle => {
                *state = WorkflowState::Idle;
                Ok(())
            }
            other => Err(SendError::InvalidTransition {
                action: "close the send form",
                stage: other.stage(),
            }),
        }
    }

    /// Dismisses the outcome of the last submission
    pub fn acknowledge(&self) -> Result<(), SendError> {
        let mut state = self.state.lock();
        match &*state {
            WorkflowState::Completed(_) => {
                debug!("Outcome acknowledged");
                *state = WorkflowState::Idle;
                Ok(())
            }
            other => Err(SendError::InvalidTransition {
                action: "acknowledge",
                stage: other.stage(),
            }),
        }
    }

    /// Estimates the fee of a candidate request.
    ///
    /// The workflow returns to `Composing` whatever the result; a successful
    /// estimate is kept and attached to the next confirmation that carries no
    /// fee of its own.
    pub async fn estimate_fee(&self, request: &TransactionRequest) -> Result<Fee, SendError> {
        if let Err(err) = self.begin_fee_calculation(request) {
            if matches!(err, SendError::Validation(_)) {
                self.emit_failure(keys::INVALID_TRANSACTION, &err);
            }
            return Err(err);
        }

        debug!("Calculating fee for {} {}", request.amount, request.symbol);
        let in_flight = InFlight::new(self, ServiceCall::FeeCalculation);
        let result = timeout(
            self.settings.fee_timeout(),
            self.services.fees.calculate_fee(request),
        )
        .await;
        in_flight.settle();

        let outcome = match result {
            Ok(Ok(fee)) => Ok(fee),
            Ok(Err(err)) => Err(SendError::FeeCalculation(err)),
            Err(_) => Err(SendError::Timeout {
                stage: ServiceCall::FeeCalculation,
                after_ms: self.settings.fee_timeout_ms,
            }),
        };

        *self.state.lock() = WorkflowState::Composing {
            fee: outcome.as_ref().ok().copied(),
        };

        match outcome {
            Ok(fee) => {
                info!(
                    "Estimated fee: network {} GAS, system {} GAS",
                    fee.network_fee, fee.system_fee
                );
                Ok(fee)
            }
            Err(err) => {
                warn!("Fee calculation failed: {}", err);
                self.emit_failure(keys::FEE_CALCULATION_FAILED, &err);
                Err(err)
            }
        }
    }

    /// Submits `request` on explicit user confirmation.
    ///
    /// A confirmation arriving while a fee estimate or a submission is in
    /// flight is ignored. A failed submission is terminal for this attempt;
    /// retrying needs `acknowledge`, `open` and a new confirmation. Dropping
    /// the returned future mid-submission completes the attempt as cancelled.
    pub async fn confirm(&self, request: TransactionRequest) -> Result<ConfirmOutcome, SendError> {
        let request = match self.begin_submission(request) {
            Admission::Ignored => {
                debug!("Confirmation ignored, operation already in flight");
                return Ok(ConfirmOutcome::Ignored);
            }
            Admission::Rejected(err) => {
                if matches!(err, SendError::Validation(_)) {
                    warn!("Rejected transaction request: {}", err);
                    self.emit_failure(keys::INVALID_TRANSACTION, &err);
                }
                return Err(err);
            }
            Admission::Admitted(request) => request,
        };

        info!(
            "Submitting {} {} to {}",
            request.amount, request.symbol, request.to_address
        );
        let in_flight = InFlight::new(self, ServiceCall::Submission);
        let result = timeout(
            self.settings.submit_timeout(),
            self.services.submitter.submit(&request),
        )
        .await;
        in_flight.settle();

        let outcome = match result {
            Ok(Ok(receipt)) => Outcome::Success(receipt),
            Ok(Err(err)) => Outcome::Failure(SendError::Submission(err)),
            Err(_) => Outcome::Failure(SendError::Timeout {
                stage: ServiceCall::Submission,
                after_ms: self.settings.submit_timeout_ms,
            }),
        };

        *self.state.lock() = WorkflowState::Completed(outcome.clone());

        match &outcome {
            Outcome::Success(receipt) => {
                info!("Transaction {} submitted", receipt.tx_hash);
                self.emit(Notification::success(
                    keys::TRANSACTION_SENT,
                    json!({
                        "txHash": receipt.tx_hash,
                        "symbol": request.symbol,
                        "amount": request.amount.to_string(),
                        "to": request.to_address,
                    }),
                ));
                if let Some(context) = self.migration_context(&request, receipt) {
                    info!("Triggering migration for transaction {}", context.tx_hash);
                    self.services.migration.perform_migration(context);
                }
            }
            Outcome::Failure(err) => {
                warn!("Transaction submission failed: {}", err);
                let key = match err {
                    SendError::Timeout { .. } => keys::TRANSACTION_TIMED_OUT,
                    _ => keys::TRANSACTION_FAILED,
                };
                self.emit_failure(key, err);
            }
        }

        Ok(ConfirmOutcome::Completed(outcome))
    }

    fn begin_fee_calculation(&self, request: &TransactionRequest) -> Result<(), SendError> {
        let sendable = self.sendable_assets();
        let mut state = self.state.lock();
        if !matches!(&*state, WorkflowState::Composing { .. }) {
            return Err(SendError::InvalidTransition {
                action: "estimate a fee",
                stage: state.stage(),
            });
        }
        // Fee sufficiency is checked on confirmation.
        let candidate = TransactionRequest {
            fee: None,
            ..request.clone()
        };
        candidate.validate(self.context.chain, &sendable)?;
        *state = WorkflowState::FeeCalculating;
        Ok(())
    }

    fn begin_submission(&self, mut request: TransactionRequest) -> Admission {
        let sendable = self.sendable_assets();
        let mut state = self.state.lock();
        let estimated = match &*state {
            WorkflowState::FeeCalculating | WorkflowState::Submitting => return Admission::Ignored,
            WorkflowState::Composing { fee } => *fee,
            other => {
                return Admission::Rejected(SendError::InvalidTransition {
                    action: "confirm",
                    stage: other.stage(),
                })
            }
        };

        if request.fee.is_none() {
            request.fee = estimated;
        }
        if let Err(err) = request.validate(self.context.chain, &sendable) {
            return Admission::Rejected(err.into());
        }

        *state = WorkflowState::Submitting;
        Admission::Admitted(request)
    }

    fn migration_context(
        &self,
        request: &TransactionRequest,
        receipt: &Receipt,
    ) -> Option<MigrationContext> {
        if !self.migration.enabled
            || self.context.chain != ChainType::Legacy
            || !self.migration.covers_asset(&request.symbol)
        {
            return None;
        }
        let swap_address = self.migration.swap_address.as_deref()?.trim();
        if request.to_address != swap_address {
            return None;
        }
        Some(MigrationContext {
            tx_hash: receipt.tx_hash.clone(),
            symbol: request.symbol.clone(),
            amount: request.amount,
            from_address: request.from_address.clone(),
            swap_address: swap_address.to_string(),
            network: self.context.network,
            chain: self.context.chain,
        })
    }

    fn emit_failure(&self, message_key: &str, err: &SendError) {
        self.emit(Notification::failure(
            message_key,
            json!({ "error": err.to_string() }),
        ));
    }

    fn emit(&self, notification: Notification) {
        *self.last_notification.lock() = Some(notification.clone());
        self.services.notifications.notify(notification);
    }
}
