//! Neo Wallets Library
//!
//! Send-side logic of a Neo wallet:
//! - Sendable asset derivation from balance snapshots
//! - Transfer request validation (addresses, amounts, fees)
//! - The send workflow coordinator and its external collaborators
//! - Outcome notifications
//! - QR codes of account key material

pub mod address;
pub mod assets;
pub mod notification;
pub mod qr_codes;
pub mod send_workflow;
pub mod services;
pub mod transaction;

// Re-export main types
pub use address::{is_valid_address, to_address, validate_address, AddressError};
pub use assets::{
    derive_sendable_assets, BalanceSnapshot, BalanceSummary, BalanceValue, SendableAsset,
    SendableAssetSet, TokenBalance, GAS_SYMBOL, NEO_SYMBOL,
};
pub use notification::{Notification, NotificationKind, NotificationLog, NotificationSink};
pub use qr_codes::{ImageClipboard, KeyMaterial, KeyQrSheet, QrEncoder, QrError, QrKind};
pub use send_workflow::{
    Collaborators, ConfirmOutcome, Outcome, SendContext, SendCoordinator, SendError,
    ServiceCall, WorkflowStage, WorkflowState,
};
pub use services::{
    BalanceProvider, FeeService, MigrationContext, MigrationTrigger, ServiceError,
    SubmissionService,
};
pub use transaction::{Fee, Receipt, TransactionRequest, ValidationError};
