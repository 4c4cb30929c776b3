//! Transfer requests, fees and receipts.

use crate::address::{validate_address, AddressError};
use crate::assets::{SendableAssetSet, GAS_SYMBOL, NEO_SYMBOL};
use neo_config::ChainType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a request cannot leave the compose step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid sender address: {0}")]
    InvalidFromAddress(AddressError),

    #[error("Invalid recipient address: {0}")]
    InvalidToAddress(AddressError),

    #[error("Asset {0} is not sendable from this account")]
    AssetNotSendable(String),

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("NEO is indivisible, got amount {0}")]
    FractionalNeo(Decimal),

    #[error("Insufficient {symbol} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        symbol: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Fee must not be negative")]
    NegativeFee,

    #[error("Fee total overflows")]
    FeeOverflow,

    #[error("Insufficient GAS for fee: required {required}, available {available}")]
    InsufficientGasForFee {
        required: Decimal,
        available: Decimal,
    },
}

/// Network and system fee of a transaction, both denominated in GAS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fee {
    pub network_fee: Decimal,
    pub system_fee: Decimal,
}

impl Fee {
    pub fn new(network_fee: Decimal, system_fee: Decimal) -> Self {
        Self {
            network_fee,
            system_fee,
        }
    }

    /// Sum of both parts, `None` on overflow
    pub fn total(&self) -> Option<Decimal> {
        self.network_fee.checked_add(self.system_fee)
    }
}

/// A single outgoing transfer as composed by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from_address: String,
    pub to_address: String,
    pub symbol: String,
    pub amount: Decimal,
    pub fee: Option<Fee>,
}

impl TransactionRequest {
    /// Builds a request, trimming whitespace around both addresses
    pub fn new(
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        symbol: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            from_address: from_address.into().trim().to_string(),
            to_address: to_address.into().trim().to_string(),
            symbol: symbol.into(),
            amount,
            fee: None,
        }
    }

    pub fn with_fee(mut self, fee: Fee) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Checks the request against the chain's address format and the
    /// account's sendable assets.
    pub fn validate(&self, chain: ChainType, sendable: &SendableAssetSet) -> Result<(), ValidationError> {
        let version = chain.address_version();
        validate_address(&self.from_address, version).map_err(ValidationError::InvalidFromAddress)?;
        validate_address(&self.to_address, version).map_err(ValidationError::InvalidToAddress)?;

        let asset = sendable
            .get(&self.symbol)
            .ok_or_else(|| ValidationError::AssetNotSendable(self.symbol.clone()))?;

        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.symbol == NEO_SYMBOL && !self.amount.fract().is_zero() {
            return Err(ValidationError::FractionalNeo(self.amount));
        }
        if self.amount > asset.balance {
            return Err(ValidationError::InsufficientBalance {
                symbol: self.symbol.clone(),
                requested: self.amount,
                available: asset.balance,
            });
        }

        if let Some(fee) = &self.fee {
            if fee.network_fee < Decimal::ZERO || fee.system_fee < Decimal::ZERO {
                return Err(ValidationError::NegativeFee);
            }
            let gas = sendable
                .get(GAS_SYMBOL)
                .map(|asset| asset.balance)
                .unwrap_or(Decimal::ZERO);
            let spent_gas = if self.symbol == GAS_SYMBOL {
                self.amount
            } else {
                Decimal::ZERO
            };
            let required = fee.total().ok_or(ValidationError::FeeOverflow)?;
            let available = gas - spent_gas;
            if required > available {
                return Err(ValidationError::InsufficientGasForFee {
                    required,
                    available,
                });
            }
        }

        Ok(())
    }
}

/// Confirmation returned by a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: String,
}

impl Receipt {
    pub fn new(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
        }
    }
}
