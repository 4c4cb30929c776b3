//! Balance snapshots and the derivation of sendable assets.
//!
//! A [`BalanceSnapshot`] is whatever the balance provider last reported for
//! an account. [`derive_sendable_assets`] turns it into the
//! [`SendableAssetSet`] offered on the send screen: every asset whose
//! balance is strictly positive. Values that failed to parse are kept in
//! the snapshot but never pass the positivity test.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Symbol of the NEO governance token
pub const NEO_SYMBOL: &str = "NEO";
/// Symbol of the GAS utility token
pub const GAS_SYMBOL: &str = "GAS";

/// A single balance as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceValue {
    Amount(Decimal),
    /// Non-numeric or non-finite input
    Malformed,
}

impl BalanceValue {
    /// The amount if it is well formed and strictly positive
    pub fn positive(&self) -> Option<Decimal> {
        match self {
            BalanceValue::Amount(amount) if *amount > Decimal::ZERO => Some(*amount),
            _ => None,
        }
    }

    /// The amount, reading malformed values as zero
    pub fn or_zero(&self) -> Decimal {
        match self {
            BalanceValue::Amount(amount) => *amount,
            BalanceValue::Malformed => Decimal::ZERO,
        }
    }

    fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(number) => Decimal::from_str(&number.to_string())
                .or_else(|_| Decimal::from_scientific(&number.to_string()))
                .map(BalanceValue::Amount)
                .unwrap_or(BalanceValue::Malformed),
            serde_json::Value::String(text) => Decimal::from_str(text.trim())
                .map(BalanceValue::Amount)
                .unwrap_or(BalanceValue::Malformed),
            serde_json::Value::Object(fields) => fields
                .get("balance")
                .map(BalanceValue::from_json)
                .unwrap_or(BalanceValue::Malformed),
            _ => BalanceValue::Malformed,
        }
    }
}

impl From<Decimal> for BalanceValue {
    fn from(amount: Decimal) -> Self {
        BalanceValue::Amount(amount)
    }
}

impl From<f64> for BalanceValue {
    fn from(amount: f64) -> Self {
        Decimal::from_f64(amount)
            .map(BalanceValue::Amount)
            .unwrap_or(BalanceValue::Malformed)
    }
}

impl From<i32> for BalanceValue {
    fn from(amount: i32) -> Self {
        BalanceValue::Amount(Decimal::from(amount))
    }
}

impl From<i64> for BalanceValue {
    fn from(amount: i64) -> Self {
        BalanceValue::Amount(Decimal::from(amount))
    }
}

/// Balances of one account keyed by asset symbol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    balances: BTreeMap<String, BalanceValue>,
}

impl BalanceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, symbol: impl Into<String>, value: impl Into<BalanceValue>) -> Self {
        self.insert(symbol, value);
        self
    }

    /// Sets the balance of `symbol`, replacing any previous value
    pub fn insert(&mut self, symbol: impl Into<String>, value: impl Into<BalanceValue>) {
        self.balances.insert(symbol.into(), value.into());
    }

    pub fn get(&self, symbol: &str) -> Option<&BalanceValue> {
        self.balances.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BalanceValue)> {
        self.balances.iter().map(|(symbol, value)| (symbol.as_str(), value))
    }

    /// Parses the provider's JSON shape.
    ///
    /// NEO and GAS usually arrive as bare numbers or numeric strings, other
    /// tokens as `{ "symbol": .., "balance": .. }`. A token object's own
    /// `symbol` wins over its key. Non-object input yields an empty snapshot.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut snapshot = Self::new();
        if let Some(entries) = value.as_object() {
            for (key, entry) in entries {
                let symbol = entry
                    .get("symbol")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or(key.as_str());
                snapshot.insert(symbol, BalanceValue::from_json(entry));
            }
        }
        snapshot
    }
}

/// An asset eligible to be the source of an outgoing transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendableAsset {
    pub symbol: String,
    pub balance: Decimal,
}

/// Sendable assets keyed by symbol. Every balance is strictly positive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SendableAssetSet {
    assets: BTreeMap<String, SendableAsset>,
}

impl SendableAssetSet {
    pub fn get(&self, symbol: &str) -> Option<&SendableAsset> {
        self.assets.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.assets.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SendableAsset> {
        self.assets.values()
    }

    /// Display order: NEO, GAS, then the remaining symbols alphabetically
    pub fn ordered(&self) -> Vec<&SendableAsset> {
        let natives = [NEO_SYMBOL, GAS_SYMBOL]
            .into_iter()
            .filter_map(|symbol| self.assets.get(symbol));
        let tokens = self
            .assets
            .values()
            .filter(|asset| !is_native(&asset.symbol));
        natives.chain(tokens).collect()
    }

    fn insert_positive(&mut self, symbol: &str, value: &BalanceValue) {
        if let Some(balance) = value.positive() {
            self.assets.insert(
                symbol.to_string(),
                SendableAsset {
                    symbol: symbol.to_string(),
                    balance,
                },
            );
        }
    }
}

/// Whether `symbol` is one of the two native assets
pub fn is_native(symbol: &str) -> bool {
    symbol == NEO_SYMBOL || symbol == GAS_SYMBOL
}

/// Derives the sendable assets of a snapshot.
///
/// `None` yields an empty set. NEO and GAS are evaluated first, then every
/// other symbol; all of them are included iff their balance is > 0.
pub fn derive_sendable_assets(balances: Option<&BalanceSnapshot>) -> SendableAssetSet {
    let mut sendable = SendableAssetSet::default();
    let Some(balances) = balances else {
        return sendable;
    };

    for native in [NEO_SYMBOL, GAS_SYMBOL] {
        if let Some(value) = balances.get(native) {
            sendable.insert_positive(native, value);
        }
    }

    for (symbol, value) in balances.iter().filter(|(symbol, _)| !is_native(symbol)) {
        sendable.insert_positive(symbol, value);
    }

    sendable
}

/// A token balance listed next to the native ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub balance: BalanceValue,
}

/// Everything the send screen needs from one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    pub neo: Decimal,
    pub gas: Decimal,
    /// All non-native balances, zero ones included
    pub token_balances: Vec<TokenBalance>,
    pub sendable_assets: SendableAssetSet,
}

impl BalanceSummary {
    pub fn from_snapshot(balances: Option<&BalanceSnapshot>) -> Self {
        let Some(snapshot) = balances else {
            return Self::default();
        };

        let native = |symbol: &str| {
            snapshot
                .get(symbol)
                .map(BalanceValue::or_zero)
                .unwrap_or(Decimal::ZERO)
        };

        Self {
            neo: native(NEO_SYMBOL),
            gas: native(GAS_SYMBOL),
            token_balances: snapshot
                .iter()
                .filter(|(symbol, _)| !is_native(symbol))
                .map(|(symbol, balance)| TokenBalance {
                    symbol: symbol.to_string(),
                    balance: *balance,
                })
                .collect(),
            sendable_assets: derive_sendable_assets(Some(snapshot)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_accepts_provider_shapes() {
        let snapshot = BalanceSnapshot::from_json(&json!({
            "NEO": 12,
            "GAS": "0.5",
            "0xceab": { "symbol": "FLM", "balance": "42.1" },
            "BROKEN": "abc",
            "EMPTY": null,
        }));

        assert_eq!(snapshot.get("NEO"), Some(&BalanceValue::Amount(Decimal::from(12))));
        assert_eq!(
            snapshot.get("GAS"),
            Some(&BalanceValue::Amount(Decimal::from_str("0.5").unwrap()))
        );
        assert_eq!(
            snapshot.get("FLM"),
            Some(&BalanceValue::Amount(Decimal::from_str("42.1").unwrap()))
        );
        assert!(snapshot.get("0xceab").is_none());
        assert_eq!(snapshot.get("BROKEN"), Some(&BalanceValue::Malformed));
        assert_eq!(snapshot.get("EMPTY"), Some(&BalanceValue::Malformed));
    }

    #[test]
    fn test_non_finite_floats_are_malformed() {
        assert_eq!(BalanceValue::from(f64::NAN), BalanceValue::Malformed);
        assert_eq!(BalanceValue::from(f64::INFINITY), BalanceValue::Malformed);
        assert_eq!(BalanceValue::Malformed.positive(), None);
    }

    #[test]
    fn test_ordered_puts_natives_first() {
        let snapshot = BalanceSnapshot::new()
            .with("ZETA", 1)
            .with("GAS", 2)
            .with("ALPHA", 3)
            .with("NEO", 4);
        let sendable = derive_sendable_assets(Some(&snapshot));
        let order: Vec<&str> = sendable
            .ordered()
            .into_iter()
            .map(|asset| asset.symbol.as_str())
            .collect();
        assert_eq!(order, vec!["NEO", "GAS", "ALPHA", "ZETA"]);
    }
}
