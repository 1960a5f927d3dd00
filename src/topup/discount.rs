use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Admin-configured top-up discounts, keyed by the top-up amount.
///
/// Keys compare numerically, so `10` and `10.0` are the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountTable {
    entries: BTreeMap<Decimal, Decimal>,
}

impl DiscountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Unusable multipliers are skipped.
    pub fn discount(mut self, amount: Decimal, multiplier: Decimal) -> Self {
        self.insert(amount, multiplier);
        self
    }

    /// Inserts an entry; returns `false` when the multiplier is not
    /// positive and the entry was skipped.
    pub fn insert(&mut self, amount: Decimal, multiplier: Decimal) -> bool {
        if multiplier <= Decimal::ZERO {
            tracing::warn!(%amount, %multiplier, "Ignoring non-positive top-up discount");
            return false;
        }
        self.entries.insert(amount.normalize(), multiplier);
        true
    }

    /// Parses the persisted JSON object, e.g. `{"10": 0.95, "100": "0.9"}`.
    ///
    /// Entries whose amount or multiplier cannot be read are skipped with a
    /// warning; only a malformed document is an error. An empty string is
    /// an empty table.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let map: HashMap<String, Value> = serde_json::from_str(raw)?;
        let mut table = Self::new();
        for (key, value) in map {
            let Some(amount) = parse_decimal(&key) else {
                tracing::warn!(key = %key, "Ignoring top-up discount with non-numeric amount");
                continue;
            };
            let multiplier = match &value {
                Value::Number(n) => parse_decimal(&n.to_string()),
                Value::String(s) => parse_decimal(s),
                _ => None,
            };
            match multiplier {
                Some(multiplier) => {
                    table.insert(amount, multiplier);
                }
                None => tracing::warn!(
                    key = %key,
                    %value,
                    "Ignoring top-up discount with non-numeric value"
                ),
            }
        }
        Ok(table)
    }

    pub fn get(&self, amount: Decimal) -> Option<Decimal> {
        self.entries.get(&amount.normalize()).copied()
    }

    /// Discount multiplier for `amount`, `1` when the table has no entry.
    pub fn resolve(&self, amount: Decimal) -> Decimal {
        self.get(amount).unwrap_or(Decimal::ONE)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending amount order.
    pub fn iter(&self) -> impl Iterator<Item = (Decimal, Decimal)> + '_ {
        self.entries.iter().map(|(a, m)| (*a, *m))
    }
}

/// Discount multiplier for a requested top-up `amount`.
pub fn resolve_discount(amount: Decimal, table: &DiscountTable) -> Decimal {
    table.resolve(amount)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
