#![forbid(unsafe_code)]

//! Raw shapes of `ProfileState.json`'s `ServerState`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileServerState {
    pub account: Account,
    #[serde(default)]
    pub wallet: Wallet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Per-card performance counters mixed with other bookkeeping values.
    #[serde(default)]
    pub card_stats: BTreeMap<String, Value>,
}

impl Account {
    /// Integer card counters, highest first.
    pub fn card_scores(&self) -> Vec<(&str, i64)> {
        let mut scores: Vec<_> = self
            .card_stats
            .iter()
            .filter_map(|(card, value)| value.as_i64().map(|score| (card.as_str(), score)))
            .collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1));
        scores
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wallet {
    #[serde(rename = "_currencies", default)]
    currencies: Currencies,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Currencies {
    #[serde(rename = "Credits", default)]
    credits: CreditsCurrency,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CreditsCurrency {
    #[serde(rename = "Credits", default)]
    credits: Balance,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Balance {
    #[serde(rename = "TotalAmount", default)]
    total_amount: u32,
}

impl Wallet {
    pub fn credits(&self) -> u32 {
        self.currencies.credits.credits.total_amount
    }
}
