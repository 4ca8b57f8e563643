#![forbid(unsafe_code)]

mod card;
mod effects;
mod records;

pub use card::{Card, CardVariant};
pub use effects::{Finish, Flare, FlareColor, FlareEffect};
pub use records::{CardDefStat, CardDefStats, CardRecord, CollectionServerState, EffectRef};

use crate::{Error, account::Account};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Owned cards keyed by definition id.
///
/// Built wholesale from the client's collection state; never patched.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    cards: BTreeMap<String, Card>,
}

impl Collection {
    pub fn from_server_state(account: &Account, state: CollectionServerState) -> Result<Self, Error> {
        let scores: HashMap<&str, i64> = account.card_scores().into_iter().collect();

        let mut cards = BTreeMap::new();
        for (def_id, value) in state.card_def_stats.stats {
            if !value.is_object() {
                continue;
            }
            let stat: CardDefStat = serde_json::from_value(value)?;
            let score = scores.get(def_id.as_str()).copied().unwrap_or(0);
            let card = Card::new(def_id.clone(), stat.boosters, stat.infinity_split_count, score);
            cards.insert(def_id, card);
        }

        let mut collection = Self { cards };
        for record in state.cards {
            if record.custom {
                continue;
            }
            collection.add_record(&record)?;
        }
        debug!(cards = collection.len(), "collection loaded");
        Ok(collection)
    }

    fn add_record(&mut self, record: &CardRecord) -> Result<(), Error> {
        let card = self
            .cards
            .get_mut(&record.card_def_id)
            .ok_or_else(|| Error::UnknownCard(record.card_def_id.clone()))?;

        let mut variant = CardVariant::new(record.art_variant_def_id.clone(), record.rarity_def_id)
            .with_split(record.split);
        variant.is_favourite = record.custom;
        if let Some(def) = record.finish_def() {
            variant = variant.with_finish(Finish::from_def(def)?);
        }
        if let Some(def) = record.flare_def() {
            variant = variant.with_flare(Flare::from_def(def)?);
        }
        card.add_variant(variant);
        Ok(())
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards
                .into_iter()
                .map(|card| (card.def_id.clone(), card))
                .collect(),
        }
    }

    pub fn get(&self, def_id: &str) -> Option<&Card> {
        self.cards.get(def_id)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards ordered by score, best first.
    pub fn by_score(&self) -> Vec<&Card> {
        let mut cards: Vec<_> = self.cards.values().collect();
        cards.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.def_id.cmp(&b.def_id)));
        cards
    }
}
