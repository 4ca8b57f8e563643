#![forbid(unsafe_code)]

use crate::rarity::Rarity;
use itertools::Itertools;
use std::{collections::BTreeMap, fmt, sync::LazyLock};

static PRICES: LazyLock<PriceTable> = LazyLock::new(PriceTable::new);

/// Cost of promoting one variant from `source` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceEntry {
    pub source: Rarity,
    pub target: Rarity,
    pub credits: u32,
    pub boosters: u32,
    /// Rank of `target`; 1 is the terminal tier.
    pub priority: u8,
}

impl PriceEntry {
    fn between(a: Rarity, b: Rarity) -> Self {
        let (lower, upper) = if a.cumulative_cost().0 <= b.cumulative_cost().0 {
            (a, b)
        } else {
            (b, a)
        };
        let (lower_credits, lower_boosters) = lower.cumulative_cost();
        let (upper_credits, upper_boosters) = upper.cumulative_cost();
        Self {
            source: lower,
            target: upper,
            credits: upper_credits - lower_credits,
            boosters: upper_boosters - lower_boosters,
            priority: upper.rank(),
        }
    }

    pub fn is_split(&self) -> bool {
        self.target == Rarity::TERMINAL
    }

    /// Collection level gained by spending this entry's credits.
    pub fn collection_points(&self) -> u32 {
        self.credits / 50 + (self.credits % 50) / 25
    }
}

impl fmt::Display for PriceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Every upgrade path between two tiers, best first.
///
/// Entries are ordered by `(priority, credits)`: paths ending closer to the
/// terminal tier come first, cheaper paths first within a target.
#[derive(Debug, Clone)]
pub struct PriceTable {
    entries: Vec<PriceEntry>,
    to_top: BTreeMap<Rarity, PriceEntry>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceTable {
    pub fn new() -> Self {
        let mut entries: Vec<PriceEntry> = Rarity::ALL
            .into_iter()
            .tuple_combinations()
            .map(|(a, b)| PriceEntry::between(a, b))
            .collect();
        entries.sort_by_key(|entry| (entry.priority, entry.credits));

        let mut to_top: BTreeMap<Rarity, PriceEntry> = BTreeMap::new();
        for entry in entries.iter().filter(|entry| entry.is_split()) {
            to_top
                .entry(entry.source)
                .and_modify(|best| {
                    if entry.credits < best.credits {
                        *best = *entry;
                    }
                })
                .or_insert(*entry);
        }

        Self { entries, to_top }
    }

    /// The table shared by the whole process.
    pub fn global() -> &'static PriceTable {
        &PRICES
    }

    pub fn entries(&self) -> &[PriceEntry] {
        &self.entries
    }

    /// Cheapest entry taking `source` straight to the terminal tier.
    pub fn price_to_top(&self, source: Rarity) -> Option<&PriceEntry> {
        self.to_top.get(&source)
    }

    pub fn prices_to_top(&self) -> impl Iterator<Item = &PriceEntry> {
        self.to_top.values()
    }

    pub fn entry(&self, source: Rarity, target: Rarity) -> Option<&PriceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.source == source && entry.target == target)
    }

    /// Entries payable with `credits`, in table order, with their index.
    pub fn affordable(&self, credits: u32) -> impl Iterator<Item = (usize, &PriceEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.credits <= credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn has_an_entry_per_tier_pair() {
        let table = PriceTable::new();
        assert_eq!(table.entries().len(), 21);
        for entry in table.entries() {
            assert!(entry.source < entry.target, "{entry}");
        }
    }

    #[test]
    fn sorted_by_priority_then_credits() {
        let table = PriceTable::new();
        let keys: Vec<_> = table
            .entries()
            .iter()
            .map(|entry| (entry.priority, entry.credits))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        let first = table.entries()[0];
        assert_eq!((first.source, first.target), (Rarity::Ultra, Rarity::Infinity));
        assert_eq!((first.credits, first.boosters), (500, 50));
    }

    #[test]
    fn price_to_top_per_source() {
        let table = PriceTable::new();
        let common = table.price_to_top(Rarity::Common).unwrap();
        assert_eq!((common.credits, common.boosters), (1525, 155));
        assert!(common.is_split());
        assert_eq!(common.priority, 1);
        assert!(table.price_to_top(Rarity::Infinity).is_none());
        assert_eq!(table.prices_to_top().count(), 6);
    }

    #[test]
    fn terminal_entry_is_cheapest_for_its_source() {
        let table = PriceTable::new();
        for top in table.prices_to_top() {
            let same = table
                .entries()
                .iter()
                .filter(|entry| entry.source == top.source && entry.target == top.target);
            assert!(same.clone().all(|entry| entry.credits >= top.credits));
        }
    }

    #[test]
    fn collection_points() {
        let table = PriceTable::new();
        let common = table.entry(Rarity::Common, Rarity::Uncommon).unwrap();
        assert_eq!(common.collection_points(), 1);
        let rare = table.entry(Rarity::Uncommon, Rarity::Rare).unwrap();
        assert_eq!(rare.collection_points(), 2);
        let epic = table.entry(Rarity::Common, Rarity::Epic).unwrap();
        // 325 = 6 * 50 + 25
        assert_eq!(epic.collection_points(), 7);
    }

    #[test]
    fn affordable_respects_budget() {
        let table = PriceTable::new();
        assert_eq!(table.affordable(0).count(), 0);
        assert!(table.affordable(100).all(|(_, entry)| entry.credits <= 100));
        assert_eq!(table.affordable(u32::MAX).count(), 21);
    }
}
