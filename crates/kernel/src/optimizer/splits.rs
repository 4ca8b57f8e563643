#![forbid(unsafe_code)]

use crate::{
    collection::{Card, Collection},
    prices::{PriceEntry, PriceTable},
};
use std::{cmp::Reverse, collections::HashSet};
use tracing::debug;

/// Above this budget a card needs `credits / 10` boosters to qualify,
/// favouring big single purchases.
pub const LARGE_BUDGET: u32 = 1550;

/// A card worth upgrading along `upgrade`.
#[derive(Debug, Clone)]
pub struct SplitCandidate<'a> {
    pub card: &'a Card,
    pub upgrade: PriceEntry,
    /// Bonus for cards already splitting often, penalties for owning the
    /// rarest finishes.
    pub bonus: i32,
}

fn bonus(card: &Card) -> i32 {
    let splits = match card.splits {
        s if s > 4 => 2,
        4 => 1,
        _ => 0,
    };
    splits - i32::from(card.has_gold()) - i32::from(card.has_ink())
}

fn qualifies(card: &Card, entry: &PriceEntry, prices: &PriceTable, credits: u32) -> bool {
    if credits > LARGE_BUDGET {
        return card.boosters >= credits / 10;
    }
    prices
        .price_to_top(entry.source)
        .is_some_and(|top| card.boosters >= top.boosters)
}

/// Rank cards for tier-up purchases towards the terminal tier.
///
/// Considers every price entry payable with `credits` and every card owning
/// a variant of the entry's source rarity with enough boosters. The result
/// names each card at most once, with its best entry. Boosters are not
/// deducted: these are candidates, not a plan.
pub fn maximize_splits<'a>(
    collection: &'a Collection,
    prices: &'a PriceTable,
    credits: u32,
) -> impl Iterator<Item = SplitCandidate<'a>> + 'a {
    let mut ranked = Vec::new();
    for (index, entry) in prices.affordable(credits) {
        let before = ranked.len();
        ranked.extend(
            collection
                .cards()
                .filter(|card| card.owns_rarity(entry.source))
                .filter(|card| qualifies(card, entry, prices, credits))
                .map(|card| (index, SplitCandidate { card, upgrade: *entry, bonus: bonus(card) })),
        );
        debug!(%entry, candidates = ranked.len() - before, "split candidates");
    }

    ranked.sort_by_key(|(index, candidate)| {
        let card = candidate.card;
        (
            candidate.upgrade.priority,
            Reverse(candidate.bonus),
            Reverse(card.splits),
            Reverse(card.boosters),
            Reverse(card.distinct_variants()),
            *index,
        )
    });

    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .map(|(_, candidate)| candidate)
        .filter(move |candidate| seen.insert(candidate.card.def_id.as_str()))
}
