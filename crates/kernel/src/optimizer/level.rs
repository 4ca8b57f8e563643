#![forbid(unsafe_code)]

use crate::{collection::Collection, rarity::Rarity};
use std::cmp::Reverse;
use tracing::trace;

const UNIT_CREDITS: u32 = Rarity::Uncommon.cumulative_cost().0;
const UNIT_BOOSTERS: u32 = Rarity::Uncommon.cumulative_cost().1;

/// Upgrading `units` common variants of one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpgrade {
    pub def_id: String,
    pub units: u32,
    pub credits_before: u32,
    pub credit_cost: u32,
    pub boosters_before: u32,
    pub booster_cost: u32,
}

impl LevelUpgrade {
    pub fn credits_after(&self) -> u32 {
        self.credits_before - self.credit_cost
    }

    pub fn boosters_after(&self) -> u32 {
        self.boosters_before - self.booster_cost
    }
}

/// Spend `credits` on common-to-uncommon upgrades, one card at a time.
///
/// Cards with the most boosters go first; among equals, cards that can
/// upgrade every common variant they own, then cards with more splits, then
/// cards with more common variants. Each card is visited once.
pub fn maximize_level(collection: &Collection, credits: u32) -> Vec<LevelUpgrade> {
    let mut candidates: Vec<_> = collection
        .cards()
        .filter(|card| card.boosters >= UNIT_BOOSTERS && card.common_variants() > 0)
        .collect();
    candidates.sort_by_key(|card| {
        let commons = card.common_variants() as u32;
        let upgrades_all = card.boosters >= UNIT_BOOSTERS * commons;
        Reverse((
            card.boosters,
            u32::from(upgrades_all) * commons,
            card.splits,
            commons,
        ))
    });

    let mut budget = credits;
    let mut upgrades = Vec::new();
    for card in candidates {
        if budget < UNIT_CREDITS {
            break;
        }
        let units = (budget / UNIT_CREDITS)
            .min(card.common_variants() as u32)
            .min(card.boosters / UNIT_BOOSTERS);
        let upgrade = LevelUpgrade {
            def_id: card.def_id.clone(),
            units,
            credits_before: budget,
            credit_cost: units * UNIT_CREDITS,
            boosters_before: card.boosters,
            booster_cost: units * UNIT_BOOSTERS,
        };
        trace!(?upgrade, "level upgrade");
        budget -= upgrade.credit_cost;
        upgrades.push(upgrade);
    }
    upgrades
}
