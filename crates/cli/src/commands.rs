use crate::table::Table;
use kernel::optimizer::{maximize_level, maximize_splits};
use kernel::{PriceTable, Rarity};
use orchestrator::LoadedAccount;
use std::io::{self, Write};

/// Owned cards ranked by score.
pub fn card_stats(account: &LoadedAccount) -> Table {
    let mut table = Table::new(
        "Your best performing cards",
        ["Rank", "Score", "Card", "Variants", "Splits"],
    );
    for (rank, card) in account.collection.by_score().into_iter().enumerate() {
        table.push_row([
            (rank + 1).to_string(),
            card.score.to_string(),
            card.name(),
            card.distinct_variants().to_string(),
            card.splits.to_string(),
        ]);
    }
    table
}

/// Cheapest path to Infinity per rarity.
pub fn prices(prices: &PriceTable) -> Table {
    let mut table = Table::new(
        "Upgrade prices to infinity",
        ["Rarity", "Credits", "Boosters", "Collection points"],
    );
    for entry in prices.prices_to_top() {
        table.push_row([
            entry.source.to_string(),
            entry.credits.to_string(),
            entry.boosters.to_string(),
            entry.collection_points().to_string(),
        ]);
    }
    table
}

/// Split candidates for `credits`.
///
/// After `max_rows` rows the listing stops at the first upgrade that does
/// not reach Infinity.
pub fn split_candidates(
    account: &LoadedAccount,
    prices: &PriceTable,
    credits: u32,
    max_rows: usize,
) -> Table {
    let mut table = Table::new(
        "To maximize splits",
        ["Card", "Upgrade", "Credits", "Boosters", "Splits", "Bonus"],
    );
    for (n, candidate) in maximize_splits(&account.collection, prices, credits).enumerate() {
        if n >= max_rows && candidate.upgrade.target != Rarity::TERMINAL {
            break;
        }
        table.push_row([
            candidate.card.name(),
            candidate.upgrade.to_string(),
            candidate.upgrade.credits.to_string(),
            format!("{} / {}", candidate.card.boosters, candidate.upgrade.boosters),
            candidate.card.splits.to_string(),
            candidate.bonus.to_string(),
        ]);
    }
    table
}

/// Common-variant upgrades for `credits`.
pub fn level_plan(account: &LoadedAccount, credits: u32) -> Table {
    let mut table = Table::new(
        "To maximize collection level",
        ["Upgrades", "Card", "Credits", "Boosters"],
    );
    for upgrade in maximize_level(&account.collection, credits) {
        let name = account
            .collection
            .get(&upgrade.def_id)
            .map(|card| card.name())
            .unwrap_or_else(|| upgrade.def_id.clone());
        table.push_row([
            upgrade.units.to_string(),
            name,
            format!("{} (-{})", upgrade.credits_after(), upgrade.credit_cost),
            format!("{} (-{})", upgrade.boosters_after(), upgrade.booster_cost),
        ]);
    }
    table
}

pub fn write_upgrades(
    out: &mut impl Write,
    account: &LoadedAccount,
    prices: &PriceTable,
    max_split_rows: usize,
) -> io::Result<()> {
    let credits = account.credits();
    writeln!(out, "Hi {}!", account.profile.account.name)?;
    writeln!(out, "You have {credits} credits available for upgrades.")?;
    writeln!(out)?;

    let splits = split_candidates(account, prices, credits, max_split_rows);
    if splits.is_empty() {
        writeln!(out, "No cards to upgrade for splits.")?;
    } else {
        writeln!(out, "{splits}")?;
    }

    let level = level_plan(account, credits);
    if level.is_empty() {
        writeln!(out, "No common cards to upgrade.")?;
    } else {
        writeln!(out, "{level}")?;
    }
    Ok(())
}
