#![forbid(unsafe_code)]

use super::effects::{Finish, Flare};
use crate::rarity::Rarity;
use educe::Educe;
use std::{collections::HashSet, sync::OnceLock};

/// One owned art/finish instance of a card definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardVariant {
    pub variant_id: String,
    pub rarity: Rarity,
    pub finish: Option<Finish>,
    pub flare: Option<Flare>,
    pub is_split: bool,
    pub is_favourite: bool,
}

impl CardVariant {
    pub fn new(variant_id: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            variant_id: variant_id.into(),
            rarity,
            finish: None,
            flare: None,
            is_split: false,
            is_favourite: false,
        }
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = Some(finish);
        self
    }

    pub fn with_flare(mut self, flare: Flare) -> Self {
        self.flare = Some(flare);
        self
    }

    pub fn with_split(mut self, is_split: bool) -> Self {
        self.is_split = is_split;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct VariantStats {
    distinct: usize,
    common: usize,
    has_ink: bool,
    has_gold: bool,
}

impl VariantStats {
    fn of(variants: &HashSet<CardVariant>) -> Self {
        let distinct = variants
            .iter()
            .map(|v| v.variant_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        Self {
            distinct,
            common: variants
                .iter()
                .filter(|v| v.rarity == Rarity::Common)
                .count(),
            has_ink: variants.iter().any(|v| v.finish == Some(Finish::Ink)),
            has_gold: variants.iter().any(|v| v.finish == Some(Finish::Gold)),
        }
    }
}

/// A card definition the account owns, with its currencies and variants.
#[derive(Educe, Clone)]
#[educe(Debug)]
pub struct Card {
    pub def_id: String,
    pub boosters: u32,
    pub splits: u32,
    pub score: i64,
    variants: HashSet<CardVariant>,
    #[educe(Debug(ignore))]
    stats: OnceLock<VariantStats>,
}

impl Card {
    pub fn new(def_id: impl Into<String>, boosters: u32, splits: u32, score: i64) -> Self {
        Self {
            def_id: def_id.into(),
            boosters,
            splits,
            score,
            variants: HashSet::new(),
            stats: OnceLock::new(),
        }
    }

    pub fn with_variants(mut self, variants: impl IntoIterator<Item = CardVariant>) -> Self {
        for variant in variants {
            self.add_variant(variant);
        }
        self
    }

    /// Identical variants collapse into one.
    pub fn add_variant(&mut self, variant: CardVariant) {
        if self.variants.insert(variant) {
            self.stats = OnceLock::new();
        }
    }

    pub fn variants(&self) -> impl Iterator<Item = &CardVariant> {
        self.variants.iter()
    }

    pub fn owns_rarity(&self, rarity: Rarity) -> bool {
        self.variants.iter().any(|v| v.rarity == rarity)
    }

    /// Human readable name: `IronMan` -> `Iron Man`.
    pub fn name(&self) -> String {
        let mut name = String::with_capacity(self.def_id.len() + 4);
        for (i, c) in self.def_id.chars().enumerate() {
            if c == '_' {
                name.push(' ');
                continue;
            }
            if i > 0 && c.is_ascii_uppercase() && !name.ends_with(' ') {
                name.push(' ');
            }
            name.push(c);
        }
        name
    }

    fn stats(&self) -> &VariantStats {
        self.stats.get_or_init(|| VariantStats::of(&self.variants))
    }

    /// Unique variant ids, regardless of rarity or finish.
    pub fn distinct_variants(&self) -> usize {
        self.stats().distinct
    }

    pub fn common_variants(&self) -> usize {
        self.stats().common
    }

    pub fn has_ink(&self) -> bool {
        self.stats().has_ink
    }

    pub fn has_gold(&self) -> bool {
        self.stats().has_gold
    }
}
