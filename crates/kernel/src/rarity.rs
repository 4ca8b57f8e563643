#![forbid(unsafe_code)]

use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Card quality tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    #[serde(rename = "UltraLegendary")]
    Ultra,
    Infinity,
}

impl Rarity {
    pub const ALL: [Rarity; 7] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Ultra,
        Rarity::Infinity,
    ];

    /// The tier every upgrade path ends at.
    pub const TERMINAL: Rarity = Rarity::Infinity;

    /// Cumulative `(credits, boosters)` needed to reach this tier from
    /// [`Rarity::Common`].
    pub const fn cumulative_cost(self) -> (u32, u32) {
        match self {
            Rarity::Common => (0, 0),
            Rarity::Uncommon => (25, 5),
            Rarity::Rare => (125, 15),
            Rarity::Epic => (325, 35),
            Rarity::Legendary => (625, 65),
            Rarity::Ultra => (1025, 105),
            Rarity::Infinity => (1525, 155),
        }
    }

    /// Distance from the top: the terminal tier is rank 1, common is rank 7.
    pub const fn rank(self) -> u8 {
        Rarity::ALL.len() as u8 - self as u8
    }

    /// Identifier used by the game client.
    pub const fn def_id(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Ultra => "UltraLegendary",
            Rarity::Infinity => "Infinity",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Ultra => "Ultra",
            other => other.def_id(),
        };
        f.write_str(name)
    }
}

impl FromStr for Rarity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::ALL
            .into_iter()
            .find(|rarity| rarity.def_id() == s)
            .ok_or_else(|| Error::UnknownRarity(s.to_owned()))
    }
}
