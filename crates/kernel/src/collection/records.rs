#![forbid(unsafe_code)]

//! Raw shapes of `CollectionState.json`'s `ServerState`.

use crate::rarity::Rarity;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollectionServerState {
    pub card_def_stats: CardDefStats,
    #[serde(default)]
    pub cards: Vec<CardRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardDefStats {
    /// Keyed by card definition id. Non-object values are bookkeeping
    /// entries of the client and carry no card.
    #[serde(default)]
    pub stats: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardDefStat {
    #[serde(default)]
    pub boosters: u32,
    #[serde(default)]
    pub infinity_split_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EffectRef {
    pub effect_def_id: Option<String>,
}

/// One physically owned variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardRecord {
    pub card_def_id: String,
    #[serde(default = "default_variant_id")]
    pub art_variant_def_id: String,
    pub rarity_def_id: Rarity,
    #[serde(rename = "SurfaceFlare.EffectDefId", default)]
    surface_flare_flat: Option<String>,
    #[serde(rename = "SurfaceFlare", default)]
    surface_flare: Option<EffectRef>,
    #[serde(rename = "CardRevealFlare.EffectDefId", default)]
    reveal_flare_flat: Option<String>,
    #[serde(rename = "CardRevealFlare", default)]
    reveal_flare: Option<EffectRef>,
    #[serde(default)]
    pub split: bool,
    /// Placeholder entries for customized (favourite) variants.
    #[serde(default)]
    pub custom: bool,
}

fn default_variant_id() -> String {
    "Default".into()
}

impl CardRecord {
    /// Finish definition id, from either the flat or the nested form.
    pub fn finish_def(&self) -> Option<&str> {
        self.surface_flare_flat.as_deref().or_else(|| {
            self.surface_flare
                .as_ref()
                .and_then(|r| r.effect_def_id.as_deref())
        })
    }

    pub fn flare_def(&self) -> Option<&str> {
        self.reveal_flare_flat.as_deref().or_else(|| {
            self.reveal_flare
                .as_ref()
                .and_then(|r| r.effect_def_id.as_deref())
        })
    }
}
