#![forbid(unsafe_code)]

mod error;
mod flush;
mod game;
mod optimizer;
mod persistence;
mod watch;

pub use error::Error;
pub use flush::{Flush, VOLUME_PLACEHOLDER};
pub use game::Game;
pub use optimizer::Optimizer;
pub use persistence::Persistence;
pub use watch::Watch;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables with this prefix override file values, with `__`
/// separating sections: `SNAP_TRACKER_FLUSH__ENABLED=false`.
pub const ENV_PREFIX: &str = "SNAP_TRACKER_";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub game: Game,
    pub watch: Watch,
    pub flush: Flush,
    pub persistence: Persistence,
    pub optimizer: Optimizer,
}

impl Config {
    /// Defaults merged with the environment.
    pub fn new() -> Result<Self, Error> {
        Self::extract(Self::defaults().merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load a TOML file on top of the defaults, then apply the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_owned()));
        }
        Self::extract(
            Self::defaults()
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn to_toml_string(&self) -> Result<String, Error> {
        Ok(toml_edit::ser::to_string_pretty(self)?)
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Result<Self, Error> {
        Ok(figment.extract()?)
    }
}
