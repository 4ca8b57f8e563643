pub mod account;
pub mod collection;
pub mod document;
mod error;
pub mod game;
pub mod json;
pub mod log_event;
pub mod optimizer;
pub mod prices;
pub mod rarity;

pub use account::{Account, ProfileServerState, Wallet};
pub use collection::{Card, CardVariant, Collection, CollectionServerState};
pub use error::Error;
pub use log_event::{LogEvent, LogEventKind, parse_line, parse_lines};
pub use prices::{PriceEntry, PriceTable};
pub use rarity::Rarity;
