use std::path::PathBuf;

/// Represents all possible errors that can occur in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A state document did not start with a UTF-8 byte-order mark.
    #[error("missing byte-order mark in {path}: starts with {head:?}")]
    MissingByteOrderMark { path: PathBuf, head: Vec<u8> },

    /// A state document is not valid UTF-8.
    #[error("invalid UTF-8 in {path}: {source}")]
    InvalidUtf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A document could not be parsed or has an unexpected shape.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A game id in the log is not a v4 UUID.
    #[error("invalid game id: {0}")]
    InvalidGameId(String),

    /// A document lacks a field the tracker relies on.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("unknown rarity: {0}")]
    UnknownRarity(String),

    /// An effect definition did not decode to a known finish or flare.
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    /// A variant refers to a card with no statistics entry.
    #[error("variant of unknown card: {0}")]
    UnknownCard(String),

    /// Winner and loser flags agree, so the result cannot be read.
    #[error("cannot determine winner: is_winner={is_winner}, is_loser={is_loser}")]
    AmbiguousResult { is_winner: bool, is_loser: bool },

    /// The result lists no item for the tracked account.
    #[error("account {0} is not part of the game result")]
    AccountNotInResult(String),
}
