#![forbid(unsafe_code)]

use crate::error::Error;
use async_trait::async_trait;
use kernel::account::ProfileServerState;
use kernel::document::decode_document;
use kernel::game::{GameStateView, extract_game_state};
use kernel::{Collection, CollectionServerState};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Profile and collection read together; the optimizer and the card
/// statistics only accept an already loaded account.
#[derive(Debug, Clone)]
pub struct LoadedAccount {
    pub profile: ProfileServerState,
    pub collection: Collection,
}

impl LoadedAccount {
    pub fn account_id(&self) -> &str {
        &self.profile.account.id
    }

    pub fn credits(&self) -> u32 {
        self.profile.wallet.credits()
    }
}

/// A match-state document with its game state extracted.
#[derive(Debug, Clone)]
pub struct GameStateDocument {
    /// `RemoteGame.GameState` of the document.
    pub state: Value,
    pub view: GameStateView,
}

impl GameStateDocument {
    pub fn from_document(document: &Value) -> Result<Self, Error> {
        let state = extract_game_state(document)?.clone();
        let view = GameStateView::from_state(&state)?;
        Ok(Self { state, view })
    }
}

/// Access to the client's `<Name>State.json` documents.
#[async_trait]
pub trait StateReader: Send + Sync {
    /// Decoded document `<name>State.json`.
    async fn read_document(&self, name: &str) -> Result<Value, Error>;

    async fn game_state(&self) -> Result<GameStateDocument, Error> {
        let document = self.read_document("Game").await?;
        GameStateDocument::from_document(&document)
    }

    async fn load_profile(&self) -> Result<ProfileServerState, Error> {
        let mut document = self.read_document("Profile").await?;
        Ok(serde_json::from_value(server_state(&mut document))?)
    }

    async fn load_collection(&self, profile: &ProfileServerState) -> Result<Collection, Error> {
        let mut document = self.read_document("Collection").await?;
        let state: CollectionServerState = serde_json::from_value(server_state(&mut document))?;
        Ok(Collection::from_server_state(&profile.account, state)?)
    }

    async fn load_account(&self) -> Result<LoadedAccount, Error> {
        let profile = self.load_profile().await?;
        let collection = self.load_collection(&profile).await?;
        Ok(LoadedAccount {
            profile,
            collection,
        })
    }
}

fn server_state(document: &mut Value) -> Value {
    document
        .get_mut("ServerState")
        .map(Value::take)
        .unwrap_or(Value::Null)
}

/// Reads documents from the game's state directory.
#[derive(Debug, Clone)]
pub struct FsStateReader {
    game: config::Game,
}

impl FsStateReader {
    pub fn new(game: config::Game) -> Self {
        Self { game }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.game.state_file(name)
    }
}

#[async_trait]
impl StateReader for FsStateReader {
    async fn read_document(&self, name: &str) -> Result<Value, Error> {
        let path = self.path(name);
        debug!(path = %path.display(), "loading document");
        let bytes = tokio::fs::read(&path).await?;
        Ok(decode_document(&path, &bytes)?)
    }
}
