#![forbid(unsafe_code)]

//! Typed view of the match-state document (`GameState.json`).

use crate::Error;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// JSON pointer of the game state inside the document.
pub const GAME_STATE_POINTER: &str = "/RemoteGame/GameState";

/// The nested game state of a match-state document.
pub fn extract_game_state(document: &Value) -> Result<&Value, Error> {
    document
        .pointer(GAME_STATE_POINTER)
        .ok_or(Error::MissingField("RemoteGame.GameState"))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameStateView {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub players: Vec<PlayerSlot>,
    #[serde(default)]
    pub client_result_message: Option<ClientResultMessage>,
    #[serde(default)]
    pub client_game_info: Option<Value>,
}

impl GameStateView {
    pub fn from_state(state: &Value) -> Result<Self, Error> {
        Ok(Self::deserialize(state)?)
    }

    /// The declared game id, if present and well formed.
    pub fn game_id(&self) -> Option<Uuid> {
        self.id.as_deref().and_then(|id| Uuid::try_parse(id).ok())
    }

    /// Both players' info, when the document lists exactly two players.
    pub fn player_infos(&self) -> Option<(&PlayerInfo, &PlayerInfo)> {
        match self.players.as_slice() {
            [p1, p2] => Some((p1.player_info.as_ref()?, p2.player_info.as_ref()?)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerSlot {
    #[serde(default)]
    pub player_info: Option<PlayerInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerInfo {
    pub account_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub collection_score: Option<i64>,
    #[serde(default)]
    pub high_watermark_rank: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientResultMessage {
    #[serde(default)]
    pub game_result_account_items: Vec<ResultItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultItem {
    pub account_id: String,
    #[serde(default)]
    pub is_winner: bool,
    #[serde(default)]
    pub is_loser: bool,
    #[serde(default)]
    pub final_cube_value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

/// Result of a finished match from the tracked account's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub outcome: Outcome,
    /// Cubes at stake when the match ended.
    pub cubes: i32,
}

impl MatchResult {
    /// Signed change of the account's cube count.
    pub fn cube_delta(&self) -> i32 {
        match self.outcome {
            Outcome::Win => self.cubes,
            Outcome::Loss => -self.cubes,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Win => write!(f, "won {} cubes", self.cubes),
            Outcome::Loss => write!(f, "lost {} cubes", self.cubes),
        }
    }
}

impl ClientResultMessage {
    /// Resolve the outcome for `account_id`.
    pub fn resolve(&self, account_id: &str) -> Result<MatchResult, Error> {
        let item = self
            .game_result_account_items
            .iter()
            .find(|item| item.account_id == account_id)
            .ok_or_else(|| Error::AccountNotInResult(account_id.to_owned()))?;
        let outcome = match (item.is_winner, item.is_loser) {
            (true, false) => Outcome::Win,
            (false, true) => Outcome::Loss,
            (is_winner, is_loser) => return Err(Error::AmbiguousResult { is_winner, is_loser }),
        };
        Ok(MatchResult {
            outcome,
            cubes: item.final_cube_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(is_winner: bool, is_loser: bool) -> ClientResultMessage {
        serde_json::from_value(json!({
            "GameResultAccountItems": [
                {"AccountId": "other", "IsWinner": !is_winner, "IsLoser": !is_loser, "FinalCubeValue": 4},
                {"AccountId": "me", "IsWinner": is_winner, "IsLoser": is_loser, "FinalCubeValue": 4}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn resolves_win_and_loss() {
        let win = result(true, false).resolve("me").unwrap();
        assert_eq!(win.outcome, Outcome::Win);
        assert_eq!(win.cube_delta(), 4);
        let loss = result(false, true).resolve("me").unwrap();
        assert_eq!(loss.cube_delta(), -4);
    }

    #[test]
    fn agreeing_flags_are_ambiguous() {
        assert!(matches!(
            result(true, true).resolve("me"),
            Err(Error::AmbiguousResult { is_winner: true, is_loser: true })
        ));
        assert!(matches!(
            result(false, false).resolve("me"),
            Err(Error::AmbiguousResult { .. })
        ));
    }

    #[test]
    fn missing_account_is_reported() {
        assert!(matches!(
            result(true, false).resolve("stranger"),
            Err(Error::AccountNotInResult(id)) if id == "stranger"
        ));
    }

    #[test]
    fn reads_nested_state() {
        let doc = json!({"RemoteGame": {"GameState": {
            "Id": "60c106af-c97f-445b-8840-d6433be947f9",
            "Turn": 4,
            "Players": [
                {"PlayerInfo": {"AccountId": "me", "Name": "Kim"}},
                {"PlayerInfo": {"AccountId": "you", "Name": "Sam", "CollectionScore": 3200}}
            ]
        }}});
        let view = GameStateView::from_state(extract_game_state(&doc).unwrap()).unwrap();
        assert_eq!(view.turn, 4);
        assert!(view.game_id().is_some());
        let (p1, p2) = view.player_infos().unwrap();
        assert_eq!((p1.name.as_str(), p2.collection_score), ("Kim", Some(3200)));

        assert!(matches!(
            extract_game_state(&json!({})),
            Err(Error::MissingField(_))
        ));
    }
}
