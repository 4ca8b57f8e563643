#![forbid(unsafe_code)]

//! The ongoing game, driven by log events and match-state documents.

use crate::error::Error;
use kernel::LogEvent;
use kernel::game::{GameStateView, MatchResult, PlayerInfo};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerIndex {
    One,
    Two,
}

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerIndex::One => f.write_str("1"),
            PlayerIndex::Two => f.write_str("2"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    /// Unknown when tracking started mid-game; set once, never changed.
    pub id: Option<Uuid>,
    pub current_turn: u32,
    pub player_index: Option<PlayerIndex>,
    pub opponent: Option<PlayerInfo>,
}

impl GameSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    fn mid_game(turn: u32) -> Self {
        Self {
            current_turn: turn,
            ..Default::default()
        }
    }

    /// Move to `turn` if it is ahead of the known turn.
    fn advance(&mut self, turn: u32) -> bool {
        if turn > self.current_turn {
            self.current_turn = turn;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "game {id}")?,
            None => f.write_str("game with unknown id")?,
        }
        write!(f, " on turn {}", self.current_turn)?;
        if let Some(index) = self.player_index {
            write!(f, " as player {index}")?;
        }
        if let Some(opponent) = &self.opponent {
            write!(f, " against {}", opponent.name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    NoSession,
    Tracking(GameSession),
}

/// What a log event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Matchmaking { mode: String },
    Started { game_id: Uuid },
    /// A session was created from a turn seen without a preceding game start.
    Resumed { turn: u32 },
    TurnAdvanced { turn: u32 },
    TurnEnded { turn: u32 },
    /// The client acknowledged a result; the state document will follow.
    AwaitingResult,
}

/// What to do with a match-state document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing is tracked; the document belongs to an old game.
    Idle,
    Mismatch {
        tracked: Option<Uuid>,
        document: Option<Uuid>,
    },
    Stale {
        document_turn: u32,
        session_turn: u32,
    },
    Persist,
    Finished {
        session: GameSession,
        result: MatchResult,
    },
}

/// Owns the session of the tracked account.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    account_id: String,
    state: SessionState,
}

impl SessionMachine {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            state: SessionState::NoSession,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&GameSession> {
        match &self.state {
            SessionState::Tracking(session) => Some(session),
            SessionState::NoSession => None,
        }
    }

    pub fn on_event(&mut self, event: &LogEvent) -> Transition {
        match event {
            LogEvent::GameInitializing { mode } => {
                info!(%mode, "matchmaking");
                Transition::Matchmaking { mode: mode.clone() }
            }
            LogEvent::GameStart { game_id } => {
                if let SessionState::Tracking(previous) = &self.state {
                    debug!(%previous, "replacing session");
                }
                self.state = SessionState::Tracking(GameSession::new(*game_id));
                info!(%game_id, "matchmaking found a game");
                Transition::Started { game_id: *game_id }
            }
            LogEvent::TurnEnd { turn } => {
                info!(turn, "turn ended");
                match self.observe_turn(*turn) {
                    Transition::Unchanged => Transition::TurnEnded { turn: *turn },
                    other => other,
                }
            }
            LogEvent::CardStaged {
                card_def_id, turn, ..
            } => {
                info!(card = %card_def_id, turn, "card staged");
                self.observe_turn(*turn)
            }
            LogEvent::GameEnd => {
                info!("game finished, waiting for state to update");
                Transition::AwaitingResult
            }
        }
    }

    fn observe_turn(&mut self, turn: u32) -> Transition {
        match &mut self.state {
            SessionState::NoSession if turn == 0 => Transition::Unchanged,
            SessionState::NoSession => {
                self.state = SessionState::Tracking(GameSession::mid_game(turn));
                info!(turn, "started tracking mid-game");
                Transition::Resumed { turn }
            }
            SessionState::Tracking(session) => {
                if session.advance(turn) {
                    info!(turn, "turn advanced");
                    Transition::TurnAdvanced { turn }
                } else {
                    Transition::Unchanged
                }
            }
        }
    }

    /// Judge a match-state document against the session.
    ///
    /// A result that names no clear winner is an error and leaves the
    /// session in place.
    pub fn observe_document(&mut self, view: &GameStateView) -> Result<Verdict, Error> {
        let SessionState::Tracking(session) = &mut self.state else {
            return Ok(Verdict::Idle);
        };

        let document = view.game_id();
        match (session.id, document) {
            (Some(tracked), Some(document)) if tracked == document => {}
            (None, Some(document)) => {
                info!(game_id = %document, "game id learned from state");
                session.id = Some(document);
            }
            (tracked, document) => {
                return Ok(Verdict::Mismatch { tracked, document });
            }
        }

        identify_players(session, view, &self.account_id);

        if let Some(message) = &view.client_result_message {
            let result = message.resolve(&self.account_id)?;
            let SessionState::Tracking(session) = std::mem::take(&mut self.state) else {
                return Ok(Verdict::Idle);
            };
            info!(%result, cube_delta = result.cube_delta(), game = %session, "game over");
            return Ok(Verdict::Finished { session, result });
        }

        if view.turn < session.current_turn {
            debug!(document_turn = view.turn, session_turn = session.current_turn, "stale state");
            return Ok(Verdict::Stale {
                document_turn: view.turn,
                session_turn: session.current_turn,
            });
        }
        session.advance(view.turn);
        Ok(Verdict::Persist)
    }
}

fn identify_players(session: &mut GameSession, view: &GameStateView, account_id: &str) {
    let Some((p1, p2)) = view.player_infos() else {
        return;
    };
    let (index, opponent) = if p1.account_id == account_id {
        (PlayerIndex::One, p2)
    } else if p2.account_id == account_id {
        (PlayerIndex::Two, p1)
    } else {
        return;
    };
    if session.player_index.is_none() {
        session.player_index = Some(index);
        info!(player = %index, "player identified");
    }
    if session.opponent.is_none() {
        info!(
            name = %opponent.name,
            collection_level = ?opponent.collection_score,
            high_watermark_rank = ?opponent.high_watermark_rank,
            "opponent identified"
        );
        session.opponent = Some(opponent.clone());
    }
}
