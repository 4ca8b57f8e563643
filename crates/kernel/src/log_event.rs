#![forbid(unsafe_code)]

//! Typed events recognized in the client's `|`-delimited text logs.
//!
//! Each line is matched against a fixed, ordered set of line shapes. A line
//! yields at most one event and never depends on its neighbours; lines of
//! any other shape are noise and yield nothing.

use crate::Error;
use std::fmt;
use uuid::{Uuid, Variant};

const GAME_RESULT_ACKED: &str = "RemoteGame|SendRequestObject|RequestType=CubeGame.AckGameResultRequest";
const MATCH_FOUND: &str = "OnMatchmakingMatchFound";
const STAGE_CARD: &str = "StageCard";
const END_TURN: &str = "EndTurn";
const GAME_MANAGER: &str = "GameManager";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogEventKind {
    GameInitializing,
    GameStart,
    TurnEnd,
    CardStaged,
    GameEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// Matchmaking started for a game mode (league).
    GameInitializing { mode: String },
    /// Matchmaking found a game.
    GameStart { game_id: Uuid },
    /// A turn (1-indexed) ended.
    TurnEnd { turn: u32 },
    /// A card was placed at a location by either player.
    CardStaged {
        card_def_id: String,
        card_entity_id: u32,
        zone_entity_id: u32,
        turn: u32,
    },
    /// The client acknowledged the match result.
    GameEnd,
}

impl LogEvent {
    pub fn kind(&self) -> LogEventKind {
        match self {
            LogEvent::GameInitializing { .. } => LogEventKind::GameInitializing,
            LogEvent::GameStart { .. } => LogEventKind::GameStart,
            LogEvent::TurnEnd { .. } => LogEventKind::TurnEnd,
            LogEvent::CardStaged { .. } => LogEventKind::CardStaged,
            LogEvent::GameEnd => LogEventKind::GameEnd,
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::GameInitializing { mode } => write!(f, "matchmaking for {mode}"),
            LogEvent::GameStart { game_id } => write!(f, "game {game_id} found"),
            LogEvent::TurnEnd { turn } => write!(f, "turn {turn} ended"),
            LogEvent::CardStaged {
                card_def_id, turn, ..
            } => write!(f, "{card_def_id} staged on turn {turn}"),
            LogEvent::GameEnd => f.write_str("game result acknowledged"),
        }
    }
}

/// Cursor over the `|`-separated fields of one line.
struct Fields<'a>(std::str::Split<'a, char>);

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Self(line.split('|'))
    }

    /// Next field, which must be exactly `literal`.
    fn literal(&mut self, literal: &str) -> Option<()> {
        (self.0.next()? == literal).then_some(())
    }

    /// Value of the next field, which must be `name=value`.
    fn value(&mut self, name: &str) -> Option<&'a str> {
        self.0.next()?.strip_prefix(name)?.strip_prefix('=')
    }

    fn word(&mut self, name: &str) -> Option<&'a str> {
        self.value(name).filter(|v| is_word(v))
    }

    fn number(&mut self, name: &str) -> Option<u32> {
        self.value(name)
            .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))?
            .parse()
            .ok()
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Parse one log line.
///
/// Returns `Ok(None)` for lines of no known shape and an error for a
/// matchmaking line whose game id is not a v4 UUID.
pub fn parse_line(line: &str) -> Result<Option<LogEvent>, Error> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.starts_with(GAME_RESULT_ACKED) {
        return Ok(Some(LogEvent::GameEnd));
    }
    if let Some(event) = parse_match_found(line)? {
        return Ok(Some(event));
    }
    Ok(parse_card_staged(line)
        .or_else(|| parse_turn_end(line))
        .or_else(|| parse_game_initializing(line)))
}

/// Parse lines lazily, in order, dropping lines of no known shape.
pub fn parse_lines<I>(lines: I) -> impl Iterator<Item = Result<LogEvent, Error>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref()).transpose())
}

fn parse_match_found(line: &str) -> Result<Option<LogEvent>, Error> {
    let mut fields = Fields::new(line);
    let Some(raw) = fields.literal(MATCH_FOUND).and_then(|_| fields.value("GameId")) else {
        return Ok(None);
    };
    let game_id = parse_game_id(raw)?;
    Ok(Some(LogEvent::GameStart { game_id }))
}

/// Hyphenated, lower-case, version 4, RFC 4122 variant.
pub fn parse_game_id(raw: &str) -> Result<Uuid, Error> {
    let invalid = || Error::InvalidGameId(raw.to_owned());
    if raw.len() != 36 || raw.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(invalid());
    }
    let id = Uuid::try_parse(raw).map_err(|_| invalid())?;
    if id.get_version_num() != 4 || id.get_variant() != Variant::RFC4122 {
        return Err(invalid());
    }
    Ok(id)
}

fn parse_card_staged(line: &str) -> Option<LogEvent> {
    let mut fields = Fields::new(line);
    fields.literal(STAGE_CARD)?;
    let card_def_id = fields.word("CardDefId")?.to_owned();
    let card_entity_id = fields.number("CardEntityId")?;
    let zone_entity_id = fields.number("ZoneEntityId")?;
    let turn = fields.number("Turn")?;
    Some(LogEvent::CardStaged {
        card_def_id,
        card_entity_id,
        zone_entity_id,
        turn,
    })
}

fn parse_turn_end(line: &str) -> Option<LogEvent> {
    let mut fields = Fields::new(line);
    fields.literal(END_TURN)?;
    let turn = fields.number("Turn").filter(|turn| (1..=7).contains(turn))?;
    Some(LogEvent::TurnEnd { turn })
}

fn parse_game_initializing(line: &str) -> Option<LogEvent> {
    let mut fields = Fields::new(line);
    fields.literal(GAME_MANAGER)?;
    fields.literal("Initialize")?;
    (fields.value("gameMode")? == "Remote").then_some(())?;
    let mode = fields.word("leagueDefId")?.to_owned();
    (fields.value("sceneToLoadAfterGame")? == "Play").then_some(())?;
    Some(LogEvent::GameInitializing { mode })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn matchmaking_found() {
        let line = "OnMatchmakingMatchFound|GameId=60c106af-c97f-445b-8840-d6433be947f9|GameHostUrl=wss://eu-central-1-ws-cf.nvprod.snapgametech.com/v33.16-7-game";
        let event = parse_line(line).unwrap().unwrap();
        assert_eq!(
            event,
            LogEvent::GameStart {
                game_id: Uuid::parse_str("60c106af-c97f-445b-8840-d6433be947f9").unwrap()
            }
        );
    }

    #[test]
    fn matchmaking_with_non_v4_id_fails() {
        // version nibble is 1
        let line = "OnMatchmakingMatchFound|GameId=60c106af-c97f-145b-8840-d6433be947f9";
        assert!(matches!(parse_line(line), Err(Error::InvalidGameId(_))));
        let line = "OnMatchmakingMatchFound|GameId=not-a-uuid";
        assert!(matches!(parse_line(line), Err(Error::InvalidGameId(_))));
    }

    #[test]
    fn result_acknowledged() {
        let line = "RemoteGame|SendRequestObject|RequestType=CubeGame.AckGameResultRequest";
        assert_eq!(parse_line(line).unwrap(), Some(LogEvent::GameEnd));
    }

    #[test]
    fn turn_end() {
        assert_eq!(
            parse_line("EndTurn|Turn=3\r\n").unwrap(),
            Some(LogEvent::TurnEnd { turn: 3 })
        );
        assert_eq!(parse_line("EndTurn|Turn=0").unwrap(), None);
        assert_eq!(parse_line("EndTurn|Turn=8").unwrap(), None);
    }

    #[test]
    fn card_staged() {
        let line = "StageCard|CardDefId=Deadpool|CardEntityId=62|ZoneEntityId=11|Turn=6";
        let event = parse_line(line).unwrap().unwrap();
        assert_eq!(event.kind(), LogEventKind::CardStaged);
        assert_eq!(
            event,
            LogEvent::CardStaged {
                card_def_id: "Deadpool".into(),
                card_entity_id: 62,
                zone_entity_id: 11,
                turn: 6,
            }
        );
    }

    #[test]
    fn game_initializing() {
        let line = "GameManager|Initialize|gameMode=Remote|leagueDefId=Ranked|sceneToLoadAfterGame=Play";
        assert_eq!(
            parse_line(line).unwrap(),
            Some(LogEvent::GameInitializing {
                mode: "Ranked".into()
            })
        );
        let local = "GameManager|Initialize|gameMode=Local|leagueDefId=Ranked|sceneToLoadAfterGame=Play";
        assert_eq!(parse_line(local).unwrap(), None);
    }

    #[test]
    fn noise_is_dropped() {
        let lines = [
            "UnityEngine.Debug:Log(Object)",
            "",
            "StageCard|CardDefId=Deadpool|CardEntityId=x|ZoneEntityId=11|Turn=6",
            "EndTurn|Turn=2",
        ];
        let events: Vec<_> = parse_lines(lines).collect::<Result<_, _>>().unwrap();
        assert_eq!(events, [LogEvent::TurnEnd { turn: 2 }]);
    }

    proptest! {
        #[test]
        fn unknown_shapes_yield_nothing(line in "[a-zA-Z0-9 =:._-]{0,80}") {
            // no `|`, so no known shape can match
            prop_assert_eq!(parse_line(&line).unwrap(), None);
        }

        #[test]
        fn end_turn_roundtrips(turn in 1u32..=7) {
            let line = format!("EndTurn|Turn={turn}");
            prop_assert_eq!(parse_line(&line).unwrap(), Some(LogEvent::TurnEnd { turn }));
        }
    }
}
