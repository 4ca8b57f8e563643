use kernel::{LogEvent, LogEventKind, parse_lines};
use pretty_assertions::assert_eq;

const SAMPLE: &str = include_str!("data/Player.log");

#[test]
fn sample_log_replays_a_full_match() {
    let events: Vec<LogEvent> = parse_lines(SAMPLE.lines())
        .collect::<Result<_, _>>()
        .expect("sample log parses");

    assert_eq!(events.first().map(LogEvent::kind), Some(LogEventKind::GameInitializing));
    assert_eq!(events.get(1).map(LogEvent::kind), Some(LogEventKind::GameStart));
    assert_eq!(events.last(), Some(&LogEvent::GameEnd));

    let turns: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            LogEvent::TurnEnd { turn } => Some(*turn),
            _ => None,
        })
        .collect();
    assert_eq!(turns, (1..=6).collect::<Vec<_>>());

    let staged: Vec<&str> = events
        .iter()
        .filter_map(|event| match event {
            LogEvent::CardStaged { card_def_id, .. } => Some(card_def_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(staged.last(), Some(&"Deadpool"));
    assert_eq!(staged.len(), 6);
}

#[test]
fn parsing_is_restartable() {
    let first: Vec<_> = parse_lines(SAMPLE.lines()).collect();
    let second: Vec<_> = parse_lines(SAMPLE.lines()).collect();
    assert_eq!(first.len(), second.len());
}
