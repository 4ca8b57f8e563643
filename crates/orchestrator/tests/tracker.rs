#![forbid(unsafe_code)]

use chrono::{DateTime, TimeZone, Utc};
use config::Config;
use kernel::document::UTF8_BOM;
use orchestrator::{
    CacheFlusher, Clock, Error, FsSnapshotRepository, FsStateReader, Services, SystemClock,
    Tracker, Transition, Verdict, engine,
};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tempfile::{TempDir, tempdir};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const GAME: &str = "60c106af-c97f-445b-8840-d6433be947f9";

/// One second later on every reading.
#[derive(Default)]
struct SteppingClock(AtomicI64);

#[async_trait::async_trait]
impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let step = self.0.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap() + chrono::Duration::seconds(step)
    }

    async fn sleep(&self, _duration: Duration) {}
}

struct Fixture {
    _dir: TempDir,
    config: Config,
    log: PathBuf,
    state: PathBuf,
    snapshots: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.game.data_dir = dir.path().to_owned();
        config.game.state_subdir = "States".into();
        config.game.log_files = vec!["Player.log".into()];
        config.persistence.snapshot_dir = dir.path().join("snapshots");
        std::fs::create_dir(dir.path().join("States")).unwrap();

        let log = dir.path().join("Player.log");
        std::fs::write(&log, "EndTurn|Turn=5\nfrom an earlier session\n").unwrap();
        Self {
            log,
            state: config.game.state_file("Game"),
            snapshots: config.persistence.snapshot_dir.clone(),
            config,
            _dir: dir,
        }
    }

    async fn tracker(&self) -> Tracker {
        let services = Services {
            reader: Box::new(FsStateReader::new(self.config.game.clone())),
            snapshots: Box::new(FsSnapshotRepository::new(&self.snapshots).await.unwrap()),
            clock: Box::new(SteppingClock::default()),
        };
        Tracker::new(self.config.clone(), services, "me").await.unwrap()
    }

    async fn append_log(&self, lines: &[&str]) {
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.log)
            .await
            .unwrap();
        for line in lines {
            file.write_all(format!("{line}\n").as_bytes()).await.unwrap();
        }
        file.flush().await.unwrap();
    }

    fn write_state(&self, game_state: Value) {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend(serde_json::to_vec(&json!({"RemoteGame": {"GameState": game_state}})).unwrap());
        std::fs::write(&self.state, bytes).unwrap();
    }

    fn snapshot_names(&self) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(&self.snapshots)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn players() -> Value {
    json!([
        {"PlayerInfo": {"AccountId": "me", "Name": "Me"}},
        {"PlayerInfo": {"AccountId": "them", "Name": "Rival", "CollectionScore": 1800, "HighWatermarkRank": 55}}
    ])
}

async fn change(tracker: &mut Tracker, path: &Path) {
    tracker.process_change(path).await.unwrap();
}

#[tokio::test]
async fn tracks_a_match_from_start_to_result() {
    let fixture = Fixture::new();
    fixture.write_state(json!({"Id": "00000000-0000-4000-8000-000000000000", "Turn": 6}));
    let mut tracker = fixture.tracker().await;

    // Older log content and the previous game's state are not tracked.
    change(&mut tracker, &fixture.log).await;
    change(&mut tracker, &fixture.state).await;
    assert!(tracker.session().is_none());
    assert!(fixture.snapshot_names().is_empty());

    fixture
        .append_log(&[
            "GameManager|Initialize|gameMode=Remote|leagueDefId=Ranked|sceneToLoadAfterGame=Play",
            &format!("OnMatchmakingMatchFound|GameId={GAME}|GameHostUrl=wss://example"),
        ])
        .await;
    change(&mut tracker, &fixture.log).await;
    let game_id = Uuid::parse_str(GAME).unwrap();
    assert_eq!(tracker.session().unwrap().id, Some(game_id));

    fixture.write_state(json!({"Id": GAME, "Turn": 1, "Players": players()}));
    change(&mut tracker, &fixture.state).await;
    change(&mut tracker, &fixture.state).await;
    assert_eq!(fixture.snapshot_names(), ["game_state_20240501T200000000000.json"]);
    let session = tracker.session().unwrap();
    assert_eq!(session.opponent.as_ref().unwrap().name, "Rival");

    // The log runs ahead of the state document, which is then stale.
    fixture
        .append_log(&[
            "StageCard|CardDefId=Deadpool|CardEntityId=62|ZoneEntityId=11|Turn=2",
            "EndTurn|Turn=2",
        ])
        .await;
    change(&mut tracker, &fixture.log).await;
    assert_eq!(tracker.session().unwrap().current_turn, 2);
    assert_eq!(fixture.snapshot_names().len(), 1);

    fixture.write_state(json!({
        "Id": GAME,
        "Turn": 6,
        "Players": players(),
        "ClientResultMessage": {"GameResultAccountItems": [
            {"AccountId": "them", "IsWinner": false, "IsLoser": true, "FinalCubeValue": 8},
            {"AccountId": "me", "IsWinner": true, "IsLoser": false, "FinalCubeValue": 8}
        ]}
    }));
    let verdict = tracker.handle_state_change().await.unwrap();
    assert!(matches!(verdict, Verdict::Finished { .. }));
    assert!(tracker.session().is_none());
    assert!(fixture.snapshot_names().contains(&format!("win-{GAME}.json")));
}

#[tokio::test]
async fn log_batches_report_transitions() {
    let fixture = Fixture::new();
    fixture.write_state(json!({"Turn": 0}));
    let mut tracker = fixture.tracker().await;

    let lines: Vec<String> = [
        "StageCard|CardDefId=Hulk|CardEntityId=3|ZoneEntityId=10|Turn=3",
        "OnMatchmakingMatchFound|GameId=not-a-game-id|GameHostUrl=wss://example",
        "EndTurn|Turn=3",
        "RemoteGame|SendRequestObject|RequestType=CubeGame.AckGameResultRequest",
        "EndTurn|Turn=4",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();
    let report = tracker.handle_log_lines(&lines).await.unwrap();

    assert_eq!(report.events, 4);
    assert_eq!(report.malformed, 1);
    assert_eq!(
        report.transitions,
        [
            Transition::Resumed { turn: 3 },
            Transition::TurnEnded { turn: 3 },
            Transition::AwaitingResult,
            Transition::TurnAdvanced { turn: 4 },
        ]
    );
    assert_eq!(tracker.session().unwrap().current_turn, 4);
}

fn watching(mut fixture: Fixture) -> Fixture {
    fixture.config.watch.force_polling = true;
    fixture.config.watch.poll_interval = Duration::from_millis(50);
    fixture
}

fn idle_flusher() -> CacheFlusher {
    let config = config::Flush {
        enabled: true,
        interval: Duration::from_secs(1),
        program: "/nonexistent/flush-volume-cache".into(),
        args: Vec::new(),
        volume: "C".into(),
    };
    CacheFlusher::new(config, Box::new(SystemClock))
}

fn spawn_run(
    mut tracker: Tracker,
    cancel: &CancellationToken,
) -> JoinHandle<(Tracker, Result<(), Error>)> {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        // dropping the sender leaves the control branch idle
        let (_control_tx, control_rx) = mpsc::unbounded_channel();
        let result = engine::run(&mut tracker, Some(idle_flusher()), cancel, control_rx).await;
        (tracker, result)
    })
}

async fn eventually(mut reached: impl FnMut() -> bool) {
    for _ in 0..100 {
        if reached() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("condition not reached within 5s");
}

#[tokio::test]
async fn watch_loop_follows_the_game_until_cancelled() {
    let fixture = watching(Fixture::new());
    fixture.write_state(json!({"Id": GAME, "Turn": 1, "Players": players()}));
    let tracker = fixture.tracker().await;
    let cancel = CancellationToken::new();
    let run = spawn_run(tracker, &cancel);

    // let the watcher take its first scan
    tokio::time::sleep(Duration::from_millis(300)).await;
    fixture
        .append_log(&[
            &format!("OnMatchmakingMatchFound|GameId={GAME}|GameHostUrl=wss://example"),
            "EndTurn|Turn=1",
        ])
        .await;
    eventually(|| !fixture.snapshot_names().is_empty()).await;

    cancel.cancel();
    let (tracker, result) = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("run did not stop")
        .unwrap();
    result.unwrap();

    let session = tracker.session().unwrap();
    assert_eq!(session.id, Some(Uuid::parse_str(GAME).unwrap()));
    assert_eq!(session.current_turn, 1);
    assert_eq!(fixture.snapshot_names().len(), 1);
}

#[tokio::test]
async fn watch_loop_stops_on_truncated_log() {
    let fixture = watching(Fixture::new());
    let tracker = fixture.tracker().await;
    let cancel = CancellationToken::new();
    let run = spawn_run(tracker, &cancel);

    tokio::time::sleep(Duration::from_millis(300)).await;
    std::fs::write(&fixture.log, "EndTurn|Turn=1\n").unwrap();

    let (_, result) = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("run did not stop")
        .unwrap();
    assert!(matches!(result, Err(Error::TruncatedLog { .. })), "{result:?}");
    assert!(cancel.is_cancelled());
}
