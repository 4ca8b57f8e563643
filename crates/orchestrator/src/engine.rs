#![forbid(unsafe_code)]

use crate::clock::Clock;
use crate::error::Error;
use crate::flusher::CacheFlusher;
use crate::reader::StateReader;
use crate::session::{GameSession, SessionMachine, Transition, Verdict};
use crate::snapshot::{SaveOutcome, SnapshotName, SnapshotRepository, SnapshotStore};
use crate::tailer::LogTailer;
use config::Config;
use kernel::json::find_key;
use kernel::{LogEvent, parse_lines};
use notify::{Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, error, info, trace, warn};

pub struct Services {
    pub reader: Box<dyn StateReader + Send + Sync>,
    pub snapshots: Box<dyn SnapshotRepository + Send + Sync>,
    pub clock: Box<dyn Clock + Send + Sync>,
}

pub enum ControlEvent {
    /// Log the current session.
    DumpSession,
}

/// What one batch of log lines did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub events: usize,
    pub malformed: usize,
    pub transitions: Vec<Transition>,
}

/// Follows the client's logs and match-state document for one account.
pub struct Tracker {
    config: Config,
    reader: Box<dyn StateReader + Send + Sync>,
    clock: Box<dyn Clock + Send + Sync>,
    machine: SessionMachine,
    snapshots: SnapshotStore,
    tailers: Vec<LogTailer>,
}

impl Tracker {
    /// Start tracking at the current end of every configured log.
    pub async fn new(config: Config, services: Services, account_id: &str) -> Result<Self, Error> {
        let mut tailers = Vec::new();
        for path in config.game.log_paths() {
            tailers.push(LogTailer::open(path).await?);
        }
        Ok(Self {
            config,
            reader: services.reader,
            clock: services.clock,
            machine: SessionMachine::new(account_id),
            snapshots: SnapshotStore::new(services.snapshots),
            tailers,
        })
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.machine.session()
    }

    /// Feed new log lines to the session.
    ///
    /// A turn ending re-reads the match-state document, since the client
    /// rewrites it at that point.
    pub async fn handle_log_lines(&mut self, lines: &[String]) -> Result<BatchReport, Error> {
        let mut report = BatchReport::default();
        for event in parse_lines(lines.iter().map(String::as_str)) {
            let event = match event {
                Ok(event) => event,
                Err(err) => {
                    warn!(%err, "malformed log line");
                    report.malformed += 1;
                    continue;
                }
            };
            trace!(%event, "log event");
            report.events += 1;
            let transition = self.machine.on_event(&event);
            if matches!(event, LogEvent::TurnEnd { .. })
                && let Err(err) = self.handle_state_change().await
            {
                warn!(%err, "cannot read game state after turn end");
            }
            if transition != Transition::Unchanged {
                report.transitions.push(transition);
            }
        }
        Ok(report)
    }

    /// Read the match-state document and act on the session's verdict.
    pub async fn handle_state_change(&mut self) -> Result<Verdict, Error> {
        let document = self.reader.game_state().await?;
        for (path, card) in find_key(&document.state, "CardDefId") {
            debug!(%path, %card, "CardDefId");
        }
        if let Some(info) = &document.view.client_game_info {
            debug!(%info, "client game info");
        }

        let verdict = self.machine.observe_document(&document.view)?;
        match &verdict {
            Verdict::Idle => debug!("no game tracked, ignoring state"),
            Verdict::Mismatch { tracked, document: in_state } => {
                warn!(?tracked, ?in_state, "game id mismatch, state not saved");
            }
            Verdict::Stale { .. } => {}
            Verdict::Persist => {
                self.snapshots
                    .save(&document.state, SnapshotName::Timestamped(self.clock.now()))
                    .await?;
            }
            Verdict::Finished { session, result } => {
                let name = SnapshotName::for_result(result, session.id, self.clock.now());
                if let SaveOutcome::Written { name, .. } =
                    self.snapshots.save(&document.state, name).await?
                {
                    info!(%name, "final state saved");
                }
            }
        }
        Ok(verdict)
    }

    /// React to a change of `path`.
    pub async fn process_change(&mut self, path: &Path) -> Result<(), Error> {
        let Some(file_name) = path.file_name() else {
            return Ok(());
        };
        if let Some(tailer) = self
            .tailers
            .iter_mut()
            .find(|tailer| tailer.path().file_name() == Some(file_name))
        {
            let lines = tailer.read_new_lines().await?;
            if lines.is_empty() {
                return Ok(());
            }
            let report = self
                .handle_log_lines(&lines)
                .instrument(debug_span!("log_batch", lines = lines.len()))
                .await?;
            debug!(?report, "log batch handled");
            return Ok(());
        }
        if self.config.game.state_file("Game").file_name() == Some(file_name) {
            self.handle_state_change()
                .instrument(debug_span!("state_document"))
                .await?;
            return Ok(());
        }
        trace!(path = %path.display(), "unrelated file change");
        Ok(())
    }

    fn watched_dirs(&self) -> BTreeSet<PathBuf> {
        let mut dirs: BTreeSet<PathBuf> = self
            .tailers
            .iter()
            .filter_map(|tailer| tailer.path().parent().map(Path::to_owned))
            .collect();
        dirs.insert(self.config.game.state_dir());
        dirs
    }

    /// Watch the game's files until `cancel` is triggered.
    ///
    /// Errors handling a single change are logged; a truncated log ends the
    /// run.
    pub async fn run_until(
        &mut self,
        cancel: CancellationToken,
        mut control_rx: mpsc::UnboundedReceiver<ControlEvent>,
    ) -> Result<(), Error> {
        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
        let handler = move |result: notify::Result<Event>| {
            if tx.send(result).is_err() {
                debug!("watch receiver dropped");
            }
        };
        let mut watcher: Box<dyn Watcher + Send> = if self.config.watch.force_polling {
            let config = notify::Config::default().with_poll_interval(self.config.watch.poll_interval);
            Box::new(PollWatcher::new(handler, config)?)
        } else {
            Box::new(notify::recommended_watcher(handler)?)
        };
        for dir in self.watched_dirs() {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
            info!(dir = %dir.display(), "watching for file changes");
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("shutting down file watcher");
                    break;
                }
                Some(event) = control_rx.recv() => self.handle_control(event),
                Some(first) = rx.recv() => {
                    let mut batch = vec![first];
                    while let Ok(more) = rx.try_recv() {
                        batch.push(more);
                    }
                    for path in changed_paths(batch) {
                        match self.process_change(&path).await {
                            Ok(()) => {}
                            Err(err @ Error::TruncatedLog { .. }) => return Err(err),
                            Err(err) => error!(path = %path.display(), %err, "failed to handle change"),
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_control(&self, event: ControlEvent) {
        match event {
            ControlEvent::DumpSession => match self.session() {
                Some(session) => info!(%session, "current session"),
                None => info!("no game tracked"),
            },
        }
    }
}

/// Distinct paths of relevant changes, in path order.
fn changed_paths(batch: Vec<notify::Result<Event>>) -> BTreeSet<PathBuf> {
    let mut paths = BTreeSet::new();
    for result in batch {
        match result {
            Ok(event) if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) => {
                paths.extend(event.paths);
            }
            Ok(_) => {}
            Err(err) => warn!(%err, "file watcher error"),
        }
    }
    paths
}

/// Run `tracker` and, if given, `flusher` side by side until `cancel` fires
/// or the tracker stops.
pub async fn run(
    tracker: &mut Tracker,
    flusher: Option<CacheFlusher>,
    cancel: CancellationToken,
    control_rx: mpsc::UnboundedReceiver<ControlEvent>,
) -> Result<(), Error> {
    let watch = async {
        let result = tracker.run_until(cancel.clone(), control_rx).await;
        cancel.cancel();
        result
    };
    let flush = async {
        match &flusher {
            Some(flusher) => flusher.run_until(cancel.clone()).await.map(|_| ()),
            None => Ok(()),
        }
    };
    let (watched, flushed) = tokio::join!(watch, flush);
    watched.and(flushed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn batches_dedupe_relevant_paths() {
        let modify = |path: &str| {
            Ok(Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from(path)))
        };
        let batch = vec![
            modify("/snap/Player.log"),
            Ok(Event::new(EventKind::Create(CreateKind::File)).add_path("/snap/GameState.json".into())),
            modify("/snap/Player.log"),
            Ok(Event::new(EventKind::Access(notify::event::AccessKind::Any)).add_path("/snap/x".into())),
            Err(notify::Error::generic("boom")),
        ];
        let paths: Vec<_> = changed_paths(batch).into_iter().collect();
        assert_eq!(
            paths,
            [PathBuf::from("/snap/GameState.json"), PathBuf::from("/snap/Player.log")]
        );
    }
}
