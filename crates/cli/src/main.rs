use anyhow::Context;
use clap::Parser;
use config::Config;
use flume::bounded;
use kernel::PriceTable;
use orchestrator::{
    CacheFlusher, ControlEvent, FsSnapshotRepository, FsStateReader, Services, SqliteDocumentSink,
    StateReader, SystemClock, Tracker, engine, sync_directory,
};
use snap_tracker::cli::{Cli, Command};
use snap_tracker::commands;
use snap_tracker::signals::wait_for_signal;
use std::io::{Write, stdout};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use tracing_log::AsTrace;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.log_level_filter().as_trace())
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(config = ?cli);

    let config = match &cli.conffile {
        Some(path) => Config::load(path)?,
        None => Config::new()?,
    };
    let reader = FsStateReader::new(config.game.clone());

    match cli.command {
        Command::Run => run(config, reader).await?,
        Command::Upgrades => {
            let account = reader.load_account().await?;
            commands::write_upgrades(
                &mut stdout().lock(),
                &account,
                PriceTable::global(),
                config.optimizer.max_split_rows,
            )?;
        }
        Command::CardStats => {
            let account = reader.load_account().await?;
            writeln!(stdout().lock(), "{}", commands::card_stats(&account))?;
        }
        Command::Prices => writeln!(stdout().lock(), "{}", commands::prices(PriceTable::global()))?,
        Command::Sync => {
            let state_dir = config.game.state_dir();
            info!(dir = %state_dir.display(), "using game data directory");
            let sink = SqliteDocumentSink::new(config.persistence.database()).await?;
            let ids = sync_directory(&state_dir, &sink).await?;
            writeln!(stdout().lock(), "Synced {} documents.", ids.len())?;
        }
        Command::Config => write!(stdout().lock(), "{}", config.to_toml_string()?)?,
    }
    Ok(())
}

async fn run(config: Config, reader: FsStateReader) -> anyhow::Result<()> {
    let profile = reader
        .load_profile()
        .await
        .context("the game must have been started once to track it")?;
    let services = Services {
        reader: Box::new(reader),
        snapshots: Box::new(FsSnapshotRepository::new(&config.persistence.snapshot_dir).await?),
        clock: Box::new(SystemClock),
    };
    let flusher = config
        .flush
        .enabled
        .then(|| CacheFlusher::new(config.flush.clone(), Box::new(SystemClock)));
    let mut tracker = Tracker::new(config, services, &profile.account.id).await?;

    let cancel = CancellationToken::new();
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = bounded(8);

    tokio::spawn(async move {
        if let Err(err) = wait_for_signal(&events_tx).await {
            error!(error = ?err, "Error while waiting for signal");
        }
    });
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            while let Ok(event) = events_rx.recv_async().await {
                debug!(?event, "Received signal event");
                if event.is_shutdown() {
                    info!("shutting down");
                    cancel.cancel();
                } else if control_tx.send(ControlEvent::DumpSession).is_err() {
                    break;
                }
            }
        }
    });

    engine::run(&mut tracker, flusher, cancel, control_rx).await?;
    Ok(())
}
