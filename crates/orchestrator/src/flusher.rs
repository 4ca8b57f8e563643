#![forbid(unsafe_code)]

use crate::clock::Clock;
use crate::error::Error;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Periodically runs the configured volume cache flush command.
///
/// Touches no session state. On cancellation an in-flight command is killed
/// and reaped before returning.
pub struct CacheFlusher {
    config: config::Flush,
    clock: Box<dyn Clock + Send + Sync>,
}

impl CacheFlusher {
    pub fn new(config: config::Flush, clock: Box<dyn Clock + Send + Sync>) -> Self {
        Self { config, clock }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .args(self.config.resolved_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }

    /// Flush every interval until `cancel` fires. Returns the number of
    /// completed attempts.
    pub async fn run_until(&self, cancel: CancellationToken) -> Result<u64, Error> {
        info!(
            every = ?self.config.interval,
            volume = %self.config.volume,
            "periodic volume cache flush"
        );
        let mut runs = 0u64;
        loop {
            let mut child = match self.command().spawn() {
                Ok(child) => Some(child),
                Err(err) => {
                    warn!(program = %self.config.program, %err, "failed to start cache flush");
                    None
                }
            };

            let cancelled = match child.as_mut() {
                Some(running) => tokio::select! {
                    _ = cancel.cancelled() => true,
                    status = running.wait() => {
                        match status {
                            Ok(status) if !status.success() => warn!(%status, "cache flush failed"),
                            Ok(_) => {}
                            Err(err) => warn!(%err, "cache flush wait failed"),
                        }
                        false
                    }
                },
                None => cancel.is_cancelled(),
            };
            if cancelled {
                terminate(child).await;
                break;
            }
            runs += 1;
            debug!(runs, "cache flush done, sleeping");

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.clock.sleep(self.config.interval) => {}
            }
        }
        info!(runs, "periodic cache flush shut down");
        Ok(runs)
    }
}

/// Kill and reap `child`; a missing or already exited process is fine.
async fn terminate(child: Option<Child>) {
    let Some(mut child) = child else {
        return;
    };
    if let Err(err) = child.kill().await {
        debug!(%err, "cache flush process already gone");
    }
}
