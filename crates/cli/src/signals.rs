use crate::error::Error;
use flume::Sender;

/// Indefinitely listens to signals and sends signal events to the provided channel.
#[cfg(unix)]
pub async fn wait_for_signal(signal_event: &Sender<SignalEvent>) -> Result<(), Error> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt()).map_err(Error::SignalHandler)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(Error::SignalHandler)?;
    let mut sigusr1 = signal(SignalKind::user_defined1()).map_err(Error::SignalHandler)?;

    loop {
        tokio::select! {
            _ = sigint.recv() => {
                signal_event.send_async(SignalEvent::Interrupt).await?;
            }
            _ = sigterm.recv() => {
                signal_event.send_async(SignalEvent::Terminate).await?;
            }
            _ = sigusr1.recv() => {
                signal_event.send_async(SignalEvent::SigUSR1).await?;
            }
        }
    }
}

/// Indefinitely listens to Ctrl-C and sends signal events to the provided channel.
#[cfg(not(unix))]
pub async fn wait_for_signal(signal_event: &Sender<SignalEvent>) -> Result<(), Error> {
    loop {
        tokio::signal::ctrl_c().await.map_err(Error::SignalHandler)?;
        signal_event.send_async(SignalEvent::Interrupt).await?;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Interrupt,
    Terminate,
    /// Dump the tracked session.
    SigUSR1,
}

impl SignalEvent {
    pub fn is_shutdown(self) -> bool {
        matches!(self, SignalEvent::Interrupt | SignalEvent::Terminate)
    }
}
