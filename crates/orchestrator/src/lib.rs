#![forbid(unsafe_code)]

pub mod clock;
pub mod engine;
mod error;
pub mod flusher;
pub mod reader;
pub mod session;
pub mod snapshot;
pub mod sync;
pub mod tailer;

pub use clock::{Clock, SystemClock};
pub use engine::{ControlEvent, Services, Tracker};
pub use error::Error;
pub use flusher::CacheFlusher;
pub use reader::{FsStateReader, GameStateDocument, LoadedAccount, StateReader};
pub use session::{GameSession, SessionMachine, SessionState, Transition, Verdict};
pub use snapshot::{FsSnapshotRepository, NoopSnapshotRepository, SnapshotRepository, SnapshotStore};
pub use sync::{DocumentSink, NoopSink, SqliteDocumentSink, sync_directory};
pub use tailer::{LogOffset, LogTailer};
