#![forbid(unsafe_code)]

use crate::error::Error;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, trace};

/// Read position in an append-only log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOffset {
    pub path: PathBuf,
    pub offset: u64,
}

/// Returns the complete lines appended to a log since the previous read.
///
/// A trailing line without its newline stays unread until it is finished.
#[derive(Debug)]
pub struct LogTailer {
    position: LogOffset,
}

impl LogTailer {
    /// Start at the current end of `path`, or at zero if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let offset = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(err) if err.kind() == ErrorKind::NotFound => 0,
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), offset, "tailing log");
        Ok(Self::at(path, offset))
    }

    pub fn at(path: impl Into<PathBuf>, offset: u64) -> Self {
        Self {
            position: LogOffset {
                path: path.into(),
                offset,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.position.path
    }

    pub fn position(&self) -> &LogOffset {
        &self.position
    }

    pub async fn read_new_lines(&mut self) -> Result<Vec<String>, Error> {
        let LogOffset { path, offset } = &mut self.position;
        let mut file = match tokio::fs::File::open(&*path).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound && *offset == 0 => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let len = file.metadata().await?.len();
        if len < *offset {
            return Err(Error::TruncatedLog {
                path: path.clone(),
                offset: *offset,
                len,
            });
        }
        if len == *offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(*offset)).await?;
        let mut buf = Vec::with_capacity((len - *offset) as usize);
        file.take(len - *offset).read_to_end(&mut buf).await?;

        let Some(end) = buf.iter().rposition(|&b| b == b'\n') else {
            trace!(path = %path.display(), pending = buf.len(), "partial line");
            return Ok(Vec::new());
        };
        let complete = &buf[..=end];
        *offset += complete.len() as u64;

        let lines: Vec<String> = String::from_utf8_lossy(complete)
            .lines()
            .map(str::to_owned)
            .collect();
        debug!(path = %path.display(), lines = lines.len(), offset = *offset, "read log");
        Ok(lines)
    }
}
