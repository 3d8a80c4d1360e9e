//! File-backed snapshot store using JSON lines.
//!
//! The first line holds the counters and id cursor, each following line one
//! queued entry. Every save rewrites the file through a temporary sibling and
//! a rename, so a crash mid-write leaves the previous snapshot intact.

use std::fs::{create_dir_all, remove_file, rename, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{EntryId, QueueEntry, QueueSnapshot, QueueStore, SchedulerError, SchedulerState};

#[derive(Serialize, Deserialize)]
struct Header {
    state: SchedulerState,
    next_id: EntryId,
    entries: usize,
}

fn io_err(e: std::io::Error) -> SchedulerError {
    SchedulerError::Store(e.to_string())
}

/// Snapshot store writing `<dir>/<stream>.jsonl`.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
    stream: String,
}

impl JsonlStore {
    /// Create the store, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>, stream: impl Into<String>) -> Result<Self, SchedulerError> {
        let path = dir.as_ref().to_path_buf();
        create_dir_all(&path).map_err(io_err)?;
        Ok(Self {
            path,
            stream: stream.into(),
        })
    }

    /// Snapshot file location.
    pub fn file_path(&self) -> PathBuf {
        self.path.join(format!("{}.jsonl", self.stream))
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.join(format!("{}.jsonl.tmp", self.stream))
    }
}

fn write_snapshot(path: &Path, snapshot: &QueueSnapshot) -> Result<(), SchedulerError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let header = Header {
        state: snapshot.state,
        next_id: snapshot.next_id,
        entries: snapshot.entries.len(),
    };
    serde_json::to_writer(&mut writer, &header)?;
    writeln!(writer).map_err(io_err)?;
    for entry in &snapshot.entries {
        serde_json::to_writer(&mut writer, entry)?;
        writeln!(writer).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

impl QueueStore for JsonlStore {
    fn save(&mut self, snapshot: &QueueSnapshot) -> Result<(), SchedulerError> {
        let tmp = self.tmp_path();
        let written = write_snapshot(&tmp, snapshot)
            .and_then(|()| rename(&tmp, self.file_path()).map_err(io_err));
        if let Err(e) = written {
            if let Err(cleanup) = remove_file(&tmp) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %tmp.display(),
                        "failed to remove partial snapshot: {cleanup}"
                    );
                }
            }
            return Err(e);
        }

        tracing::debug!(
            path = %self.file_path().display(),
            entries = snapshot.entries.len(),
            "snapshot written"
        );
        Ok(())
    }

    fn load(&mut self) -> Result<Option<QueueSnapshot>, SchedulerError> {
        let file_path = self.file_path();
        if !file_path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&file_path).map_err(io_err)?);
        let mut lines = reader.lines();

        let Some(first) = lines.next() else {
            return Ok(None);
        };
        let header: Header = serde_json::from_str(&first.map_err(io_err)?)?;

        let mut entries = Vec::with_capacity(header.entries);
        for line in lines {
            let line = line.map_err(io_err)?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: QueueEntry = serde_json::from_str(&line)?;
            entries.push(entry);
        }
        if entries.len() != header.entries {
            return Err(SchedulerError::Store(format!(
                "snapshot {} is truncated: expected {} entries, found {}",
                file_path.display(),
                header.entries,
                entries.len()
            )));
        }

        Ok(Some(QueueSnapshot {
            entries,
            state: header.state,
            next_id: header.next_id,
        }))
    }
}
