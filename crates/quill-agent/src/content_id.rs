// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential content identifiers (`CC30`, `CC31`, ...).
//!
//! The generator formats numbers drawn from an [`IdSequence`]. Two sequences
//! are provided: [`InMemorySequence`] restarts from the configured start on
//! every launch, [`FileSequence`] persists the next number so identifiers
//! stay unique across restarts of a single process.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use quill_config::model::ContentConfig;
use quill_core::QuillError;
use tracing::{debug, info, warn};

/// A gap-free, monotonically increasing source of numbers.
pub trait IdSequence: Send + Sync {
    /// Returns the current number and advances by exactly one.
    fn next_value(&self) -> u64;

    /// Returns the number the next call to [`next_value`](Self::next_value)
    /// will hand out, without consuming it.
    fn peek(&self) -> u64;
}

/// Process-local sequence backed by an atomic counter.
#[derive(Debug)]
pub struct InMemorySequence {
    next: AtomicU64,
}

impl InMemorySequence {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdSequence for InMemorySequence {
    fn next_value(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

/// Sequence that writes the next number to a file after every increment.
///
/// The file holds a single decimal number. Writes go to a sibling temp file
/// that is then renamed over the original.
#[derive(Debug)]
pub struct FileSequence {
    path: PathBuf,
    next: Mutex<u64>,
}

impl FileSequence {
    /// Opens the counter file, starting at `max(file value, start)`.
    ///
    /// A missing file is not an error; it is created on the first increment.
    pub fn open(path: impl Into<PathBuf>, start: u64) -> Result<Self, QuillError> {
        let path = path.into();
        let stored = read_counter(&path)?;
        let next = stored.map_or(start, |n| n.max(start));

        info!(
            path = %path.display(),
            stored = ?stored,
            next,
            "content id counter loaded"
        );

        Ok(Self {
            path,
            next: Mutex::new(next),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdSequence for FileSequence {
    fn next_value(&self) -> u64 {
        let mut guard = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let value = *guard;
        *guard = value + 1;

        // The in-memory value has already advanced, so a failed write never
        // causes an identifier to be handed out twice in this process.
        if let Err(e) = write_counter(&self.path, value + 1) {
            warn!(
                error = %e,
                path = %self.path.display(),
                "failed to persist content id counter"
            );
        } else {
            debug!(next = value + 1, "content id counter persisted");
        }

        value
    }

    fn peek(&self) -> u64 {
        *self.next.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_counter(path: &Path) -> Result<Option<u64>, QuillError> {
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| QuillError::Storage {
                source: format!("counter file {} is corrupt: {e}", path.display()).into(),
            }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(QuillError::Storage {
            source: Box::new(e),
        }),
    }
}

fn write_counter(path: &Path, value: u64) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, format!("{value}\n"))?;
    std::fs::rename(&tmp, path)
}

/// Formats sequence numbers as `<prefix><zero-padded number>`.
pub struct ContentIdGenerator {
    prefix: String,
    width: usize,
    sequence: Box<dyn IdSequence>,
}

impl ContentIdGenerator {
    pub fn new(prefix: impl Into<String>, width: usize, sequence: Box<dyn IdSequence>) -> Self {
        Self {
            prefix: prefix.into(),
            width,
            sequence,
        }
    }

    /// Builds a generator from config, persisting to `counter_path` when set.
    pub fn from_config(config: &ContentConfig) -> Result<Self, QuillError> {
        let sequence: Box<dyn IdSequence> = match &config.counter_path {
            Some(path) => Box::new(FileSequence::open(path, config.id_start)?),
            None => Box::new(InMemorySequence::new(config.id_start)),
        };
        Ok(Self::new(config.id_prefix.clone(), config.id_width, sequence))
    }

    /// Hands out the next identifier.
    pub fn next(&self) -> String {
        self.format(self.sequence.next_value())
    }

    /// The identifier the next call to [`next`](Self::next) will return.
    pub fn peek(&self) -> String {
        self.format(self.sequence.peek())
    }

    fn format(&self, n: u64) -> String {
        format!("{}{:0width$}", self.prefix, n, width = self.width)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn generator(prefix: &str, start: u64, width: usize) -> ContentIdGenerator {
        ContentIdGenerator::new(prefix, width, Box::new(InMemorySequence::new(start)))
    }

    #[test]
    fn starts_at_configured_value_and_increments_by_one() {
        let ids = generator("CC", 30, 2);
        assert_eq!(ids.next(), "CC30");
        assert_eq!(ids.next(), "CC31");
        assert_eq!(ids.next(), "CC32");
    }

    #[test]
    fn zero_pads_to_width() {
        let ids = generator("CC", 3, 2);
        assert_eq!(ids.next(), "CC03");
        let wide = generator("ST", 7, 4);
        assert_eq!(wide.next(), "ST0007");
    }

    #[test]
    fn numbers_longer_than_width_are_not_truncated() {
        let ids = generator("CC", 99, 2);
        assert_eq!(ids.next(), "CC99");
        assert_eq!(ids.next(), "CC100");
    }

    #[test]
    fn peek_does_not_consume() {
        let ids = generator("CC", 30, 2);
        assert_eq!(ids.peek(), "CC30");
        assert_eq!(ids.peek(), "CC30");
        assert_eq!(ids.next(), "CC30");
        assert_eq!(ids.peek(), "CC31");
    }

    #[test]
    fn concurrent_increments_never_duplicate() {
        let seq = Arc::new(InMemorySequence::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seq = seq.clone();
                std::thread::spawn(move || (0..250).map(|_| seq.next_value()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        let expected: Vec<u64> = (0..2000).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn file_sequence_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter");

        let seq = FileSequence::open(&path, 30).unwrap();
        assert_eq!(seq.next_value(), 30);
        assert_eq!(seq.next_value(), 31);
        drop(seq);

        let reopened = FileSequence::open(&path, 30).unwrap();
        assert_eq!(reopened.peek(), 32);
        assert_eq!(reopened.next_value(), 32);
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "33");
    }

    #[test]
    fn file_sequence_respects_higher_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter");
        std::fs::write(&path, "12\n").unwrap();

        let seq = FileSequence::open(&path, 40).unwrap();
        assert_eq!(seq.next_value(), 40);
    }

    #[test]
    fn file_sequence_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("quill").join("counter");

        let seq = FileSequence::open(&path, 1).unwrap();
        assert_eq!(seq.next_value(), 1);
        assert!(path.exists());
    }

    #[test]
    fn corrupt_counter_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter");
        std::fs::write(&path, "not a number").unwrap();

        let err = FileSequence::open(&path, 1).unwrap_err();
        assert!(matches!(err, QuillError::Storage { .. }));
    }

    #[test]
    fn from_config_uses_prefix_start_and_width() {
        let config = ContentConfig {
            id_prefix: "ST".into(),
            id_start: 5,
            id_width: 3,
            ..ContentConfig::default()
        };
        let ids = ContentIdGenerator::from_config(&config).unwrap();
        assert_eq!(ids.next(), "ST005");
    }
}
