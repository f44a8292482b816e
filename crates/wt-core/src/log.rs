//! Streaming reader for the activity log.
//!
//! One JSON object per line. Blank lines are skipped; any other line that
//! fails to parse aborts the read with the offending line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::event::{Event, RawEvent, parse_time};

/// Buffer size for `BufReader` (64KB)
const BUFFER_SIZE: usize = 64 * 1024;

/// Errors reading the activity log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: malformed record: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: unparseable timestamp {value:?}")]
    Timestamp { line: usize, value: String },
}

/// Parses one log line. `line` is only used for error reporting.
pub fn parse_line(text: &str, line: usize) -> Result<Event, LogError> {
    let raw: RawEvent =
        serde_json::from_str(text).map_err(|source| LogError::Json { line, source })?;
    let time = parse_time(&raw.time).ok_or_else(|| LogError::Timestamp {
        line,
        value: raw.time.clone(),
    })?;
    Ok(Event {
        time,
        activity: raw.activity,
        class: raw.class,
        instance: raw.instance,
        role: raw.role,
        title: raw.title,
    })
}

/// Iterator over the events of a log, yielding at most one error.
#[derive(Debug)]
pub struct EventReader<R> {
    lines: std::io::Lines<R>,
    line: usize,
    failed: bool,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            failed: false,
        }
    }
}

impl EventReader<BufReader<File>> {
    /// Opens the log at `path` for streaming.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::with_capacity(BUFFER_SIZE, file)))
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<Event, LogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.line += 1;
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            };
            if text.trim().is_empty() {
                continue;
            }
            let result = parse_line(&text, self.line);
            self.failed = result.is_err();
            return Some(result);
        }
    }
}
