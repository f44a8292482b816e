//! Classify command: shows the category of every logged event.
//!
//! Useful when writing a new application rule, to see how titles are split.

use std::io::Write;

use anyhow::{Context, Result};
use wt_core::{Classifier, Event, LogError};

use super::report::format_instant;

/// Writes `<time> <activity> <category>` for each event.
pub fn run<W, I>(out: &mut W, events: I, classifier: &Classifier) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = Result<Event, LogError>>,
{
    for event in events {
        let event = event.context("failed to read activity log")?;
        let category = classifier.classify(&event.window());
        let label = if category.is_empty() {
            "(uncategorized)".to_string()
        } else {
            category.label()
        };
        writeln!(
            out,
            "{} {} {label}",
            format_instant(event.time),
            event.activity
        )?;
    }
    Ok(())
}
