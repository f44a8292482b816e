//! Report command.
//!
//! Text output comes in three parts, in this order:
//! 1. one JSON record per interval, each followed by a human-readable line
//! 2. overall totals, longest first
//! 3. one block of totals per day, in date order
//!
//! Interval records are written as soon as they are closed, so a malformed
//! log line aborts the run after the records before it have been printed.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta};
use serde::Serialize;
use wt_core::{
    Classifier, ClosedInterval, Event, IntervalBuilder, LabelSource, LogError, Totals, TotalsTable,
};

/// Options for one report run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub since: Option<DateTime<FixedOffset>>,
    pub label_source: LabelSource,
    pub json: bool,
}

/// One interval as printed in the record stream.
#[derive(Debug, Serialize)]
struct IntervalRecord<'a> {
    id: u64,
    start: String,
    end: String,
    content: String,
    group: Option<&'a str>,
}

impl<'a> From<&'a ClosedInterval> for IntervalRecord<'a> {
    fn from(interval: &'a ClosedInterval) -> Self {
        Self {
            id: interval.id,
            start: format_instant(interval.start),
            end: format_instant(interval.end),
            content: interval.category.label(),
            group: interval.category.group(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TotalEntry<'a> {
    category: &'a str,
    duration_ms: i64,
}

#[derive(Debug, Serialize)]
struct DayReport<'a> {
    date: String,
    totals: Vec<TotalEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    intervals: Vec<IntervalRecord<'a>>,
    total_ms: i64,
    totals: Vec<TotalEntry<'a>>,
    days: Vec<DayReport<'a>>,
}

// ========== Formatting ==========

/// ISO 8601 with the event's own offset; fractional seconds only when present.
pub fn format_instant(t: DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Formats a duration as `H:MM:SS`, prefixed with `N day(s), ` past 24 hours
/// and suffixed with `.ffffff` when there are sub-second parts.
pub fn format_duration(d: TimeDelta) -> String {
    let days = d.num_days();
    let secs = d.num_seconds() - days * 86_400;
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    let mut out = match days {
        0 => String::new(),
        1 => "1 day, ".to_string(),
        n => format!("{n} days, "),
    };
    out.push_str(&format!("{hours}:{minutes:02}:{seconds:02}"));

    let micros = d.subsec_nanos() / 1000;
    if micros > 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}

fn write_interval<W: Write>(out: &mut W, interval: &ClosedInterval) -> Result<()> {
    let record = serde_json::to_string(&IntervalRecord::from(interval))?;
    writeln!(out, "{record}")?;
    writeln!(
        out,
        "{} {} {}",
        format_instant(interval.start),
        format_duration(interval.duration),
        interval.opened_as
    )?;
    Ok(())
}

fn write_table<W: Write>(out: &mut W, table: &TotalsTable) -> Result<()> {
    for (key, duration) in table.sorted() {
        writeln!(out, "{}  {key}", format_duration(duration))?;
    }
    Ok(())
}

/// Writes overall totals followed by one block per day.
pub fn write_totals<W: Write>(out: &mut W, totals: &Totals) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}  (total)", format_duration(totals.grand_total()))?;
    write_table(out, totals.overall())?;

    for (day, table) in totals.days() {
        writeln!(out)?;
        writeln!(out, "Totals for {day}")?;
        write_table(out, table)?;
    }
    Ok(())
}

fn table_entries(table: &TotalsTable) -> Vec<TotalEntry<'_>> {
    table
        .sorted()
        .into_iter()
        .map(|(category, d)| TotalEntry {
            category,
            duration_ms: d.num_milliseconds(),
        })
        .collect()
}

fn write_json<W: Write>(out: &mut W, intervals: &[ClosedInterval], totals: &Totals) -> Result<()> {
    let report = JsonReport {
        intervals: intervals.iter().map(IntervalRecord::from).collect(),
        total_ms: totals.grand_total().num_milliseconds(),
        totals: table_entries(totals.overall()),
        days: totals
            .days()
            .map(|(day, table)| DayReport {
                date: day.to_string(),
                totals: table_entries(table),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

// ========== Report Generation ==========

/// Runs the whole pipeline over `events` and writes the report to `out`.
pub fn run<W, I>(out: &mut W, events: I, classifier: &Classifier, options: ReportOptions) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = Result<Event, LogError>>,
{
    let mut totals = Totals::new();
    let mut builder = IntervalBuilder::new(classifier)
        .since(options.since)
        .label_source(options.label_source);
    let mut collected = Vec::new();

    for event in events {
        let event = event.context("failed to read activity log")?;
        let Some(interval) = builder.push(&event, &mut totals) else {
            continue;
        };
        if options.json {
            collected.push(interval);
        } else {
            write_interval(out, &interval)?;
        }
    }
    builder.finish();

    tracing::debug!(
        categories = totals.overall().len(),
        days = totals.days().count(),
        "report complete"
    );

    if options.json {
        write_json(out, &collected, &totals)
    } else {
        write_totals(out, &totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;
    use std::io::Cursor;

    use insta::assert_snapshot;
    use wt_core::EventReader;

    const LOG: &str = r#"{"time":"2017-02-06T10:00:00+02:00","activity":"title","class":"Vlc","title":"Song A - VLC media player"}
{"time":"2017-02-06T10:03:00+02:00","activity":"title","class":"Vlc","title":"Song B - VLC media player"}
{"time":"2017-02-06T10:07:00+02:00","activity":"unfocus","class":"Vlc","title":"Song B - VLC media player"}
{"time":"2017-02-06T23:50:00+02:00","activity":"focus","class":"Emacs","title":"[rust-mode] wt"}
{"time":"2017-02-07T00:20:00+02:00","activity":"unfocus","class":"Emacs","title":"[rust-mode] wt"}
"#;

    fn render(log: &str, options: ReportOptions) -> Result<String> {
        let classifier = Classifier::with_builtin_rules(BTreeMap::new());
        let mut out = Vec::new();
        run(&mut out, EventReader::new(Cursor::new(log)), &classifier, options)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::seconds(5)), "0:00:05");
        assert_eq!(format_duration(TimeDelta::minutes(63)), "1:03:00");
        assert_eq!(format_duration(TimeDelta::hours(25)), "1 day, 1:00:00");
        assert_eq!(format_duration(TimeDelta::hours(50)), "2 days, 2:00:00");
        assert_eq!(format_duration(TimeDelta::milliseconds(1500)), "0:00:01.500000");
    }

    #[test]
    fn test_format_instant_keeps_offset() {
        let t = wt_core::parse_time("2017-02-06T10:00:00+02:00").unwrap();
        assert_eq!(format_instant(t), "2017-02-06T10:00:00+02:00");
        let t = wt_core::parse_time("2017-02-06T10:00:00.5+00:00").unwrap();
        assert_eq!(format_instant(t), "2017-02-06T10:00:00.500+00:00");
    }

    #[test]
    fn test_text_report() {
        let output = render(LOG, ReportOptions::default()).unwrap();
        assert_snapshot!(output, @r#"
{"id":1,"start":"2017-02-06T10:00:00+02:00","end":"2017-02-06T10:03:00+02:00","content":"Vlc > Song B","group":"Vlc"}
2017-02-06T10:00:00+02:00 0:03:00 Vlc > Song A
{"id":2,"start":"2017-02-06T10:03:00+02:00","end":"2017-02-06T10:07:00+02:00","content":"Vlc > Song B","group":"Vlc"}
2017-02-06T10:03:00+02:00 0:04:00 Vlc > Song B
{"id":3,"start":"2017-02-06T23:50:00+02:00","end":"2017-02-07T00:20:00+02:00","content":"Emacs > wt > rust-mode","group":"Emacs"}
2017-02-06T23:50:00+02:00 0:30:00 Emacs > wt > rust-mode

0:37:00  (total)
0:30:00  Emacs
0:30:00  Emacs > wt
0:30:00  Emacs > wt > rust-mode
0:07:00  Vlc
0:07:00  Vlc > Song B

Totals for 2017-02-06
0:30:00  Emacs
0:30:00  Emacs > wt
0:30:00  Emacs > wt > rust-mode
0:07:00  Vlc
0:07:00  Vlc > Song B
"#);
    }

    #[test]
    fn test_text_report_opening_labels() {
        let options = ReportOptions {
            label_source: LabelSource::Opening,
            ..ReportOptions::default()
        };
        let output = render(LOG, options).unwrap();
        assert!(output.contains(r#""content":"Vlc > Song A""#));
        assert!(output.contains("0:03:00  Vlc > Song A\n"));
        assert!(output.contains("0:04:00  Vlc > Song B\n"));
    }

    #[test]
    fn test_since_filters_and_renumbers() {
        let options = ReportOptions {
            since: wt_core::parse_time("2017-02-06T12:00:00+02:00"),
            ..ReportOptions::default()
        };
        let output = render(LOG, options).unwrap();
        assert!(output.starts_with(r#"{"id":1,"start":"2017-02-06T23:50:00+02:00""#));
        assert!(!output.contains("Vlc"));
    }

    #[test]
    fn test_json_report() {
        let options = ReportOptions {
            json: true,
            ..ReportOptions::default()
        };
        let output = render(LOG, options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["intervals"].as_array().unwrap().len(), 3);
        assert_eq!(value["intervals"][2]["group"], "Emacs");
        assert_eq!(value["total_ms"], 37 * 60 * 1000);
        assert_eq!(value["totals"][0]["category"], "Emacs");
        assert_eq!(value["totals"][0]["duration_ms"], 30 * 60 * 1000);
        assert_eq!(value["days"][0]["date"], "2017-02-06");
    }

    #[test]
    fn test_empty_log() {
        let output = render("", ReportOptions::default()).unwrap();
        assert_eq!(output, "\n0:00:00  (total)\n");
    }

    #[test]
    fn test_uncategorized_interval_has_null_group() {
        let log = r#"{"time":"2017-02-06T10:00:00+02:00","activity":"focus","class":"Vlc","title":"Song A - VLC media player"}
{"time":"2017-02-06T10:01:00+02:00","activity":"unfocus"}
"#;
        let output = render(log, ReportOptions::default()).unwrap();
        assert!(output.starts_with(r#"{"id":1,"start":"2017-02-06T10:00:00+02:00","end":"2017-02-06T10:01:00+02:00","content":"","group":null}"#));
        assert!(output.contains("0:01:00  (total)\n"));
        assert!(!output.contains("Totals for"));
    }

    #[test]
    fn test_malformed_line_aborts_after_flushing_earlier_records() {
        let log = format!("{LOG}{{broken\n");
        let classifier = Classifier::with_builtin_rules(BTreeMap::new());
        let mut out = Vec::new();
        let err = run(
            &mut out,
            EventReader::new(Cursor::new(log)),
            &classifier,
            ReportOptions::default(),
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("line 6"));
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains(r#""id":3"#));
        assert!(!output.contains("(total)"));
    }
}
