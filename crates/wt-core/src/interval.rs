//! Interval building.
//!
//! A single left-to-right pass over focus events. At most one interval is
//! open at any time; it is closed by an `unfocus` or by a `title` event whose
//! category differs from the open one.
//!
//! # Quirks kept from the logger's established reports
//!
//! - By default a closed interval is labelled with the category of the
//!   event that closed it, not the category it was opened with. The opening
//!   category is kept on the record as [`ClosedInterval::opened_as`], and
//!   [`LabelSource::Opening`] switches labelling and totals over to it.
//! - A `focus` event replaces any open interval without closing it.
//! - An interval still open at end of log is never emitted; see
//!   [`IntervalBuilder::finish`].

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::classifier::Classifier;
use crate::event::{Activity, Event};
use crate::totals::Totals;

/// Which category a closed interval is reported and counted under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSource {
    /// The category of the `title`/`unfocus` event that closed the interval.
    #[default]
    Closing,
    /// The category the interval was opened with.
    Opening,
}

/// The focused window currently being timed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenInterval {
    pub start: DateTime<FixedOffset>,
    pub category: Category,
}

/// An emitted interval. Duration is always strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedInterval {
    /// 1-based, gapless in emission order.
    pub id: u64,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// Category the interval is reported and counted under.
    pub category: Category,
    /// Category the interval was opened with.
    pub opened_as: Category,
    #[serde(skip)]
    pub duration: TimeDelta,
}

/// Turns an ordered event stream into closed intervals and feeds [`Totals`].
#[derive(Debug)]
pub struct IntervalBuilder<'c> {
    classifier: &'c Classifier,
    current: Option<OpenInterval>,
    next_id: u64,
    since: Option<DateTime<FixedOffset>>,
    label_source: LabelSource,
}

impl<'c> IntervalBuilder<'c> {
    pub const fn new(classifier: &'c Classifier) -> Self {
        Self {
            classifier,
            current: None,
            next_id: 1,
            since: None,
            label_source: LabelSource::Closing,
        }
    }

    /// Skip intervals that start before `since`.
    ///
    /// Skipped intervals are neither emitted nor counted and consume no id;
    /// the event stream is still followed so state stays correct.
    #[must_use]
    pub fn since(mut self, since: Option<DateTime<FixedOffset>>) -> Self {
        self.since = since;
        self
    }

    #[must_use]
    pub fn label_source(mut self, label_source: LabelSource) -> Self {
        self.label_source = label_source;
        self
    }

    /// The interval currently open, if any.
    pub const fn current(&self) -> Option<&OpenInterval> {
        self.current.as_ref()
    }

    /// Processes one event, returning the interval it closed, if any.
    pub fn push(&mut self, event: &Event, totals: &mut Totals) -> Option<ClosedInterval> {
        let category = self.classifier.classify(&event.window());
        tracing::trace!(time = %event.time, activity = %event.activity, %category, "classified");

        match event.activity {
            Activity::Unfocus => {
                let closed = self.close(event.time, &category, totals);
                self.current = None;
                closed
            }
            Activity::Title => {
                if self
                    .current
                    .as_ref()
                    .is_some_and(|open| open.category == category)
                {
                    return None;
                }
                let closed = self.close(event.time, &category, totals);
                self.current = Some(OpenInterval {
                    start: event.time,
                    category,
                });
                closed
            }
            Activity::Focus => {
                if let Some(dropped) = &self.current {
                    tracing::debug!(
                        start = %dropped.start,
                        category = %dropped.category,
                        "focus without unfocus, discarding open interval"
                    );
                }
                self.current = Some(OpenInterval {
                    start: event.time,
                    category,
                });
                None
            }
            Activity::Other => {
                tracing::debug!(time = %event.time, "ignoring unknown activity");
                None
            }
        }
    }

    /// Ends the pass, returning the interval left open. It is not emitted or counted.
    pub fn finish(self) -> Option<OpenInterval> {
        if let Some(open) = &self.current {
            tracing::debug!(
                start = %open.start,
                category = %open.category,
                "log ended with an open interval"
            );
        }
        self.current
    }

    fn close(
        &mut self,
        end: DateTime<FixedOffset>,
        category: &Category,
        totals: &mut Totals,
    ) -> Option<ClosedInterval> {
        let open = self.current.as_ref()?;
        let duration = end - open.start;
        if duration <= TimeDelta::zero() {
            tracing::debug!(start = %open.start, "dropping zero-length interval");
            return None;
        }
        if self.since.is_some_and(|since| open.start < since) {
            tracing::debug!(start = %open.start, "interval starts before cutoff, skipping");
            return None;
        }

        let label = match self.label_source {
            LabelSource::Closing => category,
            LabelSource::Opening => &open.category,
        };
        totals.add(label, open.start.date_naive(), duration);
        let interval = ClosedInterval {
            id: self.next_id,
            start: open.start,
            end,
            category: label.clone(),
            opened_as: open.category.clone(),
            duration,
        };
        self.next_id += 1;
        Some(interval)
    }
}

/// Runs a whole event sequence, collecting every emitted interval.
pub fn build_intervals<'e, I>(
    classifier: &Classifier,
    events: I,
    totals: &mut Totals,
) -> Vec<ClosedInterval>
where
    I: IntoIterator<Item = &'e Event>,
{
    let mut builder = IntervalBuilder::new(classifier);
    let intervals = events
        .into_iter()
        .filter_map(|event| builder.push(event, totals))
        .collect();
    builder.finish();
    intervals
}
