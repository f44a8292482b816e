//! Core domain logic for window time accounting.
//!
//! This crate contains:
//! - Classification: mapping window focus events to hierarchical categories
//! - Interval building: turning the focus event stream into timed intervals
//! - Totals: rolling interval durations up into every category prefix, overall and per day
//! - Log reading: streaming the logger's line-oriented records

pub mod category;
pub mod classifier;
pub mod event;
pub mod interval;
pub mod log;
pub mod rules;
mod totals;

pub use category::Category;
pub use classifier::{AppRule, Classifier, Window, default_rule};
pub use event::{Activity, Event, parse_time};
pub use interval::{ClosedInterval, IntervalBuilder, LabelSource, OpenInterval, build_intervals};
pub use log::{EventReader, LogError};
pub use totals::{Totals, TotalsTable};
