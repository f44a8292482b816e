//! Window focus events as written by the activity logger.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::classifier::Window;

/// What happened to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    /// A window gained focus.
    Focus,
    /// The focused window lost focus.
    Unfocus,
    /// The focused window changed its title.
    Title,
    /// Any other activity string the logger may write. Ignored by interval building.
    #[serde(other)]
    Other,
}

impl Activity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Unfocus => "unfocus",
            Self::Title => "title",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// When the event occurred, in the logger's local offset.
    pub time: DateTime<FixedOffset>,
    pub activity: Activity,
    /// X11 `WM_CLASS` class name.
    pub class: Option<String>,
    /// X11 `WM_CLASS` instance name.
    pub instance: Option<String>,
    /// X11 `WM_WINDOW_ROLE`.
    pub role: Option<String>,
    pub title: Option<String>,
}

impl Event {
    /// Borrowed view of the fields the classifier looks at.
    pub fn window(&self) -> Window<'_> {
        Window {
            class: self.class.as_deref(),
            instance: self.instance.as_deref(),
            role: self.role.as_deref(),
            title: self.title.as_deref(),
        }
    }
}

/// A log line as it appears on disk, before the timestamp is parsed.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEvent {
    pub time: String,
    pub activity: Activity,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub instance: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Timestamp layouts accepted after RFC 3339. `%z` takes both `+0200` and `+02:00`.
const FALLBACK_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parses a logger timestamp into an instant that keeps its UTC offset.
///
/// Timestamps without an offset are rejected: the calendar day used for
/// per-day totals depends on it.
pub fn parse_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
}
