//! Hierarchical category paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator used when a path or one of its prefixes is rendered as a key.
pub const SEPARATOR: &str = " > ";

/// An ordered list of labels, most general first.
///
/// `["Google-chrome", "https://github.com", "octocat"]` renders as
/// `Google-chrome > https://github.com > octocat`. Two paths are equal only
/// when every label matches, and that equality is what splits intervals.
///
/// The default rule yields an empty path when an event carries no usable
/// field at all; such a path has a label of `""`, no group and no prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(Vec<String>);

impl Category {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// The empty, uncategorized path.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// First label; used to group intervals by application.
    pub fn group(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The full path joined with [`SEPARATOR`].
    pub fn label(&self) -> String {
        self.0.join(SEPARATOR)
    }

    /// Every non-empty prefix rendered as a key, shortest first.
    ///
    /// A path of length `n` yields exactly `n` keys.
    pub fn prefixes(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.0.len()).map(|i| self.0[..i].join(SEPARATOR))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl<S: Into<String>> FromIterator<S> for Category {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_joins_with_separator() {
        let c = Category::new(["Vlc", "Song A"]);
        assert_eq!(c.label(), "Vlc > Song A");
        assert_eq!(c.to_string(), "Vlc > Song A");
        assert_eq!(c.group(), Some("Vlc"));
    }

    #[test]
    fn prefixes_cover_every_depth() {
        let c = Category::new(["Google-chrome", "https://github.com", "octocat", "hello-world"]);
        let prefixes: Vec<_> = c.prefixes().collect();
        assert_eq!(
            prefixes,
            vec![
                "Google-chrome",
                "Google-chrome > https://github.com",
                "Google-chrome > https://github.com > octocat",
                "Google-chrome > https://github.com > octocat > hello-world",
            ]
        );
    }

    #[test]
    fn empty_path_has_no_prefixes_or_group() {
        let c = Category::empty();
        assert!(c.is_empty());
        assert_eq!(c.prefixes().count(), 0);
        assert_eq!(c.group(), None);
        assert_eq!(c.label(), "");
    }

    #[test]
    fn equality_is_whole_path() {
        assert_ne!(Category::new(["Emacs", "a"]), Category::new(["Emacs"]));
        assert_eq!(Category::new(["Emacs", "a"]), ["Emacs", "a"].into_iter().collect());
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&Category::new(["Wine", "steam.exe"])).unwrap();
        assert_eq!(json, r#"["Wine","steam.exe"]"#);
    }
}
