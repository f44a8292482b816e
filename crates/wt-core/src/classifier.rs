//! Category classification dispatched by application class.
//!
//! Each application that needs special handling registers an [`AppRule`]
//! under its exact X11 class name. Events whose class has no rule fall
//! through to the default rule, which picks the first usable identifying
//! field. Adding a rule never touches dispatch or any other rule.

use std::collections::HashMap;
use std::fmt;

use crate::category::Category;

/// The classifier's view of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window<'a> {
    pub class: Option<&'a str>,
    pub instance: Option<&'a str>,
    pub role: Option<&'a str>,
    pub title: Option<&'a str>,
}

/// A per-application classification rule.
///
/// `class` is the registry key the event matched, so rules may use it as
/// the first label without unwrapping `window.class`. Rules must be pure
/// and must degrade to a shorter path rather than fail when a title does
/// not have the expected shape.
pub trait AppRule: Send + Sync {
    fn categorize(&self, class: &str, window: &Window<'_>) -> Category;
}

impl<F> AppRule for F
where
    F: Fn(&str, &Window<'_>) -> Category + Send + Sync,
{
    fn categorize(&self, class: &str, window: &Window<'_>) -> Category {
        self(class, window)
    }
}

/// Rule used when no application rule is registered for the class.
///
/// Returns the first present, non-empty field among class, instance, role
/// and title, or the empty path when there is none.
pub fn default_rule(window: &Window<'_>) -> Category {
    [window.class, window.instance, window.role, window.title]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map_or_else(Category::empty, |s| Category::new([s]))
}

/// Registry of application rules keyed by class name.
#[derive(Default)]
pub struct Classifier {
    rules: HashMap<String, Box<dyn AppRule>>,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<_> = self.rules.keys().collect();
        classes.sort();
        f.debug_struct("Classifier")
            .field("classes", &classes)
            .finish()
    }
}

impl Classifier {
    /// A classifier with no application rules; everything uses the default rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rule` for events whose class is exactly `class`.
    ///
    /// A later registration for the same class replaces the earlier one.
    pub fn register(&mut self, class: impl Into<String>, rule: impl AppRule + 'static) -> &mut Self {
        self.rules.insert(class.into(), Box::new(rule));
        self
    }

    /// Registers a closure as the rule for `class`.
    pub fn register_fn<F>(&mut self, class: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(&str, &Window<'_>) -> Category + Send + Sync + 'static,
    {
        self.register(class, rule)
    }

    /// Whether an application rule exists for `class`.
    pub fn handles(&self, class: &str) -> bool {
        self.rules.contains_key(class)
    }

    pub fn classify(&self, window: &Window<'_>) -> Category {
        match window.class.and_then(|c| self.rules.get(c).map(|rule| (c, rule))) {
            Some((class, rule)) => rule.categorize(class, window),
            None => default_rule(window),
        }
    }
}
