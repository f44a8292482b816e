//! Built-in application rules.
//!
//! Every rule returns a path starting with the application class (except
//! [`FixedLabel`], which names the real application) and falls back to
//! `[class]` when the title does not look the way the rule expects.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::category::Category;
use crate::classifier::{AppRule, Classifier, Window};

/// `<page title> [<website>][<path>] - <browser>`, as written by a URL-in-title extension.
static BROWSER_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*) \[(.*)\]\[(.*)\] - (.*)$").unwrap());

/// `owner[/repo][/...]`
static GITHUB_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^/]*)(?:/([^/]*))?").unwrap());

/// `[<mode>] <project>`
static EDITOR_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.*)\] (.*)$").unwrap());

/// Unread message counter some chat clients prepend, e.g. `[3]`.
static UNREAD_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[\d+\]").unwrap());

const YOUTUBE: &str = "https://www.youtube.com";
const YOUTUBE_SUFFIX: &str = " - YouTube";
const GITHUB: &str = "https://github.com";

/// Browser windows: split the title into website and path, with special
/// handling for YouTube videos and GitHub repositories.
///
/// Only applies to the main browser window (`role == "browser"`); pop-ups and
/// dev tools stay at `[class]`.
pub fn browser(class: &str, window: &Window<'_>) -> Category {
    let fallback = || Category::new([class]);
    if window.role != Some("browser") {
        return fallback();
    }
    let Some(caps) = window.title.and_then(|t| BROWSER_TITLE_RE.captures(t)) else {
        return fallback();
    };
    let page_title = &caps[1];
    let website = &caps[2];
    let path = &caps[3];

    if website == YOUTUBE && path == "watch" {
        if let Some(video) = page_title.strip_suffix(YOUTUBE_SUFFIX) {
            return Category::new([class, website, video]);
        }
    }

    if website == GITHUB {
        if let Some(gh) = GITHUB_PATH_RE.captures(path) {
            let owner = gh.get(1).map_or("", |m| m.as_str());
            return match gh.get(2).map(|m| m.as_str()).filter(|r| !r.is_empty()) {
                Some(repo) => Category::new([class, website, owner, repo]),
                None => Category::new([class, website, owner]),
            };
        }
    }

    Category::new([class, website, path])
}

/// Editor frames titled `[<mode>] <project>`; yields `[class, project, mode]`.
pub fn editor(class: &str, window: &Window<'_>) -> Category {
    window
        .title
        .and_then(|t| EDITOR_TITLE_RE.captures(t))
        .map_or_else(
            || Category::new([class]),
            |caps| Category::new([class, &caps[2], &caps[1]]),
        )
}

/// Keeps the X11 instance as the second label.
///
/// Used for hosts whose instance name identifies the real program (Wine)
/// or the window kind (Thunderbird's compose vs. main window).
pub fn with_instance(class: &str, window: &Window<'_>) -> Category {
    match window.instance {
        Some(instance) => Category::new([class, instance]),
        None => Category::new([class]),
    }
}

/// Titles of the form `<name><suffix>`; yields `[class, name]`.
#[derive(Debug, Clone)]
pub struct TitleSuffix {
    suffix: String,
}

impl TitleSuffix {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl AppRule for TitleSuffix {
    fn categorize(&self, class: &str, window: &Window<'_>) -> Category {
        window
            .title
            .and_then(|t| t.strip_suffix(self.suffix.as_str()))
            .map_or_else(|| Category::new([class]), |name| Category::new([class, name]))
    }
}

/// Chat windows titled `[<unread>]<contact><suffix>`; yields `[class, contact]`.
///
/// Contact names are folded through an alias table so that renamed or
/// nicknamed contacts accumulate under one label.
#[derive(Debug, Clone)]
pub struct ChatContact {
    suffix: String,
    aliases: BTreeMap<String, String>,
}

impl ChatContact {
    pub fn new(suffix: impl Into<String>, aliases: BTreeMap<String, String>) -> Self {
        Self {
            suffix: suffix.into(),
            aliases,
        }
    }

    fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }
}

impl AppRule for ChatContact {
    fn categorize(&self, class: &str, window: &Window<'_>) -> Category {
        let Some(rest) = window.title.and_then(|t| t.strip_suffix(self.suffix.as_str())) else {
            return Category::new([class]);
        };
        let name = UNREAD_COUNT_RE
            .find(rest)
            .map_or(rest, |m| &rest[m.end()..]);
        Category::new([class, self.canonical(name)])
    }
}

/// Ignores the event and always reports `label`.
///
/// For plugin hosts whose class says nothing about what is running inside.
#[derive(Debug, Clone, Copy)]
pub struct FixedLabel(pub &'static str);

impl AppRule for FixedLabel {
    fn categorize(&self, _class: &str, _window: &Window<'_>) -> Category {
        Category::new([self.0])
    }
}

impl Classifier {
    /// A classifier with every built-in application rule registered.
    ///
    /// `chat_aliases` maps contact display-name variants to the name they
    /// should be counted under.
    pub fn with_builtin_rules(chat_aliases: BTreeMap<String, String>) -> Self {
        let mut classifier = Self::new();
        classifier
            .register("Google-chrome", browser)
            .register("Chromium", browser)
            .register("Chromium-browser", browser)
            .register("Skype", ChatContact::new(" - Skype™", chat_aliases))
            .register("Emacs", editor)
            .register("Vlc", TitleSuffix::new(" - VLC media player"))
            .register("smplayer", TitleSuffix::new(" - SMPlayer"))
            .register("sun-applet-PluginMain", FixedLabel("Java applet"))
            .register("Thunderbird", with_instance)
            .register("Wine", with_instance);
        classifier
    }
}
