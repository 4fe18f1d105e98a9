use crate::config::ChangelogConfig;
use crate::error::ChangelogError;
use crate::utils::{BLANK_BULLET_PATTERN, BULLET_PATTERN, is_blank, strip_terminator};

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// A named group of line items inside an entry, e.g. `  Features:`
///
/// The header and body are kept as raw lines (terminators included), so a
/// category that survives a rewrite is reproduced byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub(crate) name: String,
    pub(crate) header: String,
    pub(crate) body: Vec<String>,
}

impl Category {
    pub(crate) fn new(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: header.into(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text of every bullet in this category, blank bullets included as `""`
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        self.body
            .iter()
            .filter_map(|line| BULLET_PATTERN.captures(strip_terminator(line)))
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
            .collect()
    }

    /// A category is empty when every non-blank line of its body is a bare `-`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body
            .iter()
            .filter(|line| !is_blank(line))
            .all(|line| BLANK_BULLET_PATTERN.is_match(strip_terminator(line)))
    }
}

/// A line between the separator and the first category
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeaderLine {
    Version,
    Date,
    Text(String),
}

/// One versioned block of the changelog, starting at a separator line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub(crate) separator: String,
    pub(crate) version: String,
    pub(crate) date: Option<String>,
    /// Lines before the first category, in their original order
    pub(crate) header: Vec<HeaderLine>,
    pub(crate) categories: Vec<Category>,
    /// Blank lines closing the entry
    pub(crate) trailing: Vec<String>,
    /// Verbatim text of the entry as parsed; dropped once the entry is edited
    pub(crate) source: Option<String>,
}

impl ChangelogEntry {
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Pending means both the version and the date carry their sentinels
    #[must_use]
    pub fn is_pending(&self, config: &ChangelogConfig) -> bool {
        self.version == config.pending_version
            && self.date.as_deref() == Some(config.pending_date.as_str())
    }

    pub(crate) fn set_release(&mut self, version: &str, date: &str) {
        self.version = version.to_string();
        self.date = Some(date.to_string());
        self.source = None;
    }

    pub(crate) fn drop_empty_categories(&mut self) {
        let before = self.categories.len();
        self.categories.retain(|category| !category.is_empty());
        if self.categories.len() != before {
            self.source = None;
        }
    }
}

/// A parsed changelog file: free text before the first separator, then the
/// entries, most recent first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangelogDocument {
    pub(crate) preamble: Vec<String>,
    pub(crate) entries: Vec<ChangelogEntry>,
}

impl ChangelogDocument {
    #[must_use]
    pub fn entries(&self) -> &[ChangelogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&ChangelogEntry> {
        self.entries.first()
    }
}
