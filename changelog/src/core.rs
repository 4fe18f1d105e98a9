use crate::config::ChangelogConfig;
use crate::formatter::DocumentFormatter;
use crate::parser::Parser;
use crate::rewriter::{ChangelogRewriter, DefaultChangelogRewriter};
use crate::types::{ChangelogDocument, ChangelogEntry, Result};
use chrono::{Local, NaiveDate};

/// A changelog held in memory together with the configuration it was
/// parsed with. Persisting the rendered text is left to the caller.
#[derive(Debug, Clone)]
pub struct Changelog {
    document: ChangelogDocument,
    config: ChangelogConfig,
}

impl Changelog {
    /// Parses changelog text
    ///
    /// # Errors
    /// Returns error if an entry is malformed
    pub fn parse(content: &str, config: ChangelogConfig) -> Result<Self> {
        let document = Parser::new(config.clone()).parse(content)?;
        Ok(Self { document, config })
    }

    #[must_use]
    pub const fn document(&self) -> &ChangelogDocument {
        &self.document
    }

    #[must_use]
    pub const fn config(&self) -> &ChangelogConfig {
        &self.config
    }

    /// The topmost entry if it is still pending
    #[must_use]
    pub fn pending_entry(&self) -> Option<&ChangelogEntry> {
        self.document
            .first()
            .filter(|entry| entry.is_pending(&self.config))
    }

    /// Formats a release date with the configured date format
    #[must_use]
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.config.date_format).to_string()
    }

    /// Promotes the pending entry to `version`, dated `date`.
    /// On error the changelog is left as it was.
    ///
    /// # Errors
    /// Returns `ChangelogError::Format` if the pending entry is missing, duplicated or misplaced
    pub fn promote(&mut self, version: &str, date: &str) -> Result<()> {
        self.document = self.rewriter().promote_pending_entry(&self.document, version, date)?;
        Ok(())
    }

    /// Promotes the pending entry to `version`, dated today. Returns the date used.
    ///
    /// # Errors
    /// Returns `ChangelogError::Format` if the pending entry is missing, duplicated or misplaced
    pub fn release(&mut self, version: &str) -> Result<String> {
        let date = self.format_date(Local::now().date_naive());
        self.promote(version, &date)?;
        Ok(date)
    }

    /// Opens a new development cycle by prepending a blank pending entry
    pub fn start_dev_cycle(&mut self) {
        self.document = self.rewriter().insert_blank_pending_entry(&self.document);
    }

    #[must_use]
    pub fn render(&self) -> String {
        DocumentFormatter.format(&self.document)
    }

    fn rewriter(&self) -> DefaultChangelogRewriter {
        DefaultChangelogRewriter::new(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_changelog() -> String {
        format!(
            "{s}\nVersion: 0.00.00\nDate: 00. 00. 0000\n  Features:\n    - Added X\n  Changes:\n    - \n  Bugfixes:\n    - \n\n{s}\nVersion: 1.2.2\nDate: 01. 01. 2024\n  Bugfixes:\n    - Old fix\n",
            s = "-".repeat(99)
        )
    }

    #[test]
    fn release_cycle() {
        let mut changelog = Changelog::parse(&pending_changelog(), ChangelogConfig::default()).unwrap();
        assert!(changelog.pending_entry().is_some());

        changelog.promote("1.2.3", "05. 03. 2024").unwrap();
        assert!(changelog.pending_entry().is_none());

        changelog.start_dev_cycle();
        assert!(changelog.pending_entry().is_some());
        assert_eq!(changelog.document().len(), 3);

        let reparsed = Changelog::parse(&changelog.render(), ChangelogConfig::default()).unwrap();
        assert_eq!(reparsed.document().entries()[1].version(), "1.2.3");
    }

    #[test]
    fn failed_promotion_keeps_state() {
        let content = pending_changelog().replacen("0.00.00", "1.2.3", 1);
        let mut changelog = Changelog::parse(&content, ChangelogConfig::default()).unwrap();
        assert!(changelog.promote("1.2.4", "05. 03. 2024").is_err());
        assert_eq!(changelog.render(), content);
    }

    #[test]
    fn formats_dates_day_first() {
        let changelog = Changelog::parse("", ChangelogConfig::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(changelog.format_date(date), "05. 03. 2024");
    }
}
