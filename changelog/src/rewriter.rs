use crate::config::ChangelogConfig;
use crate::error::ChangelogError;
use crate::formatter::blank_pending_entry;
use crate::types::{ChangelogDocument, Result};
use crate::utils::terminator_of;

pub trait ChangelogRewriter {
    /// Turns the pending top entry into a release entry.
    ///
    /// # Errors
    /// Returns `ChangelogError::Format` unless exactly one pending entry exists
    /// and it is the first one
    fn promote_pending_entry(
        &self,
        document: &ChangelogDocument,
        release_version: &str,
        release_date: &str,
    ) -> Result<ChangelogDocument>;

    /// Prepends a blank pending entry. Performs no check for an existing one.
    fn insert_blank_pending_entry(&self, document: &ChangelogDocument) -> ChangelogDocument;
}

#[derive(Debug, Clone)]
pub struct DefaultChangelogRewriter {
    config: ChangelogConfig,
}

impl DefaultChangelogRewriter {
    #[must_use]
    pub const fn new(config: ChangelogConfig) -> Self {
        Self { config }
    }

    fn pending_positions(&self, document: &ChangelogDocument) -> Vec<usize> {
        document
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_pending(&self.config))
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl ChangelogRewriter for DefaultChangelogRewriter {
    fn promote_pending_entry(
        &self,
        document: &ChangelogDocument,
        release_version: &str,
        release_date: &str,
    ) -> Result<ChangelogDocument> {
        match self.pending_positions(document).as_slice() {
            [0] => {}
            [] => {
                return Err(ChangelogError::Format(format!(
                    "no pending entry (Version: {}, Date: {}) found",
                    self.config.pending_version, self.config.pending_date
                )));
            }
            [idx] => {
                return Err(ChangelogError::Format(format!(
                    "pending entry is entry #{} but must be the topmost one",
                    idx + 1
                )));
            }
            many => {
                return Err(ChangelogError::Format(format!(
                    "found {} pending entries, expected exactly one",
                    many.len()
                )));
            }
        }

        let mut promoted = document.clone();
        let entry = &mut promoted.entries[0];
        entry.set_release(release_version, release_date);
        entry.drop_empty_categories();
        Ok(promoted)
    }

    fn insert_blank_pending_entry(&self, document: &ChangelogDocument) -> ChangelogDocument {
        let eol = document
            .entries
            .first()
            .map_or("\n", |entry| terminator_of(&entry.separator));

        let mut updated = document.clone();
        updated
            .entries
            .insert(0, blank_pending_entry(&self.config, eol));
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::DocumentFormatter;
    use crate::parser::Parser;

    fn sep() -> String {
        "-".repeat(99)
    }

    fn parse(content: &str) -> ChangelogDocument {
        Parser::new(ChangelogConfig::default()).parse(content).unwrap()
    }

    fn rewriter() -> DefaultChangelogRewriter {
        DefaultChangelogRewriter::new(ChangelogConfig::default())
    }

    fn history() -> String {
        format!(
            "{}\nVersion: 1.2.2\nDate: 01. 01. 2024\n  Features:\n    - \n  Bugfixes:\n    - Old fix\n",
            sep()
        )
    }

    #[test]
    fn promotes_and_drops_empty_categories() {
        let pending = format!(
            "{}\nVersion: 0.00.00\nDate: 00. 00. 0000\n  Features:\n    - Added X\n  Changes:\n    - \n  Bugfixes:\n    - \n\n",
            sep()
        );
        let doc = parse(&format!("{pending}{}", history()));

        let promoted = rewriter()
            .promote_pending_entry(&doc, "1.2.3", "05. 03. 2024")
            .unwrap();

        let top = &promoted.entries()[0];
        assert_eq!(top.version(), "1.2.3");
        assert_eq!(top.date(), Some("05. 03. 2024"));
        let names: Vec<&str> = top.categories().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Features"]);
        assert_eq!(top.category("Features").unwrap().items(), vec!["Added X"]);

        let text = DocumentFormatter.format(&promoted);
        let expected = format!(
            "{}\nVersion: 1.2.3\nDate: 05. 03. 2024\n  Features:\n    - Added X\n\n{}",
            sep(),
            history()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn historical_empty_categories_are_untouched() {
        let pending = format!(
            "{}\nVersion: 0.00.00\nDate: 00. 00. 0000\n  Changes:\n    - Tweaked\n\n",
            sep()
        );
        let doc = parse(&format!("{pending}{}", history()));
        let promoted = rewriter()
            .promote_pending_entry(&doc, "1.2.3", "05. 03. 2024")
            .unwrap();

        assert_eq!(promoted.entries()[1], doc.entries()[1]);
        assert!(promoted.entries()[1].category("Features").unwrap().is_empty());
        assert!(DocumentFormatter.format(&promoted).ends_with(&history()));
    }

    #[test]
    fn keeps_blank_bullets_next_to_content() {
        let pending = format!(
            "{}\nVersion: 0.00.00\nDate: 00. 00. 0000\n  Features:\n    - \n    - Added X\n",
            sep()
        );
        let promoted = rewriter()
            .promote_pending_entry(&parse(&pending), "1.0.0", "01. 01. 2025")
            .unwrap();
        assert_eq!(
            promoted.entries()[0].category("Features").unwrap().items(),
            vec!["", "Added X"]
        );
    }

    #[test]
    fn unspaced_bullet_counts_as_content() {
        let pending = format!(
            "{}\nVersion: 0.00.00\nDate: 00. 00. 0000\n  Features:\n    -Added X\n  Changes:\n    - \n  Info:\n    Reworked the GUI\n",
            sep()
        );
        let promoted = rewriter()
            .promote_pending_entry(&parse(&pending), "1.2.3", "05. 03. 2024")
            .unwrap();

        let names: Vec<&str> = promoted.entries()[0].categories().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Features", "Info"]);
        let text = DocumentFormatter.format(&promoted);
        assert!(text.contains("  Features:\n    -Added X\n"));
        assert!(text.contains("  Info:\n    Reworked the GUI\n"));
        assert!(!text.contains("Changes:"));
    }

    #[test]
    fn pending_entry_needs_both_sentinels() {
        let dated = format!(
            "{}\nVersion: 0.00.00\nDate: 05. 03. 2024\n  Features:\n    - Added X\n",
            sep()
        );
        let err = rewriter()
            .promote_pending_entry(&parse(&dated), "1.2.3", "05. 03. 2024")
            .unwrap_err();
        assert!(matches!(err, ChangelogError::Format(_)));
    }

    #[test]
    fn rejects_missing_pending_entry() {
        let doc = parse(&history());
        let err = rewriter()
            .promote_pending_entry(&doc, "1.2.3", "05. 03. 2024")
            .unwrap_err();
        assert!(matches!(err, ChangelogError::Format(_)));
    }

    #[test]
    fn rejects_two_pending_entries_and_leaves_input_alone() {
        let doc = rewriter().insert_blank_pending_entry(&rewriter().insert_blank_pending_entry(&parse(&history())));
        let snapshot = doc.clone();

        let err = rewriter()
            .promote_pending_entry(&doc, "1.2.3", "05. 03. 2024")
            .unwrap_err();
        assert!(matches!(err, ChangelogError::Format(_)));
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn rejects_pending_entry_below_the_top() {
        let pending = format!("{}\nVersion: 0.00.00\nDate: 00. 00. 0000\n", sep());
        let doc = parse(&format!("{}{pending}", history()));
        let err = rewriter()
            .promote_pending_entry(&doc, "1.2.3", "05. 03. 2024")
            .unwrap_err();
        assert!(err.to_string().contains("topmost"));
    }

    #[test]
    fn promote_then_insert_grows_by_one() {
        let pending = format!(
            "{}\nVersion: 0.00.00\nDate: 00. 00. 0000\n  Features:\n    - Added X\n  Changes:\n    - \n\n",
            sep()
        );
        let doc = parse(&format!("{pending}{}", history()));
        let promoted = rewriter()
            .promote_pending_entry(&doc, "1.2.3", "05. 03. 2024")
            .unwrap();
        let next = rewriter().insert_blank_pending_entry(&promoted);

        assert_eq!(next.len(), doc.len() + 1);
        assert_eq!(next.entries()[0].version(), "0.00.00");
        assert_eq!(next.entries()[1], promoted.entries()[0]);
        assert_eq!(next.entries()[2], doc.entries()[1]);
    }

    #[test]
    fn insert_into_empty_document() {
        let next = rewriter().insert_blank_pending_entry(&ChangelogDocument::default());
        assert_eq!(next.len(), 1);
        let names: Vec<&str> = next.entries()[0].categories().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Features", "Changes", "Bugfixes"]);
    }
}
