use crate::config::ChangelogConfig;
use crate::types::{Category, ChangelogDocument, ChangelogEntry, HeaderLine};
use crate::utils::terminator_of;

/// Renders documents back to text.
///
/// Untouched entries are emitted from their verbatim source; edited or newly
/// built entries are laid out from their parts.
#[derive(Debug, Clone, Default)]
pub struct DocumentFormatter;

impl DocumentFormatter {
    #[must_use]
    pub fn format(&self, document: &ChangelogDocument) -> String {
        let mut out = String::with_capacity(4096);
        for line in &document.preamble {
            out.push_str(line);
        }
        for entry in &document.entries {
            self.format_entry_into(&mut out, entry);
        }
        out
    }

    #[must_use]
    pub fn format_entry(&self, entry: &ChangelogEntry) -> String {
        let mut out = String::with_capacity(512);
        self.format_entry_into(&mut out, entry);
        out
    }

    fn format_entry_into(&self, out: &mut String, entry: &ChangelogEntry) {
        if let Some(source) = &entry.source {
            out.push_str(source);
            return;
        }

        let eol = terminator_of(&entry.separator);
        out.push_str(&entry.separator);
        if !entry.separator.ends_with('\n') {
            out.push_str(eol);
        }
        let has_date_line = entry.header.contains(&HeaderLine::Date);
        for line in &entry.header {
            match line {
                HeaderLine::Version => {
                    push_field(out, "Version", &entry.version, eol);
                    if !has_date_line {
                        if let Some(date) = &entry.date {
                            push_field(out, "Date", date, eol);
                        }
                    }
                }
                HeaderLine::Date => {
                    if let Some(date) = &entry.date {
                        push_field(out, "Date", date, eol);
                    }
                }
                HeaderLine::Text(text) => out.push_str(text),
            }
        }
        for category in &entry.categories {
            out.push_str(&category.header);
            for line in &category.body {
                out.push_str(line);
            }
        }
        for line in &entry.trailing {
            out.push_str(line);
        }
    }
}

fn push_field(out: &mut String, name: &str, value: &str, eol: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str(eol);
}

/// Builds the blank pending entry opened at the start of every dev cycle
#[must_use]
pub fn blank_pending_entry(config: &ChangelogConfig, eol: &str) -> ChangelogEntry {
    let categories = config
        .default_categories
        .iter()
        .map(|name| Category {
            name: name.clone(),
            header: format!("  {name}:{eol}"),
            body: vec![format!("    - {eol}")],
        })
        .collect();

    ChangelogEntry {
        separator: format!("{}{eol}", config.separator_line()),
        version: config.pending_version.clone(),
        date: Some(config.pending_date.clone()),
        header: vec![HeaderLine::Version, HeaderLine::Date],
        categories,
        trailing: vec![eol.to_string()],
        source: None,
    }
}
