use crate::config::ChangelogConfig;
use crate::error::ChangelogError;
use crate::types::{Category, ChangelogDocument, ChangelogEntry, HeaderLine, Result};
use crate::utils::{
    CATEGORY_HEADER_PATTERN, DATE_LINE_PATTERN, VERSION_LINE_PATTERN, is_blank, strip_terminator,
};

#[derive(Debug)]
struct ParserState<'a> {
    first_line: usize,
    separator: &'a str,
    version: Option<String>,
    date: Option<String>,
    header: Vec<HeaderLine>,
    categories: Vec<Category>,
}

impl<'a> ParserState<'a> {
    const fn new(first_line: usize, separator: &'a str) -> Self {
        Self {
            first_line,
            separator,
            version: None,
            date: None,
            header: Vec::new(),
            categories: Vec::new(),
        }
    }

    fn push_line(&mut self, raw: &str) {
        let line = strip_terminator(raw);

        if let Some(caps) = CATEGORY_HEADER_PATTERN.captures(line) {
            self.categories.push(Category::new(&caps[1], raw));
            return;
        }

        if let Some(category) = self.categories.last_mut() {
            category.body.push(raw.to_string());
            return;
        }

        if self.version.is_none() {
            if let Some(caps) = VERSION_LINE_PATTERN.captures(line) {
                self.version = Some(caps[1].to_string());
                self.header.push(HeaderLine::Version);
                return;
            }
        }
        if self.date.is_none() {
            if let Some(caps) = DATE_LINE_PATTERN.captures(line) {
                self.date = Some(caps[1].to_string());
                self.header.push(HeaderLine::Date);
                return;
            }
        }
        self.header.push(HeaderLine::Text(raw.to_string()));
    }

    fn finish(mut self, source: String) -> Result<ChangelogEntry> {
        let version = self.version.take().ok_or_else(|| {
            ChangelogError::InvalidFormat(
                self.first_line + 1,
                "entry has no 'Version:' line".to_string(),
            )
        })?;

        let trailing = match self.categories.last_mut() {
            Some(category) => {
                let keep = category
                    .body
                    .iter()
                    .rposition(|line| !is_blank(line))
                    .map_or(0, |idx| idx + 1);
                category.body.split_off(keep)
            }
            None => {
                let keep = self
                    .header
                    .iter()
                    .rposition(|line| !matches!(line, HeaderLine::Text(text) if is_blank(text)))
                    .map_or(0, |idx| idx + 1);
                self.header
                    .split_off(keep)
                    .into_iter()
                    .filter_map(|line| match line {
                        HeaderLine::Text(text) => Some(text),
                        _ => None,
                    })
                    .collect()
            }
        };

        Ok(ChangelogEntry {
            separator: self.separator.to_string(),
            version,
            date: self.date,
            header: self.header,
            categories: self.categories,
            trailing,
            source: Some(source),
        })
    }
}

/// Splits changelog text into its entries.
///
/// Every line meeting the configured separator run opens a new entry; text
/// before the first separator is kept as the document preamble.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ChangelogConfig,
}

impl Parser {
    #[must_use]
    pub const fn new(config: ChangelogConfig) -> Self {
        Self { config }
    }

    /// Parses `content` into a document.
    ///
    /// # Errors
    /// Returns `ChangelogError::InvalidFormat` when an entry lacks a version line
    pub fn parse(&self, content: &str) -> Result<ChangelogDocument> {
        let mut document = ChangelogDocument::default();
        let mut block: Vec<&str> = Vec::new();
        let mut block_start = 0;

        for (line_num, line) in content.split_inclusive('\n').enumerate() {
            if self.config.is_separator(line) {
                if !block.is_empty() {
                    document.entries.push(Self::parse_entry(&block, block_start)?);
                }
                block.clear();
                block_start = line_num;
                block.push(line);
            } else if block.is_empty() {
                document.preamble.push(line.to_string());
            } else {
                block.push(line);
            }
        }

        if !block.is_empty() {
            document.entries.push(Self::parse_entry(&block, block_start)?);
        }

        Ok(document)
    }

    fn parse_entry(block: &[&str], first_line: usize) -> Result<ChangelogEntry> {
        let (separator, rest) = block
            .split_first()
            .ok_or_else(|| ChangelogError::Format("empty entry".to_string()))?;

        let mut state = ParserState::new(first_line, separator);
        for line in rest {
            state.push_line(line);
        }
        state.finish(block.concat())
    }
}
