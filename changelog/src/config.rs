/// Configuration options for changelog layout and the release sentinels
#[derive(Debug, Clone)]
pub struct ChangelogConfig {
    /// Character that separator lines are made of
    pub separator_char: char,
    /// Minimum run of `separator_char` for a line to count as an entry boundary
    pub separator_width: usize,
    /// `chrono` format used for release dates
    pub date_format: String,
    pub pending_version: String,
    pub pending_date: String,
    /// Categories of a freshly inserted pending entry, in order
    pub default_categories: Vec<String>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            separator_char: '-',
            separator_width: 99,
            date_format: "%d. %m. %Y".to_string(),
            pending_version: "0.00.00".to_string(),
            pending_date: "00. 00. 0000".to_string(),
            default_categories: vec![
                "Features".to_string(),
                "Changes".to_string(),
                "Bugfixes".to_string(),
            ],
        }
    }
}

impl ChangelogConfig {
    /// A full-width separator line, without line terminator
    #[must_use]
    pub fn separator_line(&self) -> String {
        std::iter::repeat_n(self.separator_char, self.separator_width).collect()
    }

    /// Whether `line` is an entry boundary
    #[must_use]
    pub fn is_separator(&self, line: &str) -> bool {
        let line = line.trim_end();
        line.chars().count() >= self.separator_width
            && line.chars().all(|c| c == self.separator_char)
    }
}
