use crate::config::MigratorConfig;
use crate::error::{MigrationError, Result};
use crate::masterlist::Masterlist;
use once_cell::sync::Lazy;
use regex::Regex;

/// A generated registry line: `[<n>] = {version="<v>", ...},`
static ENTRY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s+\[(\d+)\]\s*=\s*\{\s*version\s*=\s*"([^"]*)".*\},?\s*$"#)
        .expect("Failed to compile registry entry regex")
});

/// Rebuilds the migrator's registry block from the masterlist.
///
/// The block is derived data: every run strips all existing entries and
/// re-emits one per masterlist version, so hand edits between runs are lost.
#[derive(Debug, Clone, Default)]
pub struct RegistryGenerator {
    config: MigratorConfig,
}

impl RegistryGenerator {
    #[must_use]
    pub const fn new(config: MigratorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &MigratorConfig {
        &self.config
    }

    /// Formats the registry line for the `index`-th (1-based) masterlist version
    #[must_use]
    pub fn format_entry(&self, index: usize, version: &str) -> String {
        format!(
            "{indent}[{index}] = {{version=\"{version}\", migration=require(\"{prefix}{module}\")}},",
            indent = self.config.indent,
            prefix = self.config.require_prefix,
            module = self.config.module_name(version),
        )
    }

    /// Regenerates the registry block in `source_lines`.
    ///
    /// Lines may carry their terminators; generated lines reuse the marker
    /// line's terminator (none if the marker has none). The input is never
    /// modified.
    ///
    /// # Errors
    /// Returns `MigrationError::MarkerNotFound` if no line matches the marker
    pub fn regenerate_registry_block<S: AsRef<str>>(
        &self,
        source_lines: &[S],
        masterlist: &Masterlist,
    ) -> Result<Vec<String>> {
        let kept: Vec<&str> = source_lines
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|line| !is_entry_line(line))
            .collect();

        let marker_idx = kept
            .iter()
            .position(|line| line.trim() == self.config.marker.trim())
            .ok_or_else(|| MigrationError::MarkerNotFound(self.config.marker.clone()))?;

        let marker = kept[marker_idx];
        let eol = if marker.ends_with("\r\n") {
            "\r\n"
        } else if marker.ends_with('\n') {
            "\n"
        } else {
            ""
        };

        let mut lines = Vec::with_capacity(kept.len() + masterlist.len());
        lines.extend(kept[..=marker_idx].iter().map(ToString::to_string));
        lines.extend(
            masterlist
                .versions()
                .iter()
                .enumerate()
                .map(|(idx, version)| format!("{}{eol}", self.format_entry(idx + 1, version))),
        );
        lines.extend(kept[marker_idx + 1..].iter().map(ToString::to_string));
        Ok(lines)
    }

    /// Regenerates the registry block inside a whole file's text
    ///
    /// # Errors
    /// Returns `MigrationError::MarkerNotFound` if no line matches the marker
    pub fn regenerate(&self, content: &str, masterlist: &Masterlist) -> Result<String> {
        let unterminated = !content.is_empty() && !content.ends_with('\n');
        let padded = if unterminated {
            format!("{content}\n")
        } else {
            content.to_string()
        };

        let lines: Vec<&str> = padded.split_inclusive('\n').collect();
        let mut output = self.regenerate_registry_block(&lines, masterlist)?.concat();
        if unterminated {
            output.pop();
        }
        Ok(output)
    }

    /// Reads back the `(index, version)` pairs currently present in the file
    #[must_use]
    pub fn registered_entries(&self, content: &str) -> Vec<(usize, String)> {
        content
            .lines()
            .filter_map(|line| ENTRY_PATTERN.captures(line))
            .filter_map(|caps| Some((caps[1].parse().ok()?, caps[2].to_string())))
            .collect()
    }
}

fn is_entry_line(line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    ENTRY_PATTERN.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIGRATOR: &str = "local migrator = {}\n\nlocal migration_masterlist = {\n    [1] = {version=\"1.0.1\", migration=require(\"data.migrations.migration_1_0_1\")},\n    [7] = {version=\"0.9.9\", migration=require(\"data.migrations.migration_0_9_9\")},\n}\n\nreturn migrator\n";

    fn list(versions: &[&str]) -> Masterlist {
        Masterlist::new(versions.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn regenerates_contiguous_entries() {
        let generator = RegistryGenerator::default();
        let output = generator
            .regenerate(MIGRATOR, &list(&["1.0.1", "1.0.2", "1.0.3"]))
            .unwrap();

        let expected = "local migrator = {}\n\nlocal migration_masterlist = {\n    [1] = {version=\"1.0.1\", migration=require(\"data.migrations.migration_1_0_1\")},\n    [2] = {version=\"1.0.2\", migration=require(\"data.migrations.migration_1_0_2\")},\n    [3] = {version=\"1.0.3\", migration=require(\"data.migrations.migration_1_0_3\")},\n}\n\nreturn migrator\n";
        assert_eq!(output, expected);
        assert_eq!(
            generator.registered_entries(&output),
            vec![
                (1, "1.0.1".to_string()),
                (2, "1.0.2".to_string()),
                (3, "1.0.3".to_string())
            ]
        );
    }

    #[test]
    fn regeneration_is_idempotent() {
        let generator = RegistryGenerator::default();
        let masterlist = list(&["1.0.1", "1.0.2"]);
        let once = generator.regenerate(MIGRATOR, &masterlist).unwrap();
        let twice = generator.regenerate(&once, &masterlist).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_masterlist_leaves_bare_block() {
        let output = RegistryGenerator::default()
            .regenerate(MIGRATOR, &Masterlist::default())
            .unwrap();
        assert!(output.contains("local migration_masterlist = {\n}\n"));
    }

    #[test]
    fn missing_marker_fails() {
        let err = RegistryGenerator::default()
            .regenerate("return {}\n", &list(&["1.0.1"]))
            .unwrap_err();
        assert!(matches!(err, MigrationError::MarkerNotFound(_)));
    }

    #[test]
    fn works_on_unterminated_lines() {
        let lines = vec!["local migration_masterlist = {", "}"];
        let out = RegistryGenerator::default()
            .regenerate_registry_block(&lines, &list(&["2.0.0"]))
            .unwrap();
        assert_eq!(
            out,
            vec![
                "local migration_masterlist = {".to_string(),
                "    [1] = {version=\"2.0.0\", migration=require(\"data.migrations.migration_2_0_0\")},".to_string(),
                "}".to_string(),
            ]
        );
    }

    #[test]
    fn keeps_missing_final_newline() {
        let content = "local migration_masterlist = {\n}";
        let out = RegistryGenerator::default()
            .regenerate(content, &list(&["2.0.0"]))
            .unwrap();
        assert!(out.ends_with("},\n}"));
    }

    #[test]
    fn only_indented_entries_are_replaced() {
        let content = "local migration_masterlist = {\n[9] = {version=\"0.1.0\"},\n    [1] = {version=\"1.0.1\"},\n}\n";
        let out = RegistryGenerator::default()
            .regenerate(content, &list(&["2.0.0"]))
            .unwrap();

        assert_eq!(
            out,
            "local migration_masterlist = {\n    [1] = {version=\"2.0.0\", migration=require(\"data.migrations.migration_2_0_0\")},\n[9] = {version=\"0.1.0\"},\n}\n"
        );
    }
}
