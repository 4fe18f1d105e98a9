use crate::error::{MigrationError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*$").expect("Failed to compile version regex"));

/// Ordered record of every migration version ever introduced, oldest first.
///
/// Transforms return a new masterlist and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Masterlist(Vec<String>);

impl Masterlist {
    #[must_use]
    pub const fn new(versions: Vec<String>) -> Self {
        Self(versions)
    }

    /// Parses the JSON array stored in `masterlist.json`
    ///
    /// # Errors
    /// Returns `MigrationError::ParseError` for anything but an array of strings
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serializes with four-space indentation and a trailing newline
    ///
    /// # Errors
    /// Returns `MigrationError::ParseError` if serialization fails
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::with_capacity(32 * self.0.len() + 4);
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, version: &str) -> bool {
        self.0.iter().any(|v| v == version)
    }

    /// Appends `new_version`. Does not sort; callers register in increasing order.
    ///
    /// # Errors
    /// Returns `MigrationError::DuplicateVersion` if the version is already listed,
    /// `MigrationError::InvalidVersion` if it is not a dotted number
    pub fn register_migration(&self, new_version: &str) -> Result<Self> {
        validate_version(new_version)?;
        if self.contains(new_version) {
            return Err(MigrationError::DuplicateVersion(new_version.to_string()));
        }
        let mut versions = self.0.clone();
        versions.push(new_version.to_string());
        Ok(Self(versions))
    }

    /// Replaces the last version with `new_version`; unchanged if it already matches.
    ///
    /// # Errors
    /// Returns `MigrationError::EmptyMasterlist` when there is nothing to retarget,
    /// `MigrationError::DuplicateVersion` if `new_version` is listed at an earlier position
    pub fn retarget_last_migration(&self, new_version: &str) -> Result<Self> {
        validate_version(new_version)?;
        let Some((last, earlier)) = self.0.split_last() else {
            return Err(MigrationError::EmptyMasterlist);
        };
        if last == new_version {
            return Ok(self.clone());
        }
        if earlier.iter().any(|v| v == new_version) {
            return Err(MigrationError::DuplicateVersion(new_version.to_string()));
        }
        let mut versions = self.0.clone();
        if let Some(slot) = versions.last_mut() {
            *slot = new_version.to_string();
        }
        Ok(Self(versions))
    }
}

fn validate_version(version: &str) -> Result<()> {
    if VERSION_PATTERN.is_match(version) {
        Ok(())
    } else {
        Err(MigrationError::InvalidVersion(version.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(versions: &[&str]) -> Masterlist {
        Masterlist::new(versions.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn register_appends_in_order() {
        let updated = list(&["1.0.1", "1.0.2"]).register_migration("1.0.3").unwrap();
        assert_eq!(updated, list(&["1.0.1", "1.0.2", "1.0.3"]));
    }

    #[test]
    fn register_rejects_duplicates() {
        let err = list(&["1.0.1", "1.0.2"]).register_migration("1.0.1").unwrap_err();
        assert!(matches!(err, MigrationError::DuplicateVersion(v) if v == "1.0.1"));
    }

    #[test]
    fn register_rejects_garbage() {
        let err = list(&[]).register_migration("1.0.x").unwrap_err();
        assert!(matches!(err, MigrationError::InvalidVersion(_)));
    }

    #[test]
    fn retarget_replaces_last() {
        let updated = list(&["1.0.1", "1.0.2"]).retarget_last_migration("1.0.4").unwrap();
        assert_eq!(updated, list(&["1.0.1", "1.0.4"]));
    }

    #[test]
    fn retarget_to_current_value_is_noop() {
        let original = list(&["1.0.1", "1.0.2"]);
        assert_eq!(original.retarget_last_migration("1.0.2").unwrap(), original);
    }

    #[test]
    fn retarget_empty_masterlist_fails() {
        assert!(matches!(
            list(&[]).retarget_last_migration("1.0.0"),
            Err(MigrationError::EmptyMasterlist)
        ));
    }

    #[test]
    fn json_uses_four_space_indent() {
        let json = list(&["1.0.1", "1.0.2"]).to_json().unwrap();
        assert_eq!(json, "[\n    \"1.0.1\",\n    \"1.0.2\"\n]\n");
        assert_eq!(Masterlist::from_json(&json).unwrap(), list(&["1.0.1", "1.0.2"]));
    }

    #[test]
    fn rejects_non_string_json() {
        assert!(matches!(
            Masterlist::from_json("[1, 2]"),
            Err(MigrationError::ParseError(_))
        ));
    }
}
