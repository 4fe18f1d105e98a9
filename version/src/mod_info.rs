use crate::Version;
use crate::error::{Result, ResultExt, VersionError};
use semver::Version as SemverVersion;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// The mod's `info.json`.
///
/// Only `version` is interpreted; every other key is carried through in its
/// original order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModInfo {
    fields: Map<String, Value>,
}

impl ModInfo {
    /// Parses `info.json` text
    ///
    /// # Errors
    /// Returns error if the text is not a JSON object with a string `version`
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;

        let Value::Object(fields) = value else {
            return Err(VersionError::NotAnObject);
        };
        if !fields.get("version").is_some_and(Value::is_string) {
            return Err(VersionError::VersionNotFound);
        }
        Ok(Self { fields })
    }

    /// Reads and parses `info.json` at `path`
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        fs::read_to_string(path)
            .map_err(VersionError::from)
            .and_then(|content| Self::from_json(&content))
            .with_context(|| format!("In {}", path.display()))
    }

    /// The version string exactly as written
    #[must_use]
    pub fn raw_version(&self) -> &str {
        self.fields
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// # Errors
    /// Returns error if the version is not a dotted numeric triplet
    pub fn version(&self) -> Result<SemverVersion> {
        Version::parse(self.raw_version())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn set_version(&mut self, version: &SemverVersion) {
        self.fields
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Serializes with four-space indentation and a trailing newline
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::with_capacity(256);
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        serde::Serialize::serialize(&self.fields, &mut serializer)?;
        buf.push(b'\n');
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
