// Re-export semver for users of this library
pub use semver::Version as SemverVersion;
use clap::ValueEnum;

mod error;
mod mod_info;
pub use error::{Result, ResultExt, VersionError};
pub use mod_info::ModInfo;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum VersionType {
    Major,
    Minor,
    #[default]
    Patch,
}

// Central structure for version management
pub struct Version;

impl Version {
    /// Parses a dotted numeric triplet.
    ///
    /// Unlike strict semver, zero-padded components such as `1.1.05` are
    /// accepted and normalised.
    ///
    /// # Errors
    /// Returns `VersionError::InvalidFormat` unless the input is `N.N.N`
    pub fn parse(version: &str) -> Result<SemverVersion> {
        let parts: Vec<&str> = version.trim().split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(VersionError::InvalidFormat(version.to_string()));
        };

        let component = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::InvalidFormat(version.to_string()));
            }
            part.parse::<u64>()
                .map_err(|_| VersionError::InvalidFormat(version.to_string()))
        };

        Ok(SemverVersion::new(
            component(*major)?,
            component(*minor)?,
            component(*patch)?,
        ))
    }

    /// Increment a version based on the version type
    #[must_use]
    pub fn increment(version: &SemverVersion, version_type: VersionType) -> SemverVersion {
        match version_type {
            VersionType::Major => SemverVersion::new(version.major + 1, 0, 0),
            VersionType::Minor => SemverVersion::new(version.major, version.minor + 1, 0),
            VersionType::Patch => {
                SemverVersion::new(version.major, version.minor, version.patch + 1)
            }
        }
    }

    /// The version the next release will carry, given the current `info.json`
    ///
    /// # Errors
    /// Returns error if the current version is malformed
    pub fn next_release(info: &ModInfo, version_type: VersionType) -> Result<SemverVersion> {
        let current = info
            .version()
            .map_err(|e| e.with_context("Failed to read current mod version"))?;
        Ok(Self::increment(&current, version_type))
    }
}
