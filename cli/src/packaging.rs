use crate::error::{CliError, Result};
use crate::files::{read_text, write_atomic};
use crate::project::Project;
use glob::Pattern;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

static COPYRIGHT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Copyright \(c\) [0-9]{4}").expect("Invalid copyright regex"));

/// Set the year of every `Copyright (c) YYYY` notice
pub fn update_license_year(text: &str, year: i32) -> String {
    COPYRIGHT_PATTERN
        .replace_all(text, format!("Copyright (c) {}", year).as_str())
        .into_owned()
}

/// Rewrite `<flag> = true|false` assignments to `enabled`.
/// Returns `None` when no assignment of the flag exists.
pub fn set_devmode(source: &str, flag: &str, enabled: bool) -> Result<Option<String>> {
    let pattern = Regex::new(&format!(r"\b{}(\s*=\s*)(?:true|false)\b", regex::escape(flag)))?;
    if !pattern.is_match(source) {
        return Ok(None);
    }

    let replacement = format!("{}${{1}}{}", flag, enabled);
    Ok(Some(pattern.replace_all(source, replacement.as_str()).into_owned()))
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| Pattern::new(p).map_err(CliError::from))
        .collect()
}

/// Copy `source` into `target`, skipping any file or directory whose name
/// matches one of `excludes`
pub fn copy_filtered(source: &Path, target: &Path, excludes: &[String]) -> Result<usize> {
    let excludes = compile_excludes(excludes)?;
    let is_excluded = |name: &str| excludes.iter().any(|p| p.matches(name));

    let mut copied = 0;
    let walker = WalkDir::new(source)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(&entry.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| CliError::Other(format!("Unexpected path {}: {}", entry.path().display(), e)))?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            fs::copy(entry.path(), &destination).map_err(|e| {
                CliError::Io(e).with_context(format!("Failed to copy {}", entry.path().display()))
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Lay out `<root>/<mod>_<version>/` with the files that go into the archive.
/// Development mode is switched off in the staged `control.lua` only.
pub fn stage_release(project: &Project, release_name: &str) -> Result<PathBuf> {
    let staging = project.root().join(release_name);
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    copy_filtered(&project.modfiles_dir(), &staging, &project.config().exclude)?;

    let control = staging.join("control.lua");
    if control.exists() {
        let source = read_text(&control)?;
        if let Some(release_source) = set_devmode(&source, &project.config().devmode_flag, false)? {
            write_atomic(&control, release_source.as_bytes())?;
        }
    }

    let license = project.license();
    if license.exists() {
        fs::copy(&license, staging.join("LICENSE.md"))?;
    }
    Ok(staging)
}

/// Copy `LICENSE.md` and each locale's `config.cfg` from the foreign locale
/// checkout into the staged `locale/` directory. Returns the locale names.
pub fn copy_locale_configs(locale_dir: &Path, staging: &Path) -> Result<Vec<String>> {
    let release_locale = staging.join("locale");
    fs::create_dir_all(&release_locale)?;

    let license = locale_dir.join("LICENSE.md");
    if license.exists() {
        fs::copy(&license, release_locale.join("LICENSE.md"))?;
    }

    let mut locales = Vec::new();
    for entry in fs::read_dir(locale_dir)? {
        let entry = entry?;
        let config = entry.path().join("config.cfg");
        if !entry.file_type()?.is_dir() || !config.exists() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let destination = release_locale.join(&name);
        fs::create_dir_all(&destination)?;
        fs::copy(&config, destination.join("config.cfg"))?;
        locales.push(name);
    }
    locales.sort();
    Ok(locales)
}

/// Zip the staged directory into `releases/<name>.zip` and remove the staging copy
pub fn create_archive(project: &Project, staging: &Path, release_name: &str) -> Result<PathBuf> {
    let releases = project.releases_dir();
    fs::create_dir_all(&releases)?;

    let archive = releases.join(format!("{}.zip", release_name));
    if archive.exists() {
        fs::remove_file(&archive)?;
    }

    let output = Command::new("zip")
        .current_dir(project.root())
        .arg("-r")
        .arg("-q")
        .arg(&archive)
        .arg(release_name)
        .output()
        .map_err(|e| CliError::Io(e).with_context("Failed to run zip"))?;

    if !output.status.success() {
        return Err(CliError::Other(format!(
            "zip failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    fs::remove_dir_all(staging)?;
    Ok(archive)
}
