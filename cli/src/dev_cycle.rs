use crate::error::{Result, ResultExt};
use crate::files::{read_text, write_atomic};
use crate::packaging::set_devmode;
use crate::progress::ProgressTracker;
use crate::project::Project;
use crate::ui;
use changelog::Changelog;
use std::path::Path;

/// Prepend a blank pending entry to the changelog on disk
pub fn insert_pending_entry(project: &Project) -> Result<()> {
    let path = project.changelog();
    let content = read_text(&path)?;
    let mut changelog = Changelog::parse(&content, project.config().changelog.to_config())
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    changelog.start_dev_cycle();
    write_atomic(&path, changelog.render().as_bytes())
}

/// Switch the development flag in `control.lua`. Returns whether the file changed.
pub fn toggle_devmode(project: &Project, enabled: bool) -> Result<bool> {
    let path = project.control_lua();
    if !path.exists() {
        return Ok(false);
    }

    let source = read_text(&path)?;
    match set_devmode(&source, &project.config().devmode_flag, enabled)? {
        Some(updated) if updated != source => {
            write_atomic(&path, updated.as_bytes())?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(unix)]
fn symlink_dir(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink_dir(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(original, link)
}

/// Link the project's `scenarios/` into the modfiles so the game can load them
pub fn link_scenarios(project: &Project) -> Result<bool> {
    let scenarios = project.scenarios_dir();
    let link = project.modfiles_dir().join("scenarios");
    if !scenarios.is_dir() || link.symlink_metadata().is_ok() {
        return Ok(false);
    }

    symlink_dir(&scenarios, &link)
        .with_context(|| format!("Failed to link {}", link.display()))?;
    Ok(true)
}

pub fn execute(project: &Project, assume_yes: bool, verbose: bool) -> Result<()> {
    if !ui::confirm(
        &format!("[{}] Sure to start a new dev cycle?", project.mod_name()),
        assume_yes,
    )? {
        return Ok(());
    }

    let mut progress = ProgressTracker::new("New Dev Cycle", verbose).with_steps(&[
        "Adding blank changelog entry",
        "Enabling devmode",
        "Linking scenarios",
    ]);

    progress.start_step();
    insert_pending_entry(project)?;
    progress.complete_step();

    progress.start_step();
    if toggle_devmode(project, true)? {
        progress.complete_step();
    } else {
        progress.skip_step(&format!("no '{} = false' found", project.config().devmode_flag));
    }

    progress.start_step();
    if link_scenarios(project)? {
        progress.complete_step();
    } else {
        progress.skip_step("no scenarios directory or link already present");
    }

    progress.complete();
    Ok(())
}
