use crate::error::{CliError, Result, ResultExt};
use crate::files::read_text;
use crate::progress::ProgressTracker;
use crate::project::Project;
use crate::ui;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Pixels kept around each scene's frame when cropping
pub const CROP_MARGIN: i64 = 15;

const DONE_SENTINEL: &str = "screenshotter_done";

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FrameCorners {
    pub top_left: Point,
    pub bottom_right: Point,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    frame_corners: BTreeMap<String, FrameCorners>,
}

/// Crop rectangle `(x, y, width, height)` for a frame plus margin, clamped
/// to an image of `width` x `height`. `None` if nothing of it is visible.
pub fn crop_bounds(corners: &FrameCorners, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let clamp = |value: f64, max: u32| (value.round() as i64).clamp(0, i64::from(max));

    let left = clamp(corners.top_left.x - CROP_MARGIN as f64, width);
    let top = clamp(corners.top_left.y - CROP_MARGIN as f64, height);
    let right = clamp(corners.bottom_right.x + CROP_MARGIN as f64, width);
    let bottom = clamp(corners.bottom_right.y + CROP_MARGIN as f64, height);

    if right <= left || bottom <= top {
        return None;
    }
    Some((
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

/// Crop every scene listed in `metadata.json` from `script_output` into
/// `screenshots`. Returns the saved files sorted by name.
pub fn crop_scenes(script_output: &Path, screenshots: &Path) -> Result<Vec<PathBuf>> {
    let metadata_path = script_output.join("metadata.json");
    let metadata: Metadata = serde_json::from_str(&read_text(&metadata_path)?)
        .with_context(|| format!("Failed to parse {}", metadata_path.display()))?;

    let mut saved = Vec::new();
    for (scene, corners) in &metadata.frame_corners {
        let source = script_output.join(format!("{}.png", scene));
        let image = image::open(&source)
            .with_context(|| format!("Failed to open {}", source.display()))?;

        let (x, y, w, h) = crop_bounds(corners, image.width(), image.height()).ok_or_else(|| {
            CliError::Other(format!("Frame of scene '{}' lies outside its screenshot", scene))
        })?;

        let target = screenshots.join(format!("{}.png", scene));
        image
            .crop_imm(x, y, w, h)
            .save(&target)
            .with_context(|| format!("Failed to save {}", target.display()))?;
        saved.push(target);
    }
    saved.sort();
    Ok(saved)
}

fn clear_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Run the screenshotter scenario until it reports completion
fn run_scenario(project: &Project, scenario: &Path) -> Result<()> {
    let mod_name = project.mod_name();
    let mut child = Command::new(&project.config().factorio_path)
        .arg("--load-scenario")
        .arg(format!("{}/screenshotter", mod_name))
        .arg("--config")
        .arg(scenario.join("config.ini"))
        .arg("--instrument-mod")
        .arg(mod_name)
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to launch {}", project.config().factorio_path.display()))?;

    stop_when_done(&mut child)
}

/// Read the child's stdout up to the completion line, then stop the child.
/// The child is killed and reaped even when reading fails.
fn stop_when_done(child: &mut Child) -> Result<()> {
    let watched = match child.stdout.take() {
        Some(stdout) => wait_for_sentinel(BufReader::new(stdout)),
        None => Ok(()),
    };

    // The game keeps running after the scenario finishes
    match child.kill() {
        Err(e) if e.kind() != ErrorKind::InvalidInput => {
            return Err(CliError::Io(e).with_context("Failed to stop the game"));
        }
        _ => {}
    }
    child.wait()?;

    watched.with_context(|| "Failed to read the game's output")
}

fn wait_for_sentinel(reader: impl BufRead) -> std::io::Result<()> {
    for line in reader.lines() {
        if line?.trim() == DONE_SENTINEL {
            break;
        }
    }
    Ok(())
}

/// Take fresh screenshots with the scenario and crop them into `screenshots/`
pub fn take_screenshots(project: &Project, progress: &ProgressTracker) -> Result<Vec<PathBuf>> {
    let scenario = project.screenshotter_dir();
    if !scenario.is_dir() {
        return Err(CliError::precondition(format!(
            "No screenshotter scenario at {}",
            scenario.display()
        )));
    }
    let userdata = project.config().userdata_dir().ok_or_else(|| {
        CliError::precondition("Cannot determine the game's user data directory; set userdata_path")
    })?;

    let mod_list = userdata.join("mods").join("mod-list.json");
    if mod_list.exists() {
        fs::remove_file(&mod_list)?;
    }
    fs::copy(scenario.join("mod-list.json"), &mod_list)
        .with_context(|| format!("Failed to replace {}", mod_list.display()))?;
    progress.detail("mod-list.json replaced");

    run_scenario(project, &scenario)?;
    progress.detail("scenario finished");

    let script_output = userdata.join("script-output");
    let screenshots = project.screenshots_dir();
    clear_directory(&screenshots)?;
    let saved = crop_scenes(&script_output, &screenshots)?;
    fs::remove_dir_all(&script_output)?;

    progress.detail(&format!("{} screenshots saved", saved.len()));
    Ok(saved)
}

pub fn execute(project: &Project, assume_yes: bool, verbose: bool) -> Result<()> {
    if !ui::confirm(
        &format!("[{}] Sure to retake the screenshots?", project.mod_name()),
        assume_yes,
    )? {
        return Ok(());
    }

    let mut progress =
        ProgressTracker::new("Screenshots", verbose).with_steps(&["Taking screenshots"]);
    progress.start_step();
    let saved = take_screenshots(project, &progress)?;
    progress.complete_step();
    progress.complete();

    ui::info_message(&format!(
        "{} screenshots written to {}",
        saved.len(),
        project.screenshots_dir().display()
    ));
    Ok(())
}
