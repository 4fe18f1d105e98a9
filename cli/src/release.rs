use crate::cli::ReleaseMode;
use crate::dev_cycle::insert_pending_entry;
use crate::error::{CliError, Result, ResultExt};
use crate::files::{read_text, write_atomic};
use crate::packaging::{copy_locale_configs, create_archive, stage_release, update_license_year};
use crate::progress::ProgressTracker;
use crate::project::Project;
use crate::screenshots::take_screenshots;
use crate::ui;
use changelog::Changelog;
use chrono::{Datelike, Local};
use git::Repository;
use indicatif::{ProgressBar, ProgressStyle};
use portal::ModPortal;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use version::{ModInfo, Version, VersionType};

#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    pub mode: ReleaseMode,
    pub screenshots: bool,
    pub assume_yes: bool,
    pub verbose: bool,
}

/// API keys needed for publishing, resolved before anything is changed
struct PortalKeys {
    upload: String,
    edit: Option<String>,
}

/// Version and date stamped by [`prepare_release`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRelease {
    pub version: String,
    pub date: String,
}

/// Bump `info.json`, promote the pending changelog entry and refresh the
/// LICENSE year. Nothing is written unless every step succeeds.
pub fn prepare_release(project: &Project, progress: &ProgressTracker) -> Result<PreparedRelease> {
    let mut info = ModInfo::load(&project.info_json())?;
    let next = Version::next_release(&info, VersionType::Patch)?;
    let version = next.to_string();
    progress.detail(&format!("{} -> {}", info.raw_version(), version));
    info.set_version(&next);

    let changelog_path = project.changelog();
    let content = read_text(&changelog_path)?;
    let mut changelog = Changelog::parse(&content, project.config().changelog.to_config())
        .with_context(|| format!("Failed to parse {}", changelog_path.display()))?;
    let date = changelog
        .release(&version)
        .with_context(|| format!("Cannot release {}", changelog_path.display()))?;

    let license_path = project.license();
    let license = if license_path.exists() {
        let text = read_text(&license_path)?;
        Some(update_license_year(&text, Local::now().year()))
    } else {
        None
    };

    write_atomic(&project.info_json(), info.to_json()?.as_bytes())?;
    write_atomic(&changelog_path, changelog.render().as_bytes())?;
    if let Some(license) = license {
        write_atomic(&license_path, license.as_bytes())?;
    }

    Ok(PreparedRelease { version, date })
}

fn check_preconditions(project: &Project, repo: &impl Repository) -> Result<()> {
    let main_branch = &project.config().main_branch;
    let current = repo.get_current_branch()?;
    if &current != main_branch {
        return Err(CliError::precondition(format!(
            "Not on the '{}' branch (on '{}')",
            main_branch, current
        )));
    }
    if !repo.is_clean()? {
        return Err(CliError::precondition("Repository is dirty"));
    }
    Ok(())
}

fn resolve_keys(project: &Project, with_images: bool) -> Result<PortalKeys> {
    let settings = &project.config().portal;
    let upload = portal::api_key_from_env(&settings.upload_key_env)?;
    let edit = if with_images {
        Some(portal::api_key_from_env(&settings.edit_key_env)?)
    } else {
        None
    };
    Ok(PortalKeys { upload, edit })
}

fn publish(
    project: &Project,
    keys: &PortalKeys,
    archive: &Path,
    screenshots: &[PathBuf],
) -> Result<()> {
    let settings = &project.config().portal;
    let client = ModPortal::with_endpoints(
        project.mod_name(),
        &settings.upload_url,
        &settings.images_url,
    )?;

    let rt = Runtime::new().map_err(|e| {
        CliError::Other(format!("Failed to create async runtime: {}", e))
    })?;

    rt.block_on(async {
        ui::status_message("Publishing to mod portal");
        client.upload_release(&keys.upload, archive).await?;
        ui::success_message("Release uploaded");

        let Some(edit_key) = &keys.edit else {
            return Ok(());
        };
        if screenshots.is_empty() {
            ui::warning_message("No screenshots taken, portal images left unchanged");
            return Ok(());
        }

        client.clear_images(edit_key).await?;
        let pb = ProgressBar::new(screenshots.len() as u64);
        let style = ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        for image in screenshots {
            pb.set_message(
                image
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );
            client.add_image(edit_key, image).await?;
            pb.inc(1);
        }
        pb.finish_with_message("images uploaded");
        Ok::<(), CliError>(())
    })
}

pub fn execute(project: &Project, options: ReleaseOptions) -> Result<()> {
    let prompt = match options.mode {
        ReleaseMode::Publish => "Sure to publish a release?",
        ReleaseMode::Local => "Sure to build a local release?",
        ReleaseMode::Build => "Sure to build a release?",
    };
    if !ui::confirm(&format!("[{}] {}", project.mod_name(), prompt), options.assume_yes)? {
        return Ok(());
    }

    let repo = git::RealGitRepository::open(project.root())
        .map_err(|e| CliError::Git(e).with_context("Failed to open git repository"))?;

    let keys = if options.mode == ReleaseMode::Publish {
        check_preconditions(project, &repo)?;
        Some(resolve_keys(project, options.screenshots)?)
    } else {
        None
    };

    let mut progress = ProgressTracker::new("Release", options.verbose).with_steps(&[
        "Preparing version, changelog and license",
        "Staging release files",
        "Including foreign locales",
        "Creating zip archive",
        "Adding blank changelog entry",
        "Taking screenshots",
        "Committing release",
        "Finishing release",
    ]);

    progress.start_step();
    let release = prepare_release(project, &progress)?;
    progress.detail(&format!("Release date {}", release.date));
    progress.complete_step();

    progress.start_step();
    let release_name = project.release_name(&release.version);
    let staging = stage_release(project, &release_name)?;
    progress.complete_step();

    progress.start_step();
    let locale_dir = project.locale_dir();
    if locale_dir.is_dir() {
        repo.pull_submodule("locale")?;
        let locales = copy_locale_configs(&locale_dir, &staging)?;
        progress.detail(&format!("Locales: {}", locales.join(", ")));
        progress.complete_step();
    } else {
        progress.skip_step("no locale directory");
    }

    progress.start_step();
    let archive = create_archive(project, &staging, &release_name)?;
    progress.detail(&format!("Archive at {}", archive.display()));
    progress.complete_step();

    progress.start_step();
    insert_pending_entry(project)?;
    progress.complete_step();

    progress.start_step();
    let screenshots = if options.screenshots && project.screenshotter_dir().is_dir() {
        let saved = take_screenshots(project, &progress)?;
        progress.complete_step();
        saved
    } else {
        progress.skip_step("not requested or no screenshotter scenario");
        Vec::new()
    };

    progress.start_step();
    repo.stage_all()?;
    repo.commit(&format!("Release {}", release.version))?;
    progress.complete_step();

    progress.start_step();
    match options.mode {
        ReleaseMode::Local => {
            let local_copy = project.root().join(format!("{}.zip", release_name));
            fs::copy(&archive, &local_copy)?;
            repo.reset_to_parent()?;
            progress.detail(&format!("Copied archive to {}", local_copy.display()));
            progress.complete_step();
        }
        ReleaseMode::Publish => {
            let remote = &project.config().remote;
            repo.push(remote)?;
            progress.detail(&format!("Pushed to '{}'", remote));
            if let Some(keys) = &keys {
                publish(project, keys, &archive, &screenshots)?;
            }
            progress.complete_step();
        }
        ReleaseMode::Build => progress.skip_step("neither --local nor --publish given"),
    }

    progress.complete();
    ui::success_message(&format!("Version {} released!", release.version));
    Ok(())
}
