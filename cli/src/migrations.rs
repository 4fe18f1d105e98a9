use crate::error::{CliError, Result, ResultExt};
use crate::files::{read_text, write_atomic};
use crate::progress::ProgressTracker;
use crate::project::Project;
use crate::ui;
use git::Repository;
use migration::{Masterlist, MigrationError, MigratorConfig, RegistryGenerator};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::PathBuf;
use version::{ModInfo, Version, VersionType};

/// Migration scripts, masterlist and migrator of one project
pub struct MigrationFiles<'a> {
    project: &'a Project,
    config: MigratorConfig,
}

impl<'a> MigrationFiles<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            config: MigratorConfig::default(),
        }
    }

    pub fn load_masterlist(&self) -> Result<Masterlist> {
        let path = self.project.masterlist();
        let content = read_text(&path)?;
        Masterlist::from_json(&content)
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn migration_path(&self, version: &str) -> PathBuf {
        self.project
            .migrations_dir()
            .join(self.config.file_name(version))
    }

    /// Migrator text with its registry block rebuilt from `masterlist`
    pub fn regenerated_migrator(&self, masterlist: &Masterlist) -> Result<String> {
        let path = self.project.migrator();
        let content = read_text(&path)?;
        RegistryGenerator::new(self.config.clone())
            .regenerate(&content, masterlist)
            .with_context(|| format!("Failed to update {}", path.display()))
    }

    /// Copy the blank template to the migration file for `version`
    pub fn create_from_template(&self, version: &str) -> Result<PathBuf> {
        let template = self.project.migrations_dir().join(self.config.template_file_name());
        let body = fs::read(&template)
            .map_err(|e| CliError::Io(e).with_context(format!("Failed to read template {}", template.display())))?;

        let target = self.migration_path(version);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| self.conflict_or_io(e, &target))?;
        std::io::Write::write_all(&mut file, &body)?;
        Ok(target)
    }

    /// Rename the migration file of `from` to that of `to`
    pub fn rename(&self, from: &str, to: &str) -> Result<PathBuf> {
        let source = self.migration_path(from);
        let target = self.migration_path(to);
        if target.exists() {
            return Err(MigrationError::Conflict(target.display().to_string()).into());
        }
        fs::rename(&source, &target).map_err(|e| {
            CliError::Io(e).with_context(format!("Failed to rename {}", source.display()))
        })?;
        Ok(target)
    }

    pub fn write_masterlist(&self, masterlist: &Masterlist) -> Result<()> {
        write_atomic(&self.project.masterlist(), masterlist.to_json()?.as_bytes())
    }

    pub fn write_migrator(&self, content: &str) -> Result<()> {
        write_atomic(&self.project.migrator(), content.as_bytes())
    }

    fn conflict_or_io(&self, err: std::io::Error, path: &std::path::Path) -> CliError {
        if err.kind() == ErrorKind::AlreadyExists {
            MigrationError::Conflict(path.display().to_string()).into()
        } else {
            CliError::Io(err).with_context(format!("Failed to create {}", path.display()))
        }
    }
}

/// Add a blank migration targeted at the next patch release. Returns its version.
pub fn add_migration(project: &Project, progress: &mut ProgressTracker) -> Result<String> {
    let files = MigrationFiles::new(project);

    progress.start_step();
    let info = ModInfo::load(&project.info_json())?;
    let next = Version::next_release(&info, VersionType::Patch)?.to_string();
    progress.detail(&format!("Current version {}, next {}", info.raw_version(), next));
    progress.complete_step();

    progress.start_step();
    let masterlist = files.load_masterlist()?.register_migration(&next)?;
    let migrator = files.regenerated_migrator(&masterlist)?;
    progress.complete_step();

    progress.start_step();
    let created = files.create_from_template(&next)?;
    progress.detail(&format!("Created {}", created.display()));
    progress.complete_step();

    progress.start_step();
    files.write_masterlist(&masterlist)?;
    files.write_migrator(&migrator)?;
    progress.complete_step();

    Ok(next)
}

/// Outcome of retargeting the newest migration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retarget {
    UpToDate(String),
    Moved { from: String, to: String },
}

/// Point the newest migration at the release after the main branch's
/// current version. With `sync_mod_version`, this branch's `info.json`
/// also takes the main branch's version.
pub fn retarget_migration(
    project: &Project,
    repo: &impl Repository,
    sync_mod_version: bool,
    progress: &mut ProgressTracker,
) -> Result<Retarget> {
    let main_branch = &project.config().main_branch;
    let files = MigrationFiles::new(project);

    progress.start_step();
    let current_branch = repo.get_current_branch()?;
    if &current_branch == main_branch {
        return Err(CliError::precondition(format!("On the '{}' branch", main_branch)));
    }
    if sync_mod_version && !repo.is_clean()? {
        return Err(CliError::precondition("Repository is dirty"));
    }
    progress.complete_step();

    progress.start_step();
    let masterlist = files.load_masterlist()?;
    let old = masterlist
        .last()
        .ok_or(MigrationError::EmptyMasterlist)?
        .to_string();

    let main_info = repo
        .read_file_at(main_branch, &project.info_json())
        .with_context(|| format!("Failed to read info.json from '{}'", main_branch))?;
    let main_info = ModInfo::from_json(&main_info)?;
    let main_version = main_info.version()?;
    let next = Version::increment(&main_version, VersionType::Patch).to_string();
    progress.detail(&format!("Last migration {}, next release {}", old, next));
    progress.complete_step();

    if old == next {
        return Ok(Retarget::UpToDate(old));
    }

    progress.start_step();
    let masterlist = masterlist.retarget_last_migration(&next)?;
    let migrator = files.regenerated_migrator(&masterlist)?;
    let info = if sync_mod_version {
        let mut info = ModInfo::load(&project.info_json())?;
        info.set_version(&main_version);
        Some(info)
    } else {
        None
    };

    files.rename(&old, &next)?;
    files.write_masterlist(&masterlist)?;
    files.write_migrator(&migrator)?;
    if let Some(info) = info {
        write_atomic(&project.info_json(), info.to_json()?.as_bytes())?;
    }
    progress.complete_step();

    progress.start_step();
    let message = if sync_mod_version {
        "Update mod and migration versions"
    } else {
        "Update migration version"
    };
    repo.stage_all()?;
    repo.commit(message)?;
    progress.complete_step();

    Ok(Retarget::Moved { from: old, to: next })
}

pub fn execute_new(project: &Project, assume_yes: bool, verbose: bool) -> Result<()> {
    if !ui::confirm(
        &format!("[{}] Sure to add a new migration?", project.mod_name()),
        assume_yes,
    )? {
        return Ok(());
    }

    let mut progress = ProgressTracker::new("New Migration", verbose).with_steps(&[
        "Determining next mod version",
        "Registering migration",
        "Creating migration file",
        "Writing masterlist and migrator",
    ]);
    let version = add_migration(project, &mut progress)?;
    progress.complete();

    ui::success_message(&format!("Migration for {} added", version));
    Ok(())
}

pub fn execute_update(
    project: &Project,
    sync_mod_version: bool,
    assume_yes: bool,
    verbose: bool,
) -> Result<()> {
    let prompt = if sync_mod_version {
        "Sure to update mod and migration versions?"
    } else {
        "Sure to update the last migration?"
    };
    if !ui::confirm(&format!("[{}] {}", project.mod_name(), prompt), assume_yes)? {
        return Ok(());
    }

    let repo = git::RealGitRepository::open(project.root())
        .map_err(|e| CliError::Git(e).with_context("Failed to open git repository"))?;

    let title = if sync_mod_version {
        "Update Versions"
    } else {
        "Update Migration"
    };
    let mut progress = ProgressTracker::new(title, verbose).with_steps(&[
        "Checking repository state",
        "Determining next release",
        "Retargeting migration",
        "Committing changes",
    ]);

    match retarget_migration(project, &repo, sync_mod_version, &mut progress)? {
        Retarget::UpToDate(version) => {
            ui::info_message(&format!("Migration {} is up to date", version));
        }
        Retarget::Moved { from, to } => {
            progress.complete();
            ui::success_message(&format!("Migration moved from {} to {}", from, to));
        }
    }
    Ok(())
}
