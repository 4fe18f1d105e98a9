use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{GitError, Result};
use git2::{
    BranchType, IndexAddOption, ObjectType, Repository as GitRepository, ResetType, StatusOptions,
};

pub trait Repository {
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;
    fn workdir(&self) -> Result<PathBuf>;
    fn is_clean(&self) -> Result<bool>;
    fn get_current_branch(&self) -> Result<String>;
    fn read_file_at(&self, branch: &str, path: &Path) -> Result<String>;
    fn stage_all(&self) -> Result<()>;
    fn commit(&self, message: &str) -> Result<()>;
    fn push(&self, remote: &str) -> Result<()>;
    fn pull_submodule(&self, name: &str) -> Result<()>;
    fn reset_to_parent(&self) -> Result<()>;
}

pub struct RealGitRepository {
    repo: GitRepository,
}

impl RealGitRepository {
    // Runs system git inside the working tree; used where git2 offers no
    // credential-aware equivalent
    fn run_git(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .map_err(|e| {
                GitError::IoError(e).with_context(format!("Failed to execute git {}", args.join(" ")))
            })?;

        if !output.status.success() {
            return Err(GitError::CommandError {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn repo_relative(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }
        let workdir = self.workdir()?.canonicalize()?;
        // The file may be absent on the current branch, so resolve its directory only
        let path = match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) if parent.exists() => parent.canonicalize()?.join(name),
            _ => path.to_path_buf(),
        };
        path.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                GitError::RepositoryError(format!(
                    "'{}' is outside the repository at '{}'",
                    path.display(),
                    workdir.display()
                ))
            })
    }
}

impl Repository for RealGitRepository {
    fn open(path: &Path) -> Result<Self> {
        let repo = GitRepository::discover(path).map_err(|e| {
            GitError::RepositoryError(format!("Failed to discover git repository: {}", e))
        })?;
        Ok(Self { repo })
    }

    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::RepositoryError("Repository is bare".to_string()))
    }

    fn is_clean(&self) -> Result<bool> {
        let repo = &self.repo;

        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = repo.statuses(Some(&mut options)).map_err(|e| {
            GitError::RepositoryError(format!("Failed to get repository status: {}", e))
        })?;

        Ok(statuses.is_empty())
    }

    fn get_current_branch(&self) -> Result<String> {
        let repo = &self.repo;

        let head = repo.head()?;
        if !head.is_branch() {
            return Err(GitError::RepositoryError(
                "HEAD is not a branch".to_string(),
            ));
        }

        let branch_name = head
            .shorthand()
            .ok_or_else(|| GitError::RepositoryError("Invalid branch name".to_string()))?
            .to_string();

        Ok(branch_name)
    }

    fn read_file_at(&self, branch: &str, path: &Path) -> Result<String> {
        let repo = &self.repo;
        let relative = self.repo_relative(path)?;

        let branch_ref = repo
            .find_branch(branch, BranchType::Local)
            .map_err(|_| GitError::BranchNotFound(branch.to_string()))?;
        let tree = branch_ref.get().peel_to_tree()?;

        let not_found = || GitError::FileNotFound {
            branch: branch.to_string(),
            path: relative.display().to_string(),
        };
        let entry = tree.get_path(&relative).map_err(|_| not_found())?;
        if entry.kind() != Some(ObjectType::Blob) {
            return Err(not_found());
        }
        let blob = entry.to_object(repo)?.peel_to_blob()?;

        Ok(std::str::from_utf8(blob.content())?.to_string())
    }

    fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let repo = &self.repo;

        let signature = repo.signature().map_err(|e| {
            GitError::RepositoryError(format!("Failed to determine commit author: {}", e))
        })?;

        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(|e| GitError::RepositoryError(format!("Failed to commit: {}", e)))?;

        Ok(())
    }

    fn push(&self, remote: &str) -> Result<()> {
        self.run_git(&self.workdir()?, &["push", remote])
            .map_err(|e| e.with_context(format!("Failed to push to '{}'", remote)))?;
        Ok(())
    }

    fn pull_submodule(&self, name: &str) -> Result<()> {
        let submodule = self.repo.find_submodule(name).map_err(|e| {
            GitError::RepositoryError(format!("Submodule '{}' not found: {}", name, e))
        })?;
        let dir = self.workdir()?.join(submodule.path());
        self.run_git(&dir, &["pull"])
            .map_err(|e| e.with_context(format!("Failed to pull submodule '{}'", name)))?;
        Ok(())
    }

    fn reset_to_parent(&self) -> Result<()> {
        let repo = &self.repo;

        let head = repo.head()?.peel_to_commit()?;
        let parent = head.parent(0).map_err(|e| {
            GitError::RepositoryError(format!("HEAD has no parent commit: {}", e))
        })?;

        repo.reset(parent.as_object(), ResetType::Hard, None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::RepositoryInitOptions;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, RealGitRepository) {
        let dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("master");
        let repo = GitRepository::init_opts(dir.path(), &opts).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        fs::write(dir.path().join("info.json"), "{\"version\": \"1.0.0\"}").unwrap();

        let repo = RealGitRepository { repo };
        repo.stage_all().unwrap();
        repo.commit("Initial commit").unwrap();
        (dir, repo)
    }

    #[test]
    fn fresh_repository_is_clean_on_master() {
        let (_dir, repo) = init_repo();
        assert!(repo.is_clean().unwrap());
        assert_eq!(repo.get_current_branch().unwrap(), "master");
    }

    #[test]
    fn modified_file_makes_tree_dirty() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("info.json"), "{\"version\": \"1.0.1\"}").unwrap();
        assert!(!repo.is_clean().unwrap());

        repo.stage_all().unwrap();
        repo.commit("Bump").unwrap();
        assert!(repo.is_clean().unwrap());
    }

    #[test]
    fn reads_file_from_other_branch() {
        let (dir, repo) = init_repo();
        let head = repo.repo.head().unwrap().peel_to_commit().unwrap();
        repo.repo.branch("feature", &head, false).unwrap();
        repo.repo.set_head("refs/heads/feature").unwrap();

        fs::write(dir.path().join("info.json"), "{\"version\": \"9.9.9\"}").unwrap();
        repo.stage_all().unwrap();
        repo.commit("Feature work").unwrap();

        let on_master = repo.read_file_at("master", Path::new("info.json")).unwrap();
        assert!(on_master.contains("1.0.0"));
        assert_eq!(repo.get_current_branch().unwrap(), "feature");

        let err = repo.read_file_at("master", Path::new("missing.json")).unwrap_err();
        assert!(matches!(err, GitError::FileNotFound { .. }));
    }

    #[test]
    fn reset_to_parent_discards_last_commit() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("info.json"), "{\"version\": \"2.0.0\"}").unwrap();
        repo.stage_all().unwrap();
        repo.commit("Release 2.0.0").unwrap();

        repo.reset_to_parent().unwrap();
        let content = fs::read_to_string(dir.path().join("info.json")).unwrap();
        assert!(content.contains("1.0.0"));
    }
}
