//! Fixtures shared by the flow tests
use crate::project::Project;
use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const MIGRATOR_HEAD: &str = "local migrator = {}\n\nlocal migration_masterlist = {\n";
pub const MIGRATOR_TAIL: &str = "}\n\nreturn migrator\n";

/// A throwaway mod project laid out like a real one
pub struct TestProject {
    pub dir: TempDir,
    pub project: Project,
}

impl TestProject {
    pub fn new(mod_version: &str, migrations: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("testmod");
        let modfiles = root.join("modfiles");
        fs::create_dir_all(modfiles.join("data").join("migrations")).unwrap();
        fs::create_dir_all(modfiles.join("data").join("handlers")).unwrap();

        let write = |path: &str, content: &str| fs::write(root.join(path), content).unwrap();

        write(
            "modfiles/info.json",
            &format!(
                "{{\n    \"name\": \"testmod\",\n    \"version\": \"{}\",\n    \"title\": \"Test Mod\"\n}}\n",
                mod_version
            ),
        );
        write("modfiles/data/migrations/migration_0_0_0.lua", "local migration = {}\n\nreturn migration\n");

        let quoted: Vec<String> = migrations.iter().map(|v| format!("    \"{}\"", v)).collect();
        let masterlist = if quoted.is_empty() {
            "[]\n".to_string()
        } else {
            format!("[\n{}\n]\n", quoted.join(",\n"))
        };
        write("modfiles/data/migrations/masterlist.json", &masterlist);

        let mut migrator = MIGRATOR_HEAD.to_string();
        for (index, version) in migrations.iter().enumerate() {
            let module = version.replace('.', "_");
            write(
                &format!("modfiles/data/migrations/migration_{}.lua", module),
                &format!("-- migration {}\n", version),
            );
            migrator.push_str(&format!(
                "    [{}] = {{version=\"{}\", migration=require(\"data.migrations.migration_{}\")}},\n",
                index + 1,
                version,
                module
            ));
        }
        migrator.push_str(MIGRATOR_TAIL);
        write("modfiles/data/handlers/migrator.lua", &migrator);

        let project = Project::open(&root).unwrap();
        Self { dir, project }
    }

    pub fn root(&self) -> &Path {
        self.project.root()
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path)).unwrap()
    }

    pub fn write(&self, path: &str, content: &str) {
        let path = self.root().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn exists(&self, path: &str) -> bool {
        self.root().join(path).exists()
    }

    pub fn write_info(&self, version: &str) {
        let info = self.read("modfiles/info.json");
        let start = info.find("\"version\": \"").unwrap() + "\"version\": \"".len();
        let end = start + info[start..].find('"').unwrap();
        let updated = format!("{}{}{}", &info[..start], version, &info[end..]);
        self.write("modfiles/info.json", &updated);
    }
}

/// Initialise a repository on `master` with a committer identity
pub fn init_repo(path: &Path) -> Repository {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("master");
    let repo = Repository::init_opts(path, &opts).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    repo
}

pub fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).unwrap();
    index.update_all(["*"].iter(), None).unwrap();
    index.write().unwrap();

    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let signature = Signature::now("Test", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap();
}
