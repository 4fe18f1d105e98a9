use crate::error::{CliError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `content` through a sibling temp file and a rename,
/// so readers never observe a half-written file
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::Other(format!("Invalid file path: {}", path.display())))?;
    let temp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

    let write_result = fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });
    if let Err(e) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(CliError::Io(e).with_context(format!("Failed to write {}", path.display())));
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CliError::Io(e).with_context(format!("Failed to replace {}", path.display()))
    })
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::Io(e).with_context(format!("Failed to read {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn replaces_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("info.json");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("info.json");

        let err = write_atomic(&path, b"x").unwrap_err();
        assert!(err.user_message().contains("Failed to write"));
    }
}
