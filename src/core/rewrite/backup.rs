use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Copies files into `<backupDir>/backup-<timestamp>/` keeping their
/// project-relative layout.
pub struct Backup {
    project_root: PathBuf,
    dir: PathBuf,
}

impl Backup {
    pub fn new(project_root: &Path, backup_root: &Path, timestamp: &str) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            dir: backup_root.join(format!("backup-{}", timestamp)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self, relative: &str) -> Result<PathBuf> {
        let source = self.project_root.join(relative);
        let target = self.dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::copy(&source, &target).with_context(|| {
            format!(
                "Failed to back up {} to {}",
                source.display(),
                target.display()
            )
        })?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_keeps_relative_layout() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/views")).unwrap();
        fs::write(root.join("src/views/App.vue"), "<template></template>").unwrap();

        let backup = Backup::new(root, &root.join("backup"), "2024-01-01_00-00-00");
        let saved = backup.save("src/views/App.vue").unwrap();

        assert_eq!(
            saved,
            root.join("backup/backup-2024-01-01_00-00-00/src/views/App.vue")
        );
        assert_eq!(fs::read_to_string(saved).unwrap(), "<template></template>");
    }
}
