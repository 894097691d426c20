use std::{
    collections::LinkedList,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tempfile::TempDir;

use crate::{ArcPath, arc_path};

/// Mock implementation of the Fs actor for testing purposes.
///
/// Every path, absolute or relative, is mapped inside a temporary directory
/// that lives as long as the last clone of the mock.
#[derive(Debug, Clone)]
pub struct Mock {
    temp_dir: Arc<TempDir>,
}

impl Mock {
    /// Creates a new mock instance with a temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for Fs mock");
        Self {
            temp_dir: Arc::new(temp_dir),
        }
    }

    /// Converts a path to a full path within the mock's temporary directory.
    fn mock_path(&self, path: &ArcPath) -> PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.temp_dir.path().join(relative)
    }

    pub async fn read_to_string(&self, path: ArcPath) -> io::Result<String> {
        tokio::fs::read_to_string(self.mock_path(&path)).await
    }

    pub async fn write(&self, path: ArcPath, contents: String) -> io::Result<()> {
        let real_path = self.mock_path(&path);
        if let Some(parent) = real_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(real_path, contents).await
    }

    pub async fn append(&self, path: ArcPath, contents: String) -> io::Result<()> {
        let real_path = self.mock_path(&path);
        if let Some(parent) = real_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        super::core::append(&real_path, contents).await
    }

    pub async fn remove_file(&self, path: ArcPath) -> io::Result<()> {
        tokio::fs::remove_file(self.mock_path(&path)).await
    }

    /// Reads a directory. Returned entries are expressed as absolute paths
    /// of the mocked filesystem, so they can be fed back to the mock.
    pub async fn read_dir(&self, path: ArcPath) -> io::Result<LinkedList<ArcPath>> {
        let entries = super::core::read_dir(&self.mock_path(&path)).await?;
        Ok(entries
            .into_iter()
            .map(|entry| match entry.strip_prefix(self.temp_dir.path()) {
                Ok(relative) => arc_path(Path::new("/").join(relative)),
                Err(_) => entry,
            })
            .collect())
    }

    pub async fn mkdir(&self, path: ArcPath) -> io::Result<()> {
        tokio::fs::create_dir_all(self.mock_path(&path)).await
    }
}
