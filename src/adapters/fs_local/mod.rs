// Local filesystem adapter - Directory and file operations on std::fs

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::error::TimelapseResult;
use crate::ports::*;

/// Filesystem adapter backed by `std::fs` and `walkdir`
#[derive(Debug, Default, Clone)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }

    fn matches_extension(path: &Path, extension: &str) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false)
    }

    fn walk(dir_path: &Path, extension: &str, recursive: bool) -> TimelapseResult<Vec<PathBuf>> {
        let mut walker = WalkDir::new(dir_path).min_depth(1);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && Self::matches_extension(entry.path(), extension) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl FsPort for LocalFsAdapter {
    fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError> {
        Ok(dir_path.is_dir())
    }

    fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        Ok(file_path.is_file())
    }

    fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    fn delete_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::remove_dir_all(dir_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to delete directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
        fs::remove_file(file_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to delete file {}: {}",
                file_path.display(),
                e
            ))
        })
    }

    fn list_files(
        &self,
        dir_path: &Path,
        extension: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, DomainError> {
        Ok(Self::walk(dir_path, extension, recursive)?)
    }
}
