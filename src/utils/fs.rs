use crate::error::{FetchError, Result};
use std::path::{Path, PathBuf};

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(FetchError::OutputDir {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "path exists and is not a directory",
            ),
        });
    }

    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => FetchError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => FetchError::OutputDir {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
    }
    Ok(())
}

/// Sorted top-level entries of `dir`, directories suffixed with `/`.
pub fn list_top_level(dir: &Path) -> Result<Vec<String>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            name.push('/');
        }
        entries.push(name);
    }

    entries.sort();
    Ok(entries)
}

/// Resolves the output directory argument, falling back to the working directory.
pub fn output_dir_or_cwd(output: Option<&Path>) -> Result<PathBuf> {
    match output {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}
