use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const OUTPUT_SUBDIR: &str = "out";
pub const FILE_PREFIX: &str = "mouse_track";
pub const FILE_EXTENSION: &str = "png";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("output directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("failed to create output directory {}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not resolve the application directory: {0}")]
    AppDirectory(String),

    #[error("failed to write image {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Output directory. Relative paths are resolved against the directory
    /// holding the running executable.
    pub directory: PathBuf,
    pub create_directory: bool,
    pub reset_after: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(OUTPUT_SUBDIR),
            create_directory: true,
            reset_after: true,
        }
    }
}

pub fn app_relative_dir_from_path(exe_path: &Path, directory: &Path) -> Result<PathBuf, SaveError> {
    let parent = exe_path.parent().ok_or_else(|| {
        SaveError::AppDirectory(format!(
            "executable path has no parent: {}",
            exe_path.display()
        ))
    })?;
    Ok(parent.join(directory))
}

pub fn resolve_output_dir(directory: &Path) -> Result<PathBuf, SaveError> {
    if directory.is_absolute() {
        return Ok(directory.to_path_buf());
    }
    let exe_path =
        std::env::current_exe().map_err(|err| SaveError::AppDirectory(err.to_string()))?;
    app_relative_dir_from_path(&exe_path, directory)
}

pub fn prepare_output_dir(directory: &Path, create: bool) -> Result<(), SaveError> {
    if create {
        fs::create_dir_all(directory).map_err(|source| SaveError::CreateDirectory {
            path: directory.to_path_buf(),
            source,
        })?;
        return Ok(());
    }
    if !directory.is_dir() {
        return Err(SaveError::DirectoryNotFound(directory.to_path_buf()));
    }
    Ok(())
}

/// `mouse_track-Y-M-D-H-Min-S.png`, unpadded, local time.
pub fn timestamped_filename(now: DateTime<Local>) -> String {
    format!(
        "{}-{}.{}",
        FILE_PREFIX,
        now.format("%Y-%-m-%-d-%-H-%-M-%-S"),
        FILE_EXTENSION
    )
}
