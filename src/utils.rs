use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::error::{FeatureError, Result};

pub(crate) fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| FeatureError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/**
The key used to join an image against the lookup tables: its last path component.
 */
pub(crate) fn image_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| FeatureError::InvalidPath(path.to_path_buf()))
}

/**
Join `filename` onto `directory`, anchoring relative results at the current working directory.
 */
pub(crate) fn resolve_image_path(directory: &Path, filename: &str) -> Result<PathBuf> {
    let path = directory.join(filename);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(|source| FeatureError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(cwd.join(path))
}

/**
A scratch directory under the system temp dir, unique per test name and process.
 */
#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "emotion-feature-extraction-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Couldn't create scratch dir");
    dir
}
