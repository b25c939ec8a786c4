//! Whole-file saves for exports and the config file.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{0:?} is not a plain file name")]
    InvalidFileName(String),
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` and its parents unless it already is a directory.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(fs::create_dir_all(dir)?),
        Err(err) => Err(err.into()),
    }
}

/// Replaces `{dir}/{filename}` with `contents`. Readers see either the old
/// file or the complete new one.
///
/// `filename` must be a single path component; anything that would land
/// outside `dir` is refused.
pub fn save_file(dir: &Path, filename: &str, contents: &[u8]) -> Result<PathBuf, PersistError> {
    if !is_plain_file_name(filename) {
        return Err(PersistError::InvalidFileName(filename.to_string()));
    }
    ensure_dir(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;

    let target = dir.join(filename);
    staged
        .persist(&target)
        .map_err(|err| PersistError::Io(err.error))?;
    Ok(target)
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
