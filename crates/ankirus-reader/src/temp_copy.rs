//! Private copies of the live collection.
//!
//! The live collection is held open and locked by Anki, so every refresh
//! copies it (and its write-ahead log, when present) to a private location
//! first and extracts from the copy.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ReaderError;
use crate::freshness::side_file;

/// Owns the private copy; removes it on drop.
#[derive(Debug)]
pub struct TempCopy {
    path: PathBuf,
}

impl TempCopy {
    /// Copy `source` and its side-file to `temp` and `temp` + `-wal`.
    ///
    /// A temporary side-file left from an earlier refresh is removed when the
    /// live one no longer exists. Anything written before a failure is
    /// cleaned up when the returned error propagates.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::SourceMissing` if `source` does not exist and
    /// `ReaderError::Copy` if either copy fails.
    pub fn create(source: &Path, temp: &Path) -> Result<Self, ReaderError> {
        let guard = Self {
            path: temp.to_path_buf(),
        };

        if let Some(parent) = temp.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source_err| ReaderError::Copy {
                from: source.to_path_buf(),
                to: temp.to_path_buf(),
                source: source_err,
            })?;
        }

        if !copy_or_remove(source, temp)? {
            return Err(ReaderError::SourceMissing(source.to_path_buf()));
        }
        copy_or_remove(&side_file(source), &side_file(temp))?;

        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempCopy {
    fn drop(&mut self) {
        remove_temporaries(&self.path);
    }
}

/// Mirror `src` at `dst`: copy it when it exists, otherwise delete any
/// stale `dst`. Returns whether a copy was made.
fn copy_or_remove(src: &Path, dst: &Path) -> Result<bool, ReaderError> {
    match std::fs::copy(src, dst) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound && !src.exists() => {
            remove_file_logged(dst);
            Ok(false)
        }
        Err(err) => Err(ReaderError::Copy {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source: err,
        }),
    }
}

/// Best-effort removal of `temp` and its side-file.
pub fn remove_temporaries(temp: &Path) {
    remove_file_logged(temp);
    remove_file_logged(&side_file(temp));
}

fn remove_file_logged(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed temporary file"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to remove temporary file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn copies_primary_and_side_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("live.anki2");
        let temp = dir.path().join("tmp").join("copy.anki2");
        std::fs::write(&source, b"main").unwrap();
        std::fs::write(side_file(&source), b"log").unwrap();

        let copy = TempCopy::create(&source, &temp).unwrap();
        assert_eq!(std::fs::read(copy.path()).unwrap(), b"main");
        assert_eq!(std::fs::read(side_file(&temp)).unwrap(), b"log");

        drop(copy);
        assert!(!temp.exists());
        assert!(!side_file(&temp).exists());
    }

    #[test]
    fn stale_temporary_side_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("live.anki2");
        let temp = dir.path().join("copy.anki2");
        std::fs::write(&source, b"main").unwrap();
        std::fs::write(side_file(&temp), b"old log").unwrap();

        let _copy = TempCopy::create(&source, &temp).unwrap();
        assert!(temp.exists());
        assert!(!side_file(&temp).exists());
    }

    #[test]
    fn missing_source_is_reported_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("absent.anki2");
        let temp = dir.path().join("copy.anki2");
        std::fs::write(&temp, b"leftover").unwrap();

        let err = TempCopy::create(&source, &temp).unwrap_err();
        assert!(matches!(err, ReaderError::SourceMissing(ref p) if p == &source));
        assert!(!temp.exists());
    }

    #[test]
    fn remove_temporaries_tolerates_absent_files() {
        let dir = tempfile::tempdir().unwrap();
        remove_temporaries(&dir.path().join("nothing-here"));
    }
}
