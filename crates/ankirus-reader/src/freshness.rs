//! Source modification probing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

const SIDE_FILE_SUFFIX: &str = "-wal";

/// Path of the write-ahead log that accompanies `path`.
#[must_use]
pub fn side_file(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(SIDE_FILE_SUFFIX);
    PathBuf::from(name)
}

/// Latest modification time of `path` and its side-file.
///
/// Missing files are skipped; `None` means neither exists.
pub async fn last_modified(path: &Path) -> Option<DateTime<Utc>> {
    let mut latest = None;
    for candidate in [path.to_path_buf(), side_file(path)] {
        let modified = tokio::fs::metadata(&candidate)
            .await
            .ok()
            .and_then(|meta| meta.modified().ok())
            .map(DateTime::<Utc>::from);
        latest = latest.max(modified);
    }
    latest
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(path: &Path, at: SystemTime) {
        let file = File::create(path).unwrap();
        file.set_modified(at).unwrap();
    }

    #[test]
    fn side_file_appends_suffix() {
        assert_eq!(
            side_file(Path::new("/p/collection.anki2")),
            PathBuf::from("/p/collection.anki2-wal")
        );
    }

    #[tokio::test]
    async fn missing_files_mean_never_modified() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(last_modified(&dir.path().join("absent")).await, None);
    }

    #[tokio::test]
    async fn primary_alone() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("c.anki2");
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        touch(&primary, at);

        assert_eq!(last_modified(&primary).await, Some(DateTime::<Utc>::from(at)));
    }

    #[tokio::test]
    async fn newer_side_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("c.anki2");
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let new = old + Duration::from_secs(90);
        touch(&primary, old);
        touch(&side_file(&primary), new);

        assert_eq!(last_modified(&primary).await, Some(DateTime::<Utc>::from(new)));
    }

    #[tokio::test]
    async fn side_file_alone_still_counts() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("c.anki2");
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_650_000_000);
        touch(&side_file(&primary), at);

        assert_eq!(last_modified(&primary).await, Some(DateTime::<Utc>::from(at)));
    }
}
