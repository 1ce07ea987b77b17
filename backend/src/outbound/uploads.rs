//! Capability-scoped upload store.
//!
//! Every file lives directly under one directory opened through `cap_std`,
//! so stored names can never escape it. Names are generated as
//! `{unix_millis}-{6 base36 chars}{ext}` and published under `/uploads/`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use mockable::Clock;

use crate::domain::UPLOADS_PREFIX;
use crate::domain::ids::random_base36;
use crate::domain::ports::{FileStore, FileStoreError, StoredFile};

const SUFFIX_LEN: usize = 6;
const MAX_EXTENSION_LEN: usize = 10;

/// [`FileStore`] rooted at an uploads directory.
pub struct CapFileStore {
    root: Arc<Dir>,
    clock: Arc<dyn Clock>,
}

impl CapFileStore {
    /// Open (creating when missing) the uploads directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let root = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            root: Arc::new(root),
            clock,
        })
    }

    fn generate_name(&self, original_name: &str) -> String {
        format!(
            "{}-{}{}",
            self.clock.utc().timestamp_millis(),
            random_base36(SUFFIX_LEN),
            extension_of(original_name)
        )
    }

    async fn with_root<T, F>(&self, op: F) -> Result<T, FileStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> Result<T, FileStoreError> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || op(&root))
            .await
            .map_err(|err| FileStoreError::io(format!("upload task failed: {err}")))?
    }
}

/// Lowercased `.ext` of `original_name`, or empty when it has none usable.
fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Accept only plain names made of `[A-Za-z0-9._-]` that are not hidden.
fn checked_name(name: &str) -> Result<PathBuf, FileStoreError> {
    let plain = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if plain {
        Ok(PathBuf::from(name))
    } else {
        Err(FileStoreError::invalid_name(name))
    }
}

fn map_io(name: &str, err: &io::Error) -> FileStoreError {
    if err.kind() == io::ErrorKind::NotFound {
        FileStoreError::not_found(name)
    } else {
        FileStoreError::io(err.to_string())
    }
}

#[async_trait]
impl FileStore for CapFileStore {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, FileStoreError> {
        let name = self.generate_name(original_name);
        let path = checked_name(&name)?;
        let contents = bytes.to_vec();
        let written = name.clone();
        self.with_root(move |root| {
            root.write(&path, contents)
                .map_err(|err| map_io(&written, &err))
        })
        .await?;
        Ok(StoredFile {
            public_path: format!("{UPLOADS_PREFIX}{name}"),
            name,
        })
    }

    async fn open(&self, name: &str) -> Result<Vec<u8>, FileStoreError> {
        let path = checked_name(name)?;
        let owned = name.to_owned();
        self.with_root(move |root| root.read(&path).map_err(|err| map_io(&owned, &err)))
            .await
    }

    async fn remove(&self, name: &str) -> Result<(), FileStoreError> {
        let path = checked_name(name)?;
        let owned = name.to_owned();
        self.with_root(move |root| match root.remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(map_io(&owned, &err)),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::test_helpers::{fixture_clock, fixture_timestamp};
    use rstest::rstest;
    use tempfile::TempDir;

    fn store() -> (TempDir, CapFileStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CapFileStore::open(&dir.path().join("uploads"), fixture_clock())
            .expect("open store");
        (dir, store)
    }

    #[rstest]
    #[case("logo.PNG", ".png")]
    #[case("archive.tar.gz", ".gz")]
    #[case("README", "")]
    #[case("weird.p/g", "")]
    #[case("", "")]
    fn extensions_are_kept_when_plain(#[case] original: &str, #[case] expected: &str) {
        assert_eq!(extension_of(original), expected);
    }

    #[rstest]
    #[case("../secret")]
    #[case(".env")]
    #[case("a/b.png")]
    #[case("")]
    fn unsafe_names_are_rejected(#[case] name: &str) {
        assert!(matches!(
            checked_name(name),
            Err(FileStoreError::InvalidName { .. })
        ));
    }

    #[tokio::test]
    async fn stored_files_round_trip_and_are_removed() {
        let (_dir, store) = store();
        let stored = store.store("logo.png", b"png-bytes").await.expect("store");

        let prefix = format!("{}-", fixture_timestamp().timestamp_millis());
        assert!(stored.name.starts_with(&prefix), "{}", stored.name);
        assert!(stored.name.ends_with(".png"));
        assert_eq!(stored.name.len(), prefix.len() + SUFFIX_LEN + ".png".len());
        assert_eq!(stored.public_path, format!("/uploads/{}", stored.name));

        assert_eq!(store.open(&stored.name).await.expect("open"), b"png-bytes");
        store.remove(&stored.name).await.expect("remove");
        assert!(matches!(
            store.open(&stored.name).await,
            Err(FileStoreError::NotFound { .. })
        ));
        store.remove(&stored.name).await.expect("second remove is a no-op");
    }
}
