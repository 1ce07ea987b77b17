//! Port for uploaded file storage.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by file stores.
    pub enum FileStoreError {
        /// The requested name is not a plain file name.
        InvalidName { name: String } => "invalid upload name: {name}",
        /// No file has the requested name.
        NotFound { name: String } => "upload {name} not found",
        /// Filesystem failure.
        Io { message: String } => "upload store failure: {message}",
    }
}

/// A stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated file name.
    pub name: String,
    /// Public path under `/uploads/`.
    pub public_path: String,
}

/// Port for storing uploads by generated name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes`, keeping the extension of `original_name`.
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, FileStoreError>;

    /// Read a stored file.
    async fn open(&self, name: &str) -> Result<Vec<u8>, FileStoreError>;

    /// Remove a stored file; missing files are not an error.
    async fn remove(&self, name: &str) -> Result<(), FileStoreError>;
}
