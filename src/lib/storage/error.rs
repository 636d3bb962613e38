//! Storage errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::MemeId;
use crate::render::RenderError;


/// Error that may occur while accessing the store of saved memes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No saved meme has given id.
    #[error("no saved meme with id {0}")]
    NotFound(MemeId),
    /// Memes can only be stored with non-negative ids.
    #[error("invalid meme id {0}")]
    InvalidId(MemeId),
    /// Failed to read or write the store's backing file.
    #[error("I/O error on meme store file {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: io::Error },
    /// The store's backing file is malformed.
    #[error("malformed meme store file {}: {source}", path.display())]
    Json { path: PathBuf, #[source] source: serde_json::Error },
}


/// Error that may occur while managing the app's files.
#[derive(Debug, Error)]
pub enum FilesError {
    /// Failed to perform a filesystem operation on given path.
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: io::Error },
    /// Failed to encode an image to be written.
    #[error("cannot encode image: {0}")]
    Encode(#[source] RenderError),
}

impl FilesError {
    #[inline]
    pub(super) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| FilesError::Io{path, source}
    }
}
