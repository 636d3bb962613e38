//! Studio error.

use thiserror::Error;

use crate::model::MemeId;
use crate::render::{EngineBuildError, RenderError};
use crate::resources::ResourceError;
use crate::storage::{FilesError, StoreError};


/// Error that may occur while performing a studio operation.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Rendering the meme failed.
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
    /// Managing the meme files failed.
    #[error("file operation failed: {0}")]
    Files(#[from] FilesError),
    /// Accessing the store of saved memes failed.
    #[error("meme store operation failed: {0}")]
    Store(#[from] StoreError),
    /// Listing the available resources failed.
    #[error("cannot list resources: {0}")]
    Resource(#[from] ResourceError),
    /// The studio couldn't be set up.
    #[error("cannot set up the rendering engine: {0}")]
    Setup(#[from] EngineBuildError),
    /// There is no saved meme with given id.
    #[error("no saved meme with id {0}")]
    NoSuchMeme(MemeId),
}

impl StudioError {
    /// Short failure message that can be shown to the user.
    pub fn user_message(&self) -> &'static str {
        match *self {
            StudioError::Render(RenderError::Io(_)) |
            StudioError::Render(RenderError::Encode(_)) => "Could not save meme",
            StudioError::Render(_) => "Could not render meme",
            StudioError::Files(_) => "Could not access meme files",
            StudioError::Resource(_) => "Could not load meme templates",
            StudioError::Store(StoreError::NotFound(_)) |
            StudioError::NoSuchMeme(_) => "Meme not found",
            StudioError::Store(_) => "Could not update saved memes",
            StudioError::Setup(_) => "Could not start the meme studio",
        }
    }
}
