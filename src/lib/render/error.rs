//! Rendering error.

use std::io;

use image::ImageError;
use thiserror::Error;

use crate::model::{Size, TemplateId, MAX_OUTPUT_HEIGHT, MAX_OUTPUT_WIDTH};
use crate::resources::ResourceError;


/// Error that may occur while rendering a meme.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The background template couldn't be loaded.
    #[error("cannot load template `{0}`: {1}")]
    Template(TemplateId, #[source] ResourceError),
    /// A font needed by one of the text boxes couldn't be loaded.
    #[error("cannot load font `{0}`: {1}")]
    Font(String, #[source] ResourceError),
    /// Container size or background aspect ratio make no sense.
    #[error("invalid render dimensions: container {0:?}, background aspect {1}")]
    InvalidDimensions(Size, f32),
    /// Requested bitmap would be too large.
    #[error("output bitmap too large: {0}x{1} > {}x{}", MAX_OUTPUT_WIDTH, MAX_OUTPUT_HEIGHT)]
    TooLarge(u32, u32),
    /// Failed to encode the final image.
    #[error("failed to encode the final image: {0}")]
    Encode(#[source] ImageError),
    /// Failed to write the final image.
    #[error("failed to write the final image: {0}")]
    Io(#[from] io::Error),
}
