//! Resource loading error.

use std::io;
use std::path::PathBuf;

use image::ImageError;
use thiserror::Error;


/// Error that may occur while loading a template, font, or other resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No file matches the resource name.
    #[error("resource `{0}` not found in {}", .1.display())]
    NotFound(String, PathBuf),
    /// More than one file matches the resource name.
    #[error("ambiguous resource name `{0}` matching {1} files in {}", .2.display())]
    Ambiguous(String, usize, PathBuf),
    /// Resource directory couldn't be searched.
    #[error("invalid resource pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// Error while reading the resource's file.
    #[error("cannot read resource: {0}")]
    Io(#[from] io::Error),
    /// Image file of a template couldn't be decoded.
    #[error("cannot decode image: {0}")]
    Image(#[from] ImageError),
    /// Font file couldn't be parsed.
    #[error("invalid font file for `{0}`")]
    Font(String),
    /// Any other error, e.g. from custom loaders.
    #[error("{0}")]
    Other(String),
}
