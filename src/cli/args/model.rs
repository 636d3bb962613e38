//! Data structures for command-line arguments.

use std::path::PathBuf;

use lolz::{MemeId, SortOrder};
use thiserror::Error;


/// Structure to hold options received from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Verbosity of the logging output.
    ///
    /// Corresponds to the number of times the -v flag has been passed.
    /// If -q has been used instead, this will be negative.
    pub verbosity: isize,

    /// Directory where the app keeps its files & the saved memes.
    pub data_dir: PathBuf,
    /// Directory with the bundled templates to install.
    pub assets_dir: PathBuf,
    /// Directory to load the fonts from.
    pub fonts_dir: PathBuf,

    /// What to actually do.
    pub command: Command,
}

impl Options {
    #[inline]
    pub fn quiet(&self) -> bool { self.verbosity < 0 }
}


/// Subcommand given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Render a meme draft into a JPEG file without saving it.
    Render {
        draft: PathBuf,
        /// If absent, the image shall be written to standard output.
        output_path: Option<PathBuf>,
        quality: Option<u8>,
    },
    /// Render a meme draft and keep it among the saved memes.
    Save {
        draft: PathBuf,
        description: String,
    },
    /// List the saved memes.
    List {
        order: SortOrder,
        json: bool,
    },
    /// Toggle the "favorite" flag of a saved meme.
    Favorite { id: MemeId },
    /// Delete saved memes.
    Delete { ids: Vec<MemeId> },
    /// Print the URI to share a saved meme with.
    Share { id: MemeId },
    /// List the available templates.
    Templates,
}


/// Error that can occur while parsing of command line arguments.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// General when parsing the arguments.
    #[error("invalid arguments: {0}")]
    Parse(#[from] clap::Error),
    /// Meme id that's not a number.
    #[error("invalid meme id `{0}`")]
    MemeId(String),
    /// Unknown sort order of the list.
    #[error("{0}")]
    SortOrder(String),
    /// JPEG quality out of range.
    #[error("invalid JPEG quality `{0}` (must be between 1 and 100)")]
    Quality(String),
}
