//! Editing error.

use thiserror::Error;

use crate::model::{TextBoxId, MAX_TEXT_BOXES, MAX_TEXT_LENGTH};


/// Error that may occur while editing the text boxes of a meme.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    /// No text box with given id in the session.
    #[error("no such text box: {0}")]
    NoSuchTextBox(TextBoxId),
    /// Too many text boxes in the session.
    #[error("too many text boxes: cannot have more than {}", MAX_TEXT_BOXES)]
    TooManyTextBoxes,
    /// Text of a box is too long.
    #[error("text too long: {0} > {}", MAX_TEXT_LENGTH)]
    TextTooLong(usize),
}
