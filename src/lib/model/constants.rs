//! Module defining constants relevant to the data model.

use super::types::{FontVariant, MemeColor};


/// Font variant of newly created text boxes.
pub const DEFAULT_FONT: FontVariant = FontVariant::Impact;

/// Color of newly created text boxes.
/// Its outline color comes from the fixed pairing in `MemeColor::outline`.
pub const DEFAULT_COLOR: MemeColor = MemeColor::White;

/// Font size of newly created text boxes (in logical pixels).
pub const DEFAULT_TEXT_SIZE: f32 = 32.0;
/// Smallest font size a text box can have.
pub const MIN_TEXT_SIZE: f32 = 8.0;
/// Largest font size a text box can have.
pub const MAX_TEXT_SIZE: f32 = 200.0;

/// Text that a freshly added text box starts with.
pub const DEFAULT_TEXT_BOX_TEXT: &str = "Tap to edit";


/// Maximum number of text boxes in a single meme.
pub const MAX_TEXT_BOXES: usize = 32;

/// Maximum length (in Unicode codepoints) of a single text box.
pub const MAX_TEXT_LENGTH: usize = 256;

/// Maximum width of the rendered bitmap.
pub const MAX_OUTPUT_WIDTH: u32 = 4096;
/// Maximum height of the rendered bitmap.
pub const MAX_OUTPUT_HEIGHT: u32 = 4096;


/// How many candidate positions are tried when placing a new text box.
pub const PLACEMENT_ATTEMPTS: usize = 20;
/// Diagonal step between consecutive placement candidates (in logical pixels).
pub const PLACEMENT_STEP: f32 = 20.0;
