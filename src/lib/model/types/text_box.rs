//! Module implementing the `TextBox` type and its style.

use std::fmt;

use crate::model::constants::{DEFAULT_COLOR, DEFAULT_FONT, DEFAULT_TEXT_SIZE,
                              MAX_TEXT_SIZE, MIN_TEXT_SIZE};
use super::color::MemeColor;
use super::font::FontVariant;
use super::geometry::{Point, Size};


/// Identifier of a text box, unique within a single editing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
         Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextBoxId(pub u32);

impl fmt::Display for TextBoxId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "#{}", self.0)
    }
}


/// Style of the text within a text box.
///
/// This is an immutable value: changing any part of the style
/// means replacing it with a new one (see the `with_*` methods).
/// The size is always within `MIN_TEXT_SIZE..=MAX_TEXT_SIZE`, deserialized ones included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StyleRepr")]
pub struct MemeTextStyle {
    /// Stylistic variant (typeface & paint operations).
    pub font: FontVariant,
    /// Fill color; the outline color is paired with it.
    pub color: MemeColor,
    /// Font size in logical pixels.
    pub size: f32,
}

impl MemeTextStyle {
    #[inline]
    pub fn new(font: FontVariant, color: MemeColor, size: f32) -> Self {
        MemeTextStyle{font, color, size: clamp_size(size)}
    }

    #[inline]
    pub fn with_font(self, font: FontVariant) -> Self {
        MemeTextStyle{font, ..self}
    }

    #[inline]
    pub fn with_color(self, color: MemeColor) -> Self {
        MemeTextStyle{color, ..self}
    }

    #[inline]
    pub fn with_size(self, size: f32) -> Self {
        MemeTextStyle{size: clamp_size(size), ..self}
    }
}

impl Default for MemeTextStyle {
    fn default() -> Self {
        MemeTextStyle::new(DEFAULT_FONT, DEFAULT_COLOR, DEFAULT_TEXT_SIZE)
    }
}

/// `MemeTextStyle` as it comes from serialized data, with unchecked size.
#[derive(Deserialize)]
#[serde(default)]
struct StyleRepr {
    font: FontVariant,
    color: MemeColor,
    size: f32,
}

impl Default for StyleRepr {
    fn default() -> Self {
        StyleRepr{font: DEFAULT_FONT, color: DEFAULT_COLOR, size: DEFAULT_TEXT_SIZE}
    }
}

impl From<StyleRepr> for MemeTextStyle {
    fn from(repr: StyleRepr) -> Self {
        MemeTextStyle::new(repr.font, repr.color, repr.size)
    }
}

fn clamp_size(size: f32) -> f32 {
    if size.is_nan() {
        return DEFAULT_TEXT_SIZE;
    }
    size.max(MIN_TEXT_SIZE).min(MAX_TEXT_SIZE)
}


/// Editable text overlay, positioned in screen space until the meme is rendered.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub id: TextBoxId,
    pub text: String,
    /// Top-left corner of the box, relative to the on-screen container.
    pub position: Point,
    #[serde(default)]
    pub style: MemeTextStyle,
}

impl TextBox {
    #[inline]
    pub fn new<S: Into<String>>(id: TextBoxId, text: S, position: Point,
                                style: MemeTextStyle) -> Self {
        TextBox{id, text: text.into(), position, style}
    }

    /// Rough size of the box, estimated from character count & font size.
    ///
    /// This is not based on actual font metrics and is only good enough
    /// for placement heuristics.
    pub fn estimated_size(&self) -> Size {
        let size = self.style.size;
        let lines = self.text.lines().count().max(1);
        let longest = self.text.lines()
            .map(|l| l.chars().count())
            .max().unwrap_or(0).max(1);
        Size::new(longest as f32 * size * 0.6, lines as f32 * size * 1.2)
    }
}

impl fmt::Debug for TextBox {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{id}@{pos:?}{{{font:?} {color:?} {size}}}({text:?})",
            id = self.id,
            pos = self.position,
            font = self.style.font,
            color = self.style.color,
            size = self.style.size,
            text = self.text)
    }
}
