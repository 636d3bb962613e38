//! Module implementing the color types.

#![allow(missing_docs)]  // Because IterVariants! produces undocumented methods.

use std::fmt;

use image::Rgba;


/// RGB color used when painting text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Create a white color.
    #[inline]
    pub fn white() -> Self {
        Self::gray(0xff)
    }

    /// Create a black color.
    #[inline]
    pub fn black() -> Self {
        Self::gray(0x00)
    }

    /// Create a gray color of given intensity.
    #[inline]
    pub fn gray(value: u8) -> Self {
        Color(value, value, value)
    }
}

impl Color {
    #[inline]
    pub(crate) fn to_rgba(&self, alpha: u8) -> Rgba<u8> {
        let &Color(r, g, b) = self;
        Rgba([r, g, b, alpha])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let &Color(r, g, b) = self;
        write!(fmt, "#{:0>2x}{:0>2x}{:0>2x}", r, g, b)
    }
}


macro_attr! {
    /// Fill color of a text box, as offered by the editor's color picker.
    ///
    /// Every member comes with a fixed outline color, see `MemeColor::outline`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash,
             Serialize, Deserialize, IterVariants!(MemeColors))]
    #[serde(rename_all = "snake_case")]
    pub enum MemeColor {
        White,
        Black,
        Yellow,
        Red,
        Blue,
        Green,
        Orange,
        Purple,
        Pink,
    }
}

impl MemeColor {
    /// The color the text is filled with.
    pub fn fill(self) -> Color {
        match self {
            MemeColor::White => Color::white(),
            MemeColor::Black => Color::black(),
            MemeColor::Yellow => Color(0xff, 0xeb, 0x3b),
            MemeColor::Red => Color(0xf4, 0x43, 0x36),
            MemeColor::Blue => Color(0x21, 0x96, 0xf3),
            MemeColor::Green => Color(0x4c, 0xaf, 0x50),
            MemeColor::Orange => Color(0xff, 0x98, 0x00),
            MemeColor::Purple => Color(0x9c, 0x27, 0xb0),
            MemeColor::Pink => Color(0xe9, 0x1e, 0x63),
        }
    }

    /// The color of the outline (or stroke) drawn around the text.
    ///
    /// This is a hardcoded pairing rather than anything derived from luminance.
    pub fn outline(self) -> Color {
        match self {
            MemeColor::White | MemeColor::Yellow | MemeColor::Green |
            MemeColor::Orange | MemeColor::Pink => Color::black(),
            MemeColor::Black | MemeColor::Red | MemeColor::Blue |
            MemeColor::Purple => Color::white(),
        }
    }
}

impl Default for MemeColor {
    fn default() -> Self {
        super::super::constants::DEFAULT_COLOR
    }
}
