//! Module defining the model types.

mod color;
mod font;
mod geometry;
mod meme;
mod text_box;

pub use self::color::{Color, MemeColor, MemeColors};
pub use self::font::{FontVariant, FontVariants};
pub use self::geometry::{Point, Size};
pub use self::meme::{ImageMeme, MemeId, MemeItem, TemplateId};
pub use self::text_box::{MemeTextStyle, TextBox, TextBoxId};
