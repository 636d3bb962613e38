//! Module implementing the rendering of memes.

mod dimensions;
mod engine;
mod error;
mod mask;
mod output;
mod painter;
mod style;
mod task;
mod text;


pub use self::dimensions::MemeDimensions;
pub use self::engine::{Builder as EngineBuilder,
                       BuildError as EngineBuildError,
                       Config as EngineConfig,
                       Engine,
                       DEFAULT_CAPTURE_QUALITY, DEFAULT_JPEG_QUALITY};
pub use self::error::RenderError;
pub use self::mask::Mask;
pub use self::output::{encode_jpeg, MemeOutput};
pub use self::painter::PaintedText;
pub use self::style::{PaintOp, StyleSpec, REFERENCE_TEXT_SIZE, SHADOW_ALPHA};
pub use self::text::check as check_glyphs;
