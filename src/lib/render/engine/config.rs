//! Module with rendering engine configuration.


/// Default quality of saved memes' JPEG images (in %).
pub const DEFAULT_JPEG_QUALITY: u8 = 85;
/// Default quality of captured memes' JPEG images (in %).
pub const DEFAULT_CAPTURE_QUALITY: u8 = 100;


/// Structure holding configuration for the `Engine`.
///
/// This is shared with `RenderTask`s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Quality of the JPEG images of saved memes (in %).
    pub jpeg_quality: u8,
    /// Quality of the JPEG images of memes captured for sharing (in %).
    pub capture_quality: u8,
}

impl Default for Config {
    /// Initialize Config with default values.
    fn default() -> Self {
        Config {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            capture_quality: DEFAULT_CAPTURE_QUALITY,
        }
    }
}
