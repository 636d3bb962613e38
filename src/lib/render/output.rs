//! Defines the output of a rendering operation.

use std::fs;
use std::io::Write;
use std::path::Path;

use image::{ColorType, DynamicImage, RgbaImage};
use image::codecs::jpeg::JpegEncoder;

use super::dimensions::MemeDimensions;
use super::error::RenderError;


/// Output of the rendering process: the final meme bitmap.
#[derive(Clone)]
#[must_use = "unused render output which must be used"]
pub struct MemeOutput {
    image: RgbaImage,
    dimensions: MemeDimensions,
}

impl MemeOutput {
    #[inline]
    pub(super) fn new(image: RgbaImage, dimensions: MemeDimensions) -> Self {
        MemeOutput{image, dimensions}
    }
}

impl MemeOutput {
    /// The rendered bitmap.
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Geometry the meme was rendered with.
    #[inline]
    pub fn dimensions(&self) -> &MemeDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the bitmap as JPEG of given quality (in %).
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>, RenderError> {
        encode_jpeg(&self.image, quality)
    }

    /// Encode the bitmap as JPEG of given quality and write it to a file.
    ///
    /// The output is consumed, so the bitmap is freed as soon as it's encoded.
    pub fn write_jpeg<P: AsRef<Path>>(self, path: P, quality: u8) -> Result<(), RenderError> {
        let path = path.as_ref();
        let bytes = self.to_jpeg(quality)?;
        drop(self);

        trace!("Writing {} byte(s) to {}", bytes.len(), path.display());
        let mut file = fs::File::create(path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }
}

impl std::fmt::Debug for MemeOutput {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "MemeOutput({:?})", self.dimensions)
    }
}


/// Encode an RGBA image as JPEG of given quality (in %).
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, RenderError> {
    let (width, height) = image.dimensions();
    debug!("Encoding {}x{} image as JPEG with quality {}", width, height, quality);

    let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
    let mut result = vec![];
    JpegEncoder::new_with_quality(&mut result, quality)
        .encode(&rgb, width, height, ColorType::Rgb8)
        .map_err(|e| match e {
            image::ImageError::IoError(e) => RenderError::Io(e),
            e => RenderError::Encode(e),
        })?;
    trace!("Encoded JPEG is {} byte(s) long", result.len());
    Ok(result)
}
