//! Module computing the output bitmap dimensions
//! and mapping text box positions from screen space into bitmap space.

use std::fmt;

use crate::model::{Point, Size, MAX_OUTPUT_HEIGHT, MAX_OUTPUT_WIDTH};
use super::error::RenderError;


/// Geometry of a single render: size of the output bitmap
/// and the letterboxing of the background image within the on-screen container.
///
/// Only vertical letterboxing is accounted for.
#[derive(Clone, Copy, PartialEq)]
pub struct MemeDimensions {
    /// Width of the output bitmap.
    pub width: u32,
    /// Height of the output bitmap.
    pub height: u32,
    /// Vertical offset of the visible image within the container.
    pub offset_y: f32,
    /// Height of the visible (not letterboxed) part of the container.
    pub visible_height: f32,
}

impl MemeDimensions {
    /// Compute the dimensions for a background of given aspect ratio
    /// shown in an on-screen container of given size.
    ///
    /// The bitmap is as wide as the container and has the true aspect ratio
    /// of the background, regardless of how it's cropped on screen.
    pub fn compute(container: Size, background_aspect: f32) -> Result<Self, RenderError> {
        if container.is_empty() || !container.width.is_finite() || !container.height.is_finite()
            || !(background_aspect > 0.0) || !background_aspect.is_finite() {
            return Err(RenderError::InvalidDimensions(container, background_aspect));
        }

        let width = container.width;
        let height = container.width / background_aspect;
        if width.round() > MAX_OUTPUT_WIDTH as f32 || height.round() > MAX_OUTPUT_HEIGHT as f32 {
            return Err(RenderError::TooLarge(width.round() as u32, height.round() as u32));
        }

        let container_aspect = container.aspect_ratio();
        let (offset_y, visible_height) = if background_aspect < container_aspect {
            // The image is taller relative to the container, so it's shown
            // vertically centered in a band of the container.
            let visible_height = container.height * background_aspect / container_aspect;
            ((container.height - visible_height) / 2.0, visible_height)
        } else {
            (0.0, height)
        };

        let dims = MemeDimensions{
            width: (width.round() as u32).max(1),
            height: (height.round() as u32).max(1),
            offset_y,
            visible_height,
        };
        trace!("Dimensions for {:?} container & {} background aspect: {:?}",
            container, background_aspect, dims);
        Ok(dims)
    }

    /// Whether the image is letterboxed within its container.
    #[inline]
    pub fn is_letterboxed(&self) -> bool {
        self.offset_y > 0.0
    }

    /// The size of the output bitmap.
    #[inline]
    pub fn size(&self) -> Size {
        Size::from((self.width, self.height))
    }

    /// Map a screen space position (relative to the container) into bitmap space.
    ///
    /// The X coordinate is left intact.
    pub fn remap(&self, position: Point) -> Point {
        let mut y = position.y - self.offset_y;
        if self.is_letterboxed() {
            y *= self.height as f32 / self.visible_height;
        }
        Point::new(position.x, y)
    }
}

impl fmt::Debug for MemeDimensions {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}x{}", self.width, self.height)?;
        if self.is_letterboxed() {
            write!(fmt, " (visible {} from y={})", self.visible_height, self.offset_y)?;
        }
        Ok(())
    }
}
