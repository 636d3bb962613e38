//! Module implementing coverage masks that text layers are painted from.

use std::fmt;

use image::{imageops, GrayImage, Luma, Rgba, RgbaImage};

use crate::model::{Color, MAX_OUTPUT_HEIGHT, MAX_OUTPUT_WIDTH};


/// Largest number of points in a mask: that of the largest meme bitmap.
pub const MAX_AREA: usize = MAX_OUTPUT_WIDTH as usize * MAX_OUTPUT_HEIGHT as usize;


/// Grayscale coverage map, with values in the [0.0, 1.0] range.
#[derive(Clone, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Mask {
    /// Create an empty (fully transparent) mask of given size.
    ///
    /// Panics if the mask would be larger than `MAX_AREA`.
    pub fn new(width: u32, height: u32) -> Self {
        match Mask::try_new(width, height) {
            Some(mask) => mask,
            None => panic!("mask of {}x{} exceeds {} points", width, height, MAX_AREA),
        }
    }

    /// Create an empty mask of given size, unless it would be larger than `MAX_AREA`.
    pub fn try_new(width: u32, height: u32) -> Option<Self> {
        let len = (width as usize).checked_mul(height as usize)?;
        if len > MAX_AREA {
            return None;
        }
        Some(Mask{width, height, data: vec![0.0; len]})
    }

    #[inline]
    pub fn width(&self) -> u32 { self.width }
    #[inline]
    pub fn height(&self) -> u32 { self.height }

    /// Coverage at given point. Anything outside of the mask is uncovered.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0.0;
        }
        self.data[self.index(x, y)]
    }

    /// Cover given point at least as much as specified.
    #[inline]
    pub fn cover(&mut self, x: i32, y: i32, value: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = self.index(x, y);
        self.data[i] = self.data[i].max(value.max(0.0).min(1.0));
    }

    /// Position of an (in-bounds) point in the data vector.
    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Whether nothing at all is covered.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v <= 0.0)
    }

    /// Total coverage of all the points.
    pub fn total(&self) -> f32 {
        self.data.iter().sum()
    }
}

// Morphological & filtering operations.
impl Mask {
    /// Grow the covered area by given radius (in pixels) in every direction.
    pub fn dilate(&self, radius: f32) -> Mask {
        let r = radius.round() as i32;
        if r <= 0 {
            return self.clone();
        }
        let offsets: Vec<(i32, i32)> = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx * dx + dy * dy <= r * r)
            .collect();

        let mut result = Mask::new(self.width, self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let v = offsets.iter()
                    .map(|&(dx, dy)| self.get(x + dx, y + dy))
                    .fold(0.0, f32::max);
                result.cover(x, y, v);
            }
        }
        result
    }

    /// Remove the coverage of other mask from this one.
    pub fn subtract(&self, other: &Mask) -> Mask {
        let mut result = self.clone();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let i = self.index(x, y);
                result.data[i] = (self.data[i] - other.get(x, y)).max(0.0);
            }
        }
        result
    }

    /// Move the covered area by given (rounded) offset. Whatever ends up outside is lost.
    pub fn shift(&self, dx: f32, dy: f32) -> Mask {
        let (dx, dy) = (dx.round() as i32, dy.round() as i32);
        let mut result = Mask::new(self.width, self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                result.cover(x, y, self.get(x - dx, y - dy));
            }
        }
        result
    }

    /// Gaussian blur of the mask with given sigma.
    pub fn blur(&self, sigma: f32) -> Mask {
        if sigma <= 0.0 || self.width == 0 || self.height == 0 {
            return self.clone();
        }
        let blurred = imageops::blur(&self.to_gray_image(), sigma);
        Mask::from(&blurred)
    }

    fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([(self.get(x as i32, y as i32) * 255.0).round() as u8])
        })
    }
}

impl<'i> From<&'i GrayImage> for Mask {
    fn from(image: &'i GrayImage) -> Self {
        Mask{
            width: image.width(),
            height: image.height(),
            data: image.pixels().map(|p| p[0] as f32 / 255.0).collect(),
        }
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Mask({}x{}, total={})", self.width, self.height, self.total())
    }
}


/// Blend the mask onto an image in given color,
/// with the mask's top-left corner at given image coordinates.
///
/// `opacity` scales the resulting alpha of the color.
/// Parts of the mask falling outside of the image are clipped.
pub fn composite(target: &mut RgbaImage, mask: &Mask, origin: (i32, i32),
                 color: Color, opacity: u8) {
    let (ox, oy) = origin;
    let (width, height) = target.dimensions();
    for my in 0..mask.height() as i32 {
        let y = oy + my;
        if y < 0 || y >= height as i32 {
            continue;
        }
        for mx in 0..mask.width() as i32 {
            let x = ox + mx;
            if x < 0 || x >= width as i32 {
                continue;
            }
            let v = mask.get(mx, my);
            if v <= 0.0 {
                continue;
            }
            let alpha = (v * opacity as f32).round() as u8;
            let src: Rgba<u8> = color.to_rgba(alpha);
            let dst = target.get_pixel_mut(x as u32, y as u32);
            *dst = source_over(*dst, src);
        }
    }
}

/// Porter-Duff "over" of a (non-premultiplied) source pixel onto a destination one.
/// Opaque destinations stay opaque.
fn source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |i: usize| {
        let (s, d) = (src[i] as f32, dst[i] as f32);
        ((s * sa + d * da * (1.0 - sa)) / out_a).round().max(0.0).min(255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}
