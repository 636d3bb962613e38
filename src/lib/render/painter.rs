//! Module implementing the painting of text boxes' text.
//!
//! Text is first rasterized into a coverage mask, from which
//! the layers prescribed by the font variant's `StyleSpec` are derived.
//! Layers are then drawn bottom to top: either onto the meme bitmap,
//! or onto a transparent sprite for the preview.

use std::convert::TryFrom;
use std::fmt;

use image::RgbaImage;

use crate::model::{Color, MemeColor, MemeTextStyle, Point};
use crate::resources::Font;
use super::mask::{composite, Mask};
use super::style::{PaintOp, StyleSpec, SHADOW_ALPHA};
use super::text;


/// Text of a single text box, painted & ready to be drawn.
pub struct PaintedText {
    layers: Vec<Layer>,
    /// Where the nominal top-left corner of the text lies within the layers.
    anchor: (i32, i32),
    width: u32,
    height: u32,
}

struct Layer {
    mask: Mask,
    color: Color,
    opacity: u8,
}

impl PaintedText {
    /// Paint text with given font & style.
    ///
    /// The font should be the one named by the style's `StyleSpec::typeface`.
    pub fn paint(font: &Font, s: &str, style: &MemeTextStyle) -> Self {
        let spec = StyleSpec::of(style.font);
        let ops = spec.ops_for_size(style.size);
        trace!("Painting {:?} with `{}` font, ops: {:?}", s, font.name(), ops);

        let layout = text::layout(font, s, style.size, spec.letter_spacing_for_size(style.size));
        let bounds = match layout.pixel_bounds() {
            Some(b) => b,
            None => {
                debug!("No visible glyphs in {:?}, nothing to paint", s);
                return PaintedText::empty();
            }
        };

        let pad = ops.iter().map(PaintOp::reach).fold(0.0, f32::max).ceil() as i32 + 1;
        let min_x = bounds.min.x.min(0);
        let min_y = bounds.min.y.min(0);
        let max_x = bounds.max.x.max(layout.width.ceil() as i32);
        let max_y = bounds.max.y.max(layout.height.ceil() as i32);
        let anchor = (pad - min_x, pad - min_y);

        let extent = |min: i32, max: i32| {
            u32::try_from(i64::from(max) - i64::from(min) + 2 * i64::from(pad)).ok()
        };
        let coverage = extent(min_x, max_x).zip(extent(min_y, max_y))
            .and_then(|(w, h)| Mask::try_new(w, h));
        let mut coverage = match coverage {
            Some(mask) => mask,
            None => {
                warn!("Text {:?} at size {} is too large to paint, skipping", s, style.size);
                return PaintedText::empty();
            }
        };
        for glyph in &layout.glyphs {
            if let Some(bbox) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, v| {
                    coverage.cover(anchor.0 + bbox.min.x + x as i32,
                                   anchor.1 + bbox.min.y + y as i32, v);
                });
            }
        }

        PaintedText::from_coverage(coverage, anchor, &ops, style.color)
    }

    /// Derive the paint layers from the glyph coverage mask.
    fn from_coverage(coverage: Mask, anchor: (i32, i32),
                     ops: &[PaintOp], color: MemeColor) -> Self {
        let (width, height) = (coverage.width(), coverage.height());
        let layers = ops.iter().map(|op| match *op {
            PaintOp::Fill =>
                Layer{mask: coverage.clone(), color: color.fill(), opacity: 0xff},
            PaintOp::Stroke{width} => Layer{
                mask: coverage.dilate(width).subtract(&coverage),
                color: color.fill(), opacity: 0xff,
            },
            PaintOp::Outline{width} =>
                Layer{mask: coverage.dilate(width), color: color.outline(), opacity: 0xff},
            PaintOp::Shadow{dx, dy, blur} => Layer{
                mask: coverage.shift(dx, dy).blur(blur),
                color: Color::black(), opacity: SHADOW_ALPHA,
            },
        }).collect();
        PaintedText{layers, anchor, width, height}
    }

    fn empty() -> Self {
        PaintedText{layers: vec![], anchor: (0, 0), width: 0, height: 0}
    }
}

impl PaintedText {
    /// Whether there is nothing to draw.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Size of the painted area, including room for outlines & shadows.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Draw the text onto an image, with its top-left corner at given point.
    pub fn draw_onto(&self, target: &mut RgbaImage, top_left: Point) {
        let origin = (top_left.x.round() as i32 - self.anchor.0,
                      top_left.y.round() as i32 - self.anchor.1);
        for layer in &self.layers {
            composite(target, &layer.mask, origin, layer.color, layer.opacity);
        }
    }

    /// Draw the text onto a new transparent image that fits it exactly.
    pub fn to_image(&self) -> RgbaImage {
        let mut sprite = RgbaImage::new(self.width.max(1), self.height.max(1));
        for layer in &self.layers {
            composite(&mut sprite, &layer.mask, (0, 0), layer.color, layer.opacity);
        }
        sprite
    }
}

impl fmt::Debug for PaintedText {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "PaintedText({}x{}, {} layer(s))", self.width, self.height, self.layers.len())
    }
}


#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use crate::model::{FontVariant, MemeColor, MemeTextStyle, Point, MAX_TEXT_SIZE};
    use crate::resources::{Font, TEST_FONT};
    use super::super::mask::Mask;
    use super::super::style::{StyleSpec, SHADOW_ALPHA};
    use super::PaintedText;

    fn font() -> Font {
        Font::from_bytes("mono", TEST_FONT.to_vec()).unwrap()
    }

    /// Coverage of a 4x4 square "glyph" in the middle of a 16x16 mask.
    fn square() -> Mask {
        let mut mask = Mask::new(16, 16);
        for y in 6..10 {
            for x in 6..10 {
                mask.cover(x, y, 1.0);
            }
        }
        mask
    }

    fn painted(font: FontVariant, color: MemeColor) -> PaintedText {
        let ops = StyleSpec::of(font).ops_for_size(32.0);
        PaintedText::from_coverage(square(), (6, 6), &ops, color)
    }

    #[test]
    fn impact_has_outline_beneath_fill() {
        let sprite = painted(FontVariant::Impact, MemeColor::White).to_image();
        assert_eq!(Rgba([0xff, 0xff, 0xff, 0xff]), *sprite.get_pixel(7, 7));
        assert_eq!(Rgba([0, 0, 0, 0xff]), *sprite.get_pixel(4, 7));
        assert_eq!(0, sprite.get_pixel(0, 0)[3]);
    }

    #[test]
    fn outline_color_is_paired() {
        let sprite = painted(FontVariant::Impact, MemeColor::Black).to_image();
        assert_eq!(Rgba([0xff, 0xff, 0xff, 0xff]), *sprite.get_pixel(4, 7));
    }

    #[test]
    fn stroke_leaves_glyphs_hollow() {
        let sprite = painted(FontVariant::ImpactStroke, MemeColor::Yellow).to_image();
        assert_eq!(0, sprite.get_pixel(7, 7)[3]);
        assert_eq!(0xff, sprite.get_pixel(5, 7)[3]);
    }

    #[test]
    fn shadow_is_translucent_and_offset() {
        let sprite = painted(FontVariant::Shadow, MemeColor::White).to_image();
        // Below & to the right of the glyph, only the shadow is visible.
        let px = sprite.get_pixel(11, 11);
        assert!(px[3] > 0 && px[3] <= SHADOW_ALPHA);
        assert!(px[0] < 0x80);
        // Above & to the left, nothing is.
        assert_eq!(0, sprite.get_pixel(1, 1)[3]);
    }

    #[test]
    fn draw_onto_honors_anchor() {
        let text = painted(FontVariant::Bold, MemeColor::Red);
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0xff]));
        text.draw_onto(&mut img, Point::new(10.0, 2.0));
        assert_eq!(Rgba([0xf4, 0x43, 0x36, 0xff]), *img.get_pixel(10, 2));
        assert_eq!(Rgba([0, 0, 0, 0xff]), *img.get_pixel(9, 2));
    }

    #[test]
    fn every_variant_draws_something() {
        for font in FontVariant::iter_variants() {
            let text = painted(font, MemeColor::Green);
            assert!(!text.is_empty());
            let sprite = text.to_image();
            assert!(sprite.pixels().any(|p| p[3] > 0), "{:?} drew nothing", font);
        }
    }

    #[test]
    fn paint_real_glyphs() {
        let style = MemeTextStyle::default().with_font(FontVariant::Bold);
        let text = PaintedText::paint(&font(), "Hi", &style);
        assert!(!text.is_empty());
        let sprite = text.to_image();
        assert!(sprite.pixels().any(|p| *p == Rgba([0xff, 0xff, 0xff, 0xff])));
        assert!(sprite.pixels().any(|p| p[3] == 0));
    }

    #[test]
    fn spaced_variant_is_wider() {
        // Outline & SpacedStroke only differ in letter spacing.
        let font = font();
        let style = MemeTextStyle::default().with_size(32.0);
        let plain = PaintedText::paint(&font, "abcd", &style.with_font(FontVariant::Outline));
        let spaced = PaintedText::paint(&font, "abcd", &style.with_font(FontVariant::SpacedStroke));
        let spacing = StyleSpec::of(FontVariant::SpacedStroke).letter_spacing_for_size(32.0);

        let (plain_w, plain_h) = plain.dimensions();
        let (spaced_w, spaced_h) = spaced.dimensions();
        assert_eq!(plain_h, spaced_h);
        let extra = spaced_w as f32 - plain_w as f32;
        assert!((extra - 3.0 * spacing).abs() <= 2.0, "{} vs {}", extra, 3.0 * spacing);
    }

    #[test]
    fn whitespace_paints_nothing() {
        let text = PaintedText::paint(&font(), "   ", &MemeTextStyle::default());
        assert!(text.is_empty());
        assert_eq!(1, text.to_image().width());
    }

    #[test]
    fn oversized_text_is_skipped() {
        let style = MemeTextStyle::default().with_font(FontVariant::Bold).with_size(MAX_TEXT_SIZE);
        let text = PaintedText::paint(&font(), &"W".repeat(1000), &style);
        assert!(text.is_empty());
    }
}
