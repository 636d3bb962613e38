//! Module mapping font variants to the way their text is painted.
//!
//! Both the preview and the final render read from this one table.

use crate::model::FontVariant;


/// Size at which the widths and offsets in the style table apply verbatim.
/// For other sizes they are scaled proportionally.
pub const REFERENCE_TEXT_SIZE: f32 = 32.0;

/// Opacity of the shadow drawn beneath the text.
pub const SHADOW_ALPHA: u8 = 160;


/// Single operation used to paint a piece of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintOp {
    /// Glyph coverage filled with the text color.
    Fill,
    /// Hollow stroke of given width around the glyphs, in the text color.
    Stroke { width: f32 },
    /// Solid outline of given width beneath the glyphs, in the outline color.
    Outline { width: f32 },
    /// Translucent black copy of the glyphs, offset and blurred.
    Shadow { dx: f32, dy: f32, blur: f32 },
}

impl PaintOp {
    /// Scale the op's widths & offsets by given factor.
    pub fn scaled(self, factor: f32) -> PaintOp {
        match self {
            PaintOp::Fill => PaintOp::Fill,
            PaintOp::Stroke{width} => PaintOp::Stroke{width: width * factor},
            PaintOp::Outline{width} => PaintOp::Outline{width: width * factor},
            PaintOp::Shadow{dx, dy, blur} =>
                PaintOp::Shadow{dx: dx * factor, dy: dy * factor, blur: blur * factor},
        }
    }

    /// How far (in pixels) this op can paint beyond the glyphs themselves.
    pub fn reach(&self) -> f32 {
        match *self {
            PaintOp::Fill => 0.0,
            PaintOp::Stroke{width} | PaintOp::Outline{width} => width,
            PaintOp::Shadow{dx, dy, blur} => dx.abs().max(dy.abs()) + 3.0 * blur,
        }
    }
}


/// How the text of a particular `FontVariant` is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleSpec {
    /// Name of the font resource to use.
    pub typeface: &'static str,
    /// Extra space between letters, as a fraction of the font size.
    pub letter_spacing: f32,
    /// Operations to paint, bottom to top.
    pub ops: &'static [PaintOp],
}

impl StyleSpec {
    /// Look up the painting style for given font variant.
    pub fn of(font: FontVariant) -> StyleSpec {
        use self::PaintOp::*;
        macro_rules! spec {
            ($typeface:expr, $spacing:expr, [$($op:expr),+]) => {
                StyleSpec{typeface: $typeface, letter_spacing: $spacing, ops: &[$($op),+]}
            };
        }
        match font {
            FontVariant::Impact => spec!("impact", 0.0, [Outline{width: 3.0}, Fill]),
            FontVariant::ImpactStroke => spec!("impact", 0.0, [Stroke{width: 3.0}]),
            FontVariant::Classic =>
                spec!("anton", 0.0, [Shadow{dx: 2.0, dy: 2.0, blur: 1.5}, Fill]),
            FontVariant::Bold => spec!("roboto-bold", 0.0, [Fill]),
            FontVariant::Light => spec!("roboto", 0.0, [Fill]),
            FontVariant::Outline => spec!("roboto-bold", 0.0, [Stroke{width: 2.0}]),
            FontVariant::Shadow =>
                spec!("roboto-bold", 0.0, [Shadow{dx: 4.0, dy: 4.0, blur: 3.0}, Fill]),
            FontVariant::Spaced => spec!("impact", 0.15, [Outline{width: 2.0}, Fill]),
            FontVariant::SpacedStroke => spec!("roboto-bold", 0.15, [Stroke{width: 2.0}]),
        }
    }

    /// Paint operations with their widths & offsets adjusted to given text size.
    pub fn ops_for_size(&self, size: f32) -> Vec<PaintOp> {
        let factor = size / REFERENCE_TEXT_SIZE;
        self.ops.iter().map(|op| op.scaled(factor)).collect()
    }

    /// Letter spacing in pixels for given text size.
    #[inline]
    pub fn letter_spacing_for_size(&self, size: f32) -> f32 {
        self.letter_spacing * size
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::model::FontVariant;
    use super::{PaintOp, StyleSpec};

    #[test]
    fn every_variant_paints_something_visible() {
        for font in FontVariant::iter_variants() {
            let spec = StyleSpec::of(font);
            assert!(spec.ops.iter().any(|op| match *op {
                PaintOp::Fill | PaintOp::Stroke{..} => true,
                _ => false,
            }), "{:?} has no visible glyph op", font);
        }
    }

    #[test]
    fn variants_are_distinct() {
        let specs: HashSet<_> = FontVariant::iter_variants()
            .map(|f| format!("{:?}", StyleSpec::of(f)))
            .collect();
        assert_eq!(9, specs.len());
    }

    #[test]
    fn fill_is_painted_last() {
        for font in FontVariant::iter_variants() {
            let ops = StyleSpec::of(font).ops;
            if let Some(i) = ops.iter().position(|op| *op == PaintOp::Fill) {
                assert_eq!(ops.len() - 1, i, "{:?}", font);
            }
        }
    }

    #[test]
    fn ops_scale_with_size() {
        let ops = StyleSpec::of(FontVariant::Shadow).ops_for_size(64.0);
        assert_eq!(PaintOp::Shadow{dx: 8.0, dy: 8.0, blur: 6.0}, ops[0]);
        assert_eq!(PaintOp::Fill, ops[1]);
    }

    #[test]
    fn spaced_variants() {
        assert!(StyleSpec::of(FontVariant::Spaced).letter_spacing > 0.0);
        assert!(StyleSpec::of(FontVariant::SpacedStroke).letter_spacing > 0.0);
        assert_eq!(0.0, StyleSpec::of(FontVariant::Impact).letter_spacing_for_size(50.0));
    }

    #[test]
    fn reach() {
        assert_eq!(0.0, PaintOp::Fill.reach());
        assert_eq!(3.0, PaintOp::Outline{width: 3.0}.reach());
        assert_eq!(13.0, PaintOp::Shadow{dx: 4.0, dy: -1.0, blur: 3.0}.reach());
    }
}
