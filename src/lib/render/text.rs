//! Module responsible for laying out text.

use std::collections::HashSet;

use rusttype::{point, GlyphId, PositionedGlyph, Rect, Scale};

use crate::resources::Font;


/// Check if given font has all the glyphs for given text.
/// Missing ones are logged.
pub fn check(font: &Font, text: &str) -> bool {
    let mut missing = HashSet::new();
    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        if font.glyph(ch).id() == GlyphId(0) {
            missing.insert(ch as u32);
        }
    }
    if !missing.is_empty() {
        let mut codepoints: Vec<_> = missing.into_iter().collect();
        codepoints.sort();
        warn!("Font `{}` is missing glyphs for {} codepoint(s): {}",
            font.name(), codepoints.len(),
            codepoints.iter().map(|c| format!("{:#x}", c)).collect::<Vec<_>>().join(", "));
        return false;
    }
    true
}


/// Text laid out as glyphs, relative to the top-left corner of the text.
#[derive(Clone)]
pub struct Layout {
    pub glyphs: Vec<PositionedGlyph<'static>>,
    /// Nominal width of the widest line (i.e. its caret advance).
    pub width: f32,
    /// Nominal height of all the lines.
    pub height: f32,
}

impl Layout {
    /// Bounding box of all the pixels that glyphs will cover, if any.
    pub fn pixel_bounds(&self) -> Option<Rect<i32>> {
        self.glyphs.iter()
            .filter_map(|g| g.pixel_bounding_box())
            .fold(None, |acc: Option<Rect<i32>>, bb| Some(match acc {
                None => bb,
                Some(r) => Rect{
                    min: point(r.min.x.min(bb.min.x), r.min.y.min(bb.min.y)),
                    max: point(r.max.x.max(bb.max.x), r.max.y.max(bb.max.y)),
                },
            }))
    }
}


/// Lay out (possibly multi-line) text with given font, size & extra letter spacing.
///
/// The top of the first line is at Y=0: glyphs sit on a baseline
/// that's shifted down by the font's ascent.
pub fn layout(font: &Font, text: &str, size: f32, letter_spacing: f32) -> Layout {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;

    let mut glyphs = vec![];
    let mut width: f32 = 0.0;
    let mut line_count = 0;
    for (i, line) in text.lines().enumerate() {
        line_count += 1;
        let baseline = v_metrics.ascent + i as f32 * line_height;

        let mut caret = 0.0;
        let mut last: Option<GlyphId> = None;
        for ch in line.chars() {
            let glyph = font.glyph(ch).scaled(scale);
            if let Some(prev) = last {
                caret += font.pair_kerning(scale, prev, glyph.id());
            }
            last = Some(glyph.id());
            let advance = glyph.h_metrics().advance_width;
            glyphs.push(glyph.positioned(point(caret, baseline)));
            caret += advance + letter_spacing;
        }
        // Trailing spacing after the last letter isn't part of the text.
        if !line.is_empty() {
            caret -= letter_spacing;
        }
        width = width.max(caret);
    }

    let height = if line_count > 0 {
        line_count as f32 * line_height - v_metrics.line_gap
    } else {
        0.0
    };
    trace!("Laid out {} glyph(s) in {} line(s), nominal size {}x{}",
        glyphs.len(), line_count, width, height);
    Layout{glyphs, width, height}
}
