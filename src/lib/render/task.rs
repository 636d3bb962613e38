//! Module implementing the actual rendering task.
//! Most if not all rendering logic lives here.

use std::sync::Arc;

use image::{imageops, RgbaImage};
use image::imageops::FilterType;

use crate::model::{Size, TemplateId, TextBox};
use crate::resources::{Font, Loader, Template};
use super::dimensions::MemeDimensions;
use super::engine;
use super::error::RenderError;
use super::output::MemeOutput;
use super::painter::PaintedText;
use super::style::StyleSpec;
use super::text;


/// Represents a single rendering task and contains all the relevant logic.
///
/// All the code here is executed in a background thread,
/// and so it can be synchronous.
pub(super) struct RenderTask<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    background: TemplateId,
    text_boxes: Vec<TextBox>,
    container: Size,
    engine: Arc<engine::Inner<Tl, Fl>>,
}

impl<Tl, Fl> RenderTask<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    #[inline]
    pub fn new(background: TemplateId, text_boxes: Vec<TextBox>, container: Size,
               engine: Arc<engine::Inner<Tl, Fl>>) -> Self {
        RenderTask{background, text_boxes, container, engine}
    }
}

impl<Tl, Fl> RenderTask<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Perform the rendering task.
    pub fn perform(self) -> Result<MemeOutput, RenderError> {
        debug!("Rendering template {} with {} text box(es) in {:?} container",
            self.background, self.text_boxes.len(), self.container);

        let template = self.engine.template_loader.load(&self.background.to_string())
            .map_err(|e| RenderError::Template(self.background, e.into()))?;
        let dims = MemeDimensions::compute(self.container, template.aspect_ratio())?;
        debug!("Output dimensions: {:?}", dims);

        let mut img = self.resize_template(&template, &dims);
        for text_box in &self.text_boxes {
            self.draw_text_box(&mut img, text_box, &dims)?;
        }
        Ok(MemeOutput::new(img, dims))
    }

    /// Resize the template image to the output dimensions.
    fn resize_template(&self, template: &Template, dims: &MemeDimensions) -> RgbaImage {
        let orig = template.size();
        trace!("Original size of the template image {}: {:?}", self.background, orig);

        let (width, height) = (dims.width, dims.height);
        if orig.width as u32 != width || orig.height as u32 != height {
            debug!("Resizing template image {} from {:?} to {}x{}",
                self.background, orig, width, height);
            imageops::resize(template.image(), width, height, FilterType::Lanczos3)
        } else {
            debug!("Using original template image size of {:?}", orig);
            template.image().to_rgba8()
        }
    }

    /// Draw a single text box onto the image.
    fn draw_text_box(&self, img: &mut RgbaImage, text_box: &TextBox,
                     dims: &MemeDimensions) -> Result<(), RenderError> {
        if text_box.text.trim().is_empty() {
            debug!("Empty text in text box {}, skipping.", text_box.id);
            return Ok(());
        }

        let font = load_font(&*self.engine, text_box)?;
        let position = dims.remap(text_box.position);
        trace!("Text box {} at {:?} on screen goes to {:?} in the bitmap",
            text_box.id, text_box.position, position);

        PaintedText::paint(&font, &text_box.text, &text_box.style).draw_onto(img, position);
        Ok(())
    }
}


/// Paint a single text box onto a transparent sprite that fits it.
pub(super) fn paint_preview<Tl, Fl>(engine: &engine::Inner<Tl, Fl>,
                                    text_box: &TextBox) -> Result<RgbaImage, RenderError>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    if text_box.text.trim().is_empty() {
        return Ok(RgbaImage::new(1, 1));
    }
    let font = load_font(engine, text_box)?;
    let sprite = PaintedText::paint(&font, &text_box.text, &text_box.style).to_image();
    trace!("Preview of text box {} is {}x{}", text_box.id, sprite.width(), sprite.height());
    Ok(sprite)
}

/// Load the typeface that the text box's font variant is painted with.
fn load_font<Tl, Fl>(engine: &engine::Inner<Tl, Fl>,
                     text_box: &TextBox) -> Result<Arc<Font>, RenderError>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    let typeface = StyleSpec::of(text_box.style.font).typeface;
    trace!("Loading font `{}` for {:?}...", typeface, text_box.style.font);
    let font = engine.font_loader.load(typeface)
        .map_err(|e| RenderError::Font(typeface.to_owned(), e.into()))?;

    trace!("Checking if font `{}` has all glyphs for text box {}", typeface, text_box.id);
    text::check(&font, &text_box.text);
    Ok(font)
}
