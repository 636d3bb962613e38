//! Module which defines the rendering engine.

mod builder;
mod config;

pub use self::builder::{Builder, Error as BuildError};
pub use self::config::{Config, DEFAULT_CAPTURE_QUALITY, DEFAULT_JPEG_QUALITY};


use std::path::{Path, PathBuf};
use std::sync::Arc;

use antidote::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use image::RgbaImage;

use crate::model::{Size, TemplateId, TextBox};
use crate::resources::{CachingLoader, Font, FontLoader, Loader, ResourceError,
                       Template, TemplateLoader};
use crate::util::cache::ThreadSafeCache;
use super::error::RenderError;
use super::output::MemeOutput;
use super::task::{paint_preview, RenderTask};


/// Meme rendering engine.
///
/// The engine is thread-safe (`Sync`) since normally you'd want the rendering
/// to be performed in a background thread.
///
/// *Note*: `Engine` implements `Clone`
/// by merely cloning a shared reference to the underlying object.
#[derive(Debug)]
pub struct Engine<Tl = TemplateLoader, Fl = FontLoader>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    inner: Arc<Inner<Tl, Fl>>,
}

/// Shared state of the engine that render tasks have access to.
#[derive(Debug)]
pub(super) struct Inner<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    pub(super) config: RwLock<Config>,
    pub template_loader: CachingLoader<Tl>,
    pub font_loader: CachingLoader<Fl>,
}

impl<Tl, Fl> Inner<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    #[inline]
    pub fn new(config: Config,
               template_loader: CachingLoader<Tl>,
               font_loader: CachingLoader<Fl>) -> Self {
        let config = RwLock::new(config);
        Inner{config, template_loader, font_loader}
    }
}

impl<Tl, Fl> Clone for Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    fn clone(&self) -> Self {
        Engine{inner: self.inner.clone()}
    }
}

impl<Tl, Fl> From<Inner<Tl, Fl>> for Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    fn from(inner: Inner<Tl, Fl>) -> Self {
        Engine{inner: Arc::new(inner)}
    }
}

// Constructors.
impl Engine<TemplateLoader, FontLoader> {
    /// Create an Engine which loads templates & fonts from given directory paths.
    ///
    /// When loaded, both resources will be cached in memory (LRU cache).
    ///
    /// For other ways of creating `Engine`, see the `EngineBuilder`.
    #[inline]
    pub fn new<Dt, Df>(template_directory: Dt, font_directory: Df) -> Result<Self, BuildError>
        where Dt: AsRef<Path>, Df: AsRef<Path>
    {
        Builder::<TemplateLoader, FontLoader>::new()
            .template_directory(template_directory)
            .font_directory(font_directory)
            .build()
    }
}
impl<Tl, Fl> Engine<Tl, Fl>
    where Tl: Loader<Item=Template> + 'static, Fl: Loader<Item=Font> + 'static
{
    /// Create an Engine that uses given loaders for templates & font.
    ///
    /// When loaded, both resources will be cached in memory (LRU cache).
    #[inline]
    pub fn with_loaders(template_loader: Tl, font_loader: Fl) -> Result<Self, BuildError> {
        Builder::new()
            .template_loader(template_loader)
            .font_loader(font_loader)
            .build()
    }

    /// Create an Engine that uses given template & font loaders directly.
    ///
    /// Any caching scheme, if necessary, should be implemented by loaders themselves.
    #[inline]
    pub fn with_raw_loaders(template_loader: Tl, font_loader: Fl) -> Result<Self, BuildError> {
        Builder::new()
            .raw_template_loader(template_loader)
            .raw_font_loader(font_loader)
            .build()
    }
}


// Rendering memes.
impl<Tl, Fl> Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Render the background template with given text boxes on top of it.
    ///
    /// Text box positions are relative to an on-screen container of given size
    /// that the template is shown in (possibly letterboxed).
    ///
    /// Note that rendering is a CPU-intensive process and can be relatively lengthy.
    /// It is recommended to execute it in a separate thread.
    #[inline]
    pub fn render(&self, background: TemplateId, text_boxes: &[TextBox],
                  container: Size) -> Result<MemeOutput, RenderError> {
        RenderTask::new(background, text_boxes.to_vec(), container, self.inner.clone())
            .perform()
    }

    /// Render a meme and save it as a JPEG file
    /// of the configured quality (`Config::jpeg_quality`).
    ///
    /// Returns the path to the file written.
    pub fn render_meme<P: AsRef<Path>>(&self, background: TemplateId, text_boxes: &[TextBox],
                                       container: Size, output_file: P) -> Result<PathBuf, RenderError> {
        let quality = self.config().jpeg_quality;
        self.render_to_file(background, text_boxes, container, output_file.as_ref(), quality)
    }

    /// Render a meme and save it as a JPEG file of the capture quality
    /// (`Config::capture_quality`), suitable for sharing.
    ///
    /// Returns the path to the file written.
    pub fn render_capture<P: AsRef<Path>>(&self, background: TemplateId, text_boxes: &[TextBox],
                                          container: Size, output_file: P) -> Result<PathBuf, RenderError> {
        let quality = self.config().capture_quality;
        self.render_to_file(background, text_boxes, container, output_file.as_ref(), quality)
    }

    /// Paint a single text box onto a transparent image,
    /// the same way it would appear on a rendered meme.
    #[inline]
    pub fn render_preview(&self, text_box: &TextBox) -> Result<RgbaImage, RenderError> {
        paint_preview(&*self.inner, text_box)
    }

    fn render_to_file(&self, background: TemplateId, text_boxes: &[TextBox], container: Size,
                      path: &Path, quality: u8) -> Result<PathBuf, RenderError> {
        let output = self.render(background, text_boxes, container)?;
        output.write_jpeg(path, quality)?;
        debug!("Meme rendered from template {} written to {}", background, path.display());
        Ok(path.to_owned())
    }
}

// Managing resources.
impl<Tl, Fl> Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Preemptively load a template into engine's cache.
    pub fn preload_template(&self, id: TemplateId) -> Result<(), ResourceError> {
        if self.inner.template_loader.phony {
            return Ok(());
        }
        self.inner.template_loader.load(&id.to_string()).map(|_| ()).map_err(Into::into)
    }

    /// Preemptively load a font into engine's cache.
    pub fn preload_font(&self, name: &str) -> Result<(), ResourceError> {
        if self.inner.font_loader.phony {
            return Ok(());
        }
        self.inner.font_loader.load(name).map(|_| ()).map_err(Into::into)
    }

    /// Return a reference to the internal template cache, if any.
    /// This can be used to examine cache statistics (hits & misses).
    pub fn template_cache(&self) -> Option<&ThreadSafeCache<String, Template>> {
        if self.inner.template_loader.phony {
            None
        } else {
            Some(self.inner.template_loader.cache())
        }
    }

    /// Return a reference to the internal font cache, if any.
    /// This can be used to examine cache statistics (hits & misses).
    pub fn font_cache(&self) -> Option<&ThreadSafeCache<String, Font>> {
        if self.inner.font_loader.phony {
            None
        } else {
            Some(self.inner.font_loader.cache())
        }
    }
}

// Configuration.
impl<Tl, Fl> Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Read the `Engine`'s configuration.
    #[inline]
    pub fn config(&self) -> RwLockReadGuard<Config> {
        self.inner.config.read()
    }

    /// Modify the `Engine`'s configuration.
    ///
    /// Changes will affect both pending and future rendering tasks.
    #[inline]
    pub fn config_mut(&self) -> RwLockWriteGuard<Config> {
        self.inner.config.write()
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
    use spectral::prelude::*;

    use crate::model::{FontVariant, MemeTextStyle, Point, Size, TemplateId, TextBox, TextBoxId};
    use crate::resources::{Font, Loader, ResourceError, Template, TEST_FONT};
    use crate::render::error::RenderError;
    use super::Engine;

    /// Loader of solid color templates of sizes given by their ids:
    /// template 21 is 200x100, template 12 is 100x200. There is no template 0.
    #[derive(Debug, Default)]
    struct SolidTemplates {
        loads: AtomicUsize,
    }
    impl Loader for SolidTemplates {
        type Item = Template;
        type Err = ResourceError;
        fn load(&self, name: &str) -> Result<Template, ResourceError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let id: u32 = name.parse().map_err(|_| ResourceError::Other(name.to_owned()))?;
            if id == 0 {
                return Err(ResourceError::NotFound(name.to_owned(), "<memory>".into()));
            }
            let (w, h) = (id / 10 * 100, id % 10 * 100);
            let img = RgbImage::from_pixel(w, h, Rgb([0x10, 0x80, 0x10]));
            Ok(Template::from_image(DynamicImage::ImageRgb8(img)))
        }
    }

    /// Loader that has no fonts at all.
    #[derive(Debug)]
    struct NoFonts;
    impl Loader for NoFonts {
        type Item = Font;
        type Err = ResourceError;
        fn load(&self, name: &str) -> Result<Font, ResourceError> {
            Err(ResourceError::NotFound(name.to_owned(), "<memory>".into()))
        }
    }

    /// Loader which has every typeface, all of them being the same font.
    #[derive(Debug)]
    struct OneFont;
    impl Loader for OneFont {
        type Item = Font;
        type Err = ResourceError;
        fn load(&self, name: &str) -> Result<Font, ResourceError> {
            Font::from_bytes(name, TEST_FONT.to_vec())
        }
    }

    fn engine() -> Engine<SolidTemplates, NoFonts> {
        Engine::with_loaders(SolidTemplates::default(), NoFonts).unwrap()
    }

    fn text_box(text: &str) -> TextBox {
        TextBox::new(TextBoxId(1), text, Point::new(10.0, 10.0), MemeTextStyle::default())
    }

    #[test]
    fn thread_safe() {
        fn assert_sync<T: Sync>() {}
        fn assert_send<T: Send>() {}

        assert_sync::<Engine>();
        assert_send::<Engine>();
    }

    #[test]
    fn render_blank_meme() {
        let output = engine()
            .render(TemplateId(21), &[text_box(""), text_box("  ")], Size::new(400.0, 400.0))
            .unwrap();
        assert_eq!((400, 200), output.image().dimensions());
        assert!(!output.dimensions().is_letterboxed());
        assert_eq!(&[0x10, 0x80, 0x10, 0xff], &output.image().get_pixel(200, 100).0);
    }

    #[test]
    fn render_letterboxed() {
        let output = engine()
            .render(TemplateId(12), &[], Size::new(300.0, 300.0))
            .unwrap();
        assert_eq!((300, 600), output.image().dimensions());
        assert!(output.dimensions().is_letterboxed());
    }

    #[test]
    fn missing_template() {
        match engine().render(TemplateId(0), &[], Size::new(100.0, 100.0)) {
            Err(RenderError::Template(id, _)) => assert_eq!(TemplateId(0), id),
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn missing_font() {
        match engine().render(TemplateId(21), &[text_box("hi")], Size::new(100.0, 100.0)) {
            Err(RenderError::Font(name, _)) => assert_eq!("impact", name),
            r => panic!("unexpected result: {:?}", r),
        }
        assert_that!(engine().render_preview(&text_box("hi"))).is_err();
    }

    #[test]
    fn invalid_container() {
        match engine().render(TemplateId(21), &[], Size::new(0.0, 100.0)) {
            Err(RenderError::InvalidDimensions(..)) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn templates_are_cached() {
        let engine = engine();
        engine.preload_template(TemplateId(21)).unwrap();
        engine.render(TemplateId(21), &[], Size::new(200.0, 100.0)).unwrap();
        let stats = engine.template_cache().unwrap().stats();
        assert_eq!(1, stats.hits);
        assert_eq!(1, stats.misses);
    }

    #[test]
    fn render_meme_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meme.jpg");
        let engine = engine();
        engine.config_mut().jpeg_quality = 50;

        let written = engine
            .render_meme(TemplateId(21), &[text_box("")], Size::new(200.0, 200.0), &path)
            .unwrap();
        assert_eq!(path, written);
        let img = image::open(&written).unwrap();
        assert_eq!((200, 100), img.dimensions());
    }

    #[test]
    fn render_meme_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("meme.jpg");
        match engine().render_capture(TemplateId(21), &[], Size::new(200.0, 200.0), &path) {
            Err(RenderError::Io(_)) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }

    fn white_text_box(text: &str, position: Point) -> TextBox {
        let style = MemeTextStyle::default().with_font(FontVariant::Bold);
        TextBox::new(TextBoxId(1), text, position, style)
    }

    fn is_white(px: &image::Rgba<u8>) -> bool {
        px[0] > 0xf0 && px[1] > 0xf0 && px[2] > 0xf0
    }

    #[test]
    fn render_text() {
        let engine = Engine::with_loaders(SolidTemplates::default(), OneFont).unwrap();
        let output = engine
            .render(TemplateId(21), &[white_text_box("Hi", Point::new(10.0, 10.0))],
                    Size::new(200.0, 200.0))
            .unwrap();
        let img = output.image();
        assert_eq!((200, 100), img.dimensions());

        let white_at = |x0: u32, x1: u32, y0: u32, y1: u32| (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .any(|(x, y)| is_white(img.get_pixel(x, y)));
        assert!(white_at(10, 60, 10, 50));
        assert!(!white_at(0, 200, 0, 10));
        assert!(!white_at(70, 200, 0, 100));
        assert!(img.pixels().all(|p| p[3] == 0xff));
        assert_eq!(1, engine.font_cache().unwrap().stats().misses);
    }

    #[test]
    fn render_text_letterboxed() {
        // 100x200 template in a 300x300 container is shown 150px tall, 75px below the top,
        // so the on-screen Y of 150 is 300 in the 300x600 bitmap.
        let engine = Engine::with_loaders(SolidTemplates::default(), OneFont).unwrap();
        let output = engine
            .render(TemplateId(12), &[white_text_box("H", Point::new(100.0, 150.0))],
                    Size::new(300.0, 300.0))
            .unwrap();
        let img = output.image();
        assert_eq!((300, 600), img.dimensions());

        let white_rows: Vec<u32> = (0..600)
            .filter(|&y| (0..300).any(|x| is_white(img.get_pixel(x, y))))
            .collect();
        assert!(!white_rows.is_empty());
        assert!(white_rows.iter().all(|&y| y >= 300 && y < 340), "{:?}", white_rows);
    }

    #[test]
    fn render_preview_of_text() {
        let engine = Engine::with_loaders(SolidTemplates::default(), OneFont).unwrap();
        let sprite = engine.render_preview(&white_text_box("wow", Point::origin())).unwrap();
        assert!(sprite.width() > 1 && sprite.height() > 1);
        assert!(sprite.pixels().any(|p| p[3] == 0xff));
        assert_eq!(0, sprite.get_pixel(0, 0)[3]);
    }
}
