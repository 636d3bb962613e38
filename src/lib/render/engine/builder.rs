//! Module implementing the builder for `Engine`.

use std::any::Any;
use std::path::{Path, PathBuf};

use either::*;
use thiserror::Error;

use crate::resources::{CachingLoader, Font, FontLoader, Loader, Template, TemplateLoader};
use super::config::Config;
use super::Engine;


const DEFAULT_TEMPLATE_CAPACITY: usize = 32;
const DEFAULT_FONT_CAPACITY: usize = 16;


/// Builder for `Engine`.
#[derive(Debug)]
#[must_use = "unused builder which must be used"]
pub struct Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    errors: Vec<Error>,

    template_loader_builder: Option<LoaderBuilder<Tl>>,
    font_loader_builder: Option<LoaderBuilder<Fl>>,

    jpeg_quality: Option<u8>,
    capture_quality: Option<u8>,
}


/// Temporary configuration for a template or font loader.
/// Used by `Builder`.
#[derive(Debug)]
enum LoaderBuilder<L: Loader> {
    Cached {
        inner: Option<Either<L, PathBuf>>,
        cache_size: usize,
    },
    Raw { inner: Option<L> },
}

impl<L: Loader> LoaderBuilder<L> {
    #[inline]
    fn cached(size: usize) -> Self {
        LoaderBuilder::Cached { inner: None, cache_size: size }
    }

    #[inline]
    fn raw() -> Self {
        LoaderBuilder::Raw { inner: None }
    }
}

impl<L: Loader> LoaderBuilder<L> {
    /// Set the directory that the `Cached` loader would use.
    /// Returns `false` if `LoaderBuilder` is already configured incompatibly.
    fn set_cached_loader_directory<P: AsRef<Path>>(&mut self, directory: P) -> bool {
        if let LoaderBuilder::Cached{ref mut inner, ..} = *self {
            if inner.as_ref().map(|i| i.is_right()).unwrap_or(true) {
                *inner = Some(Right(directory.as_ref().to_owned()));
                return true;
            }
        }
        false
    }

    /// Set the loader that the `Cached` loader would wrap.
    /// Returns `false` if `LoaderBuilder` is already configured incompatibly.
    fn set_cached_loader_object(&mut self, loader: L) -> bool {
        if let LoaderBuilder::Cached{ref mut inner, ..} = *self {
            if inner.as_ref().map(|i| i.is_left()).unwrap_or(true) {
                *inner = Some(Left(loader));
                return true;
            }
        }
        false
    }

    /// Set the cache size of `Cached` loader.
    /// Returns `false` if `LoaderBuilder` is already configured incompatibly.
    fn set_cached_size(&mut self, size: usize) -> bool {
        if let LoaderBuilder::Cached{ref mut cache_size, ..} = *self {
            *cache_size = size;
            return true;
        }
        false
    }

    /// Set the loader that the `Raw` loader would wrap.
    /// Returns `false` if `LoaderBuilder` is already configured incompatibly.
    fn set_raw_loader_object(&mut self, loader: L) -> bool {
        if let LoaderBuilder::Raw{ref mut inner} = *self {
            *inner = Some(loader);
            return true;
        }
        false
    }
}


impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Create a new `Builder`.
    #[inline]
    pub fn new() -> Self {
        Builder::default()
    }
}
impl<Tl, Fl> Default for Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    fn default() -> Self {
        Builder{
            errors: vec![],
            template_loader_builder: None,
            font_loader_builder: None,
            jpeg_quality: None,
            capture_quality: None,
        }
    }
}

// Setters.
impl<Fl> Builder<TemplateLoader, Fl>
    where Fl: Loader<Item=Font>
{
    /// Set the directory where the templates will be loaded from.
    #[inline]
    pub fn template_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        let ok = self.template_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_TEMPLATE_CAPACITY))
            .set_cached_loader_directory(directory);
        if ok { self } else { self.err(Error::LoaderBuilderConflict("template")) }
    }
}
impl<Tl> Builder<Tl, FontLoader>
    where Tl: Loader<Item=Template>
{
    /// Set the directory where the fonts will be loaded from.
    #[inline]
    pub fn font_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        let ok = self.font_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_FONT_CAPACITY))
            .set_cached_loader_directory(directory);
        if ok { self } else { self.err(Error::LoaderBuilderConflict("font")) }
    }
}
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Set a custom loader for templates.
    ///
    /// Templates loaded by it will still be cached in an LRU cache.
    /// See `raw_template_loader` if you want to provide your own caching.
    #[inline]
    pub fn template_loader(mut self, loader: Tl) -> Self {
        let ok = self.template_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_TEMPLATE_CAPACITY))
            .set_cached_loader_object(loader);
        if ok { self } else { self.err(Error::LoaderBuilderConflict("template")) }
    }

    /// Change the size of the template cache.
    #[inline]
    pub fn template_cache_size(mut self, size: usize) -> Self {
        let ok = self.template_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_TEMPLATE_CAPACITY))
            .set_cached_size(size);
        if ok { self } else { self.err(Error::LoaderBuilderConflict("template")) }
    }

    /// Set a custom loader for fonts.
    ///
    /// Fonts loaded by it will still be cached in an LRU cache.
    /// See `raw_font_loader` if you want to provide your own caching.
    #[inline]
    pub fn font_loader(mut self, loader: Fl) -> Self {
        let ok = self.font_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_FONT_CAPACITY))
            .set_cached_loader_object(loader);
        if ok { self } else { self.err(Error::LoaderBuilderConflict("font")) }
    }

    /// Change the size of the font cache.
    #[inline]
    pub fn font_cache_size(mut self, size: usize) -> Self {
        let ok = self.font_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_FONT_CAPACITY))
            .set_cached_size(size);
        if ok { self } else { self.err(Error::LoaderBuilderConflict("font")) }
    }

    /// Set a custom "raw" loader for templates.
    ///
    /// Templates loaded this way will not be cached (unless the loader itself
    /// implements some kind of caching).
    #[inline]
    pub fn raw_template_loader(mut self, loader: Tl) -> Self {
        let ok = self.template_loader_builder
            .get_or_insert_with(LoaderBuilder::raw)
            .set_raw_loader_object(loader);
        if ok { self } else { self.err(Error::LoaderBuilderConflict("template")) }
    }

    /// Set a custom "raw" loader for fonts.
    ///
    /// Fonts loaded this way will not be cached (unless the loader itself
    /// implements some kind of caching).
    #[inline]
    pub fn raw_font_loader(mut self, loader: Fl) -> Self {
        let ok = self.font_loader_builder
            .get_or_insert_with(LoaderBuilder::raw)
            .set_raw_loader_object(loader);
        if ok { self } else { self.err(Error::LoaderBuilderConflict("font")) }
    }
}
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Set the quality percentage of saved memes' JPEG images.
    #[inline]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        if is_valid_quality(quality) {
            self.jpeg_quality = Some(quality); self
        } else {
            self.err(Error::InvalidQuality(quality))
        }
    }

    /// Set the quality percentage of JPEG images captured for sharing.
    #[inline]
    pub fn capture_quality(mut self, quality: u8) -> Self {
        if is_valid_quality(quality) {
            self.capture_quality = Some(quality); self
        } else {
            self.err(Error::InvalidQuality(quality))
        }
    }
}

// Validation & building.
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template> + 'static, Fl: Loader<Item=Font> + 'static
{
    /// Build the `Engine`.
    pub fn build(self) -> Result<Engine<Tl, Fl>, Error> {
        self.check_errors()?;

        let config = self.build_config();
        let template_loader = self.template_loader_builder
            .ok_or(Error::NoLoader("template"))?
            .build("template", TemplateLoader::new)?;
        let font_loader = self.font_loader_builder
            .ok_or(Error::NoLoader("font"))?
            .build("font", FontLoader::new)?;
        Ok(Engine::from(super::Inner::new(config, template_loader, font_loader)))
    }
}

// Utilities for validation & building.
impl<L: Loader + 'static> LoaderBuilder<L> {
    /// Build the `Loader`.
    ///
    /// The closure passed is for the case when this is a standard loader we're building,
    /// like the `TemplateLoader`.
    fn build<F, Sl>(self, resource: &'static str,
                    standard_ctor: F) -> Result<CachingLoader<L>, Error>
        where F: FnOnce(PathBuf) -> Sl, Sl: Loader + 'static
    {
        match self {
            LoaderBuilder::Cached{ inner, cache_size } => match inner {
                None => Err(Error::NoLoader(resource)),
                Some(Left(loader)) => Ok(CachingLoader::new(loader, cache_size)),
                Some(Right(directory)) => {
                    // A directory can only be set through `Builder::(template|font)_directory`,
                    // which exist only when `L` is the matching standard loader.
                    let standard: Box<dyn Any> = Box::new(standard_ctor(directory));
                    let loader = standard.downcast::<L>()
                        .map_err(|_| Error::LoaderBuilderConflict(resource))?;
                    Ok(CachingLoader::new(*loader, cache_size))
                }
            },
            LoaderBuilder::Raw{ inner } => {
                // Use the phony version of CachingLoader which doesn't actually cache anything,
                // but provides the same interface yielding Arc<L::Item>.
                inner.map(CachingLoader::phony).ok_or(Error::NoLoader(resource))
            }
        }
    }
}
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    fn build_config(&self) -> Config {
        let mut config = Config::default();
        if let Some(quality) = self.jpeg_quality {
            config.jpeg_quality = quality;
        }
        if let Some(quality) = self.capture_quality {
            config.capture_quality = quality;
        }
        config
    }

    fn check_errors(&self) -> Result<(), Error> {
        match self.errors.first() {
            Some(e) => {
                if self.errors.len() > 1 {
                    debug!("{} more engine configuration error(s) after: {}",
                        self.errors.len() - 1, e);
                }
                Err(e.clone())
            }
            None => Ok(()),
        }
    }

    fn err(mut self, error: Error) -> Self {
        self.errors.push(error); self
    }
}

fn is_valid_quality(quality: u8) -> bool {
    quality >= 1 && quality <= 100
}


/// Error that resulted from misconfiguration of the `Engine` via its `Builder`.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// No loader set up for the resource.
    #[error("no {0} loader configured")]
    NoLoader(&'static str),

    /// Template or font loader configuration setup error.
    #[error("invalid combination of configuration parameters for setting up {0} loader")]
    LoaderBuilderConflict(&'static str),

    /// JPEG quality outside of the 1-100 range.
    #[error("invalid JPEG quality: {0} (expected 1 to 100)")]
    InvalidQuality(u8),
}
