//! Module for loading fonts used to render text boxes.

use std::fmt;
use std::ops::Deref;
use std::path::Path;

use rusttype;

use super::{Loader, ResourceError};
use super::filesystem::{BytesLoader, FileLoader};


/// File extensions of the font files that can be loaded.
pub const FILE_EXTENSIONS: &[&str] = &["ttf", "otf"];


/// Font that text boxes can be rendered with.
pub struct Font {
    name: String,
    inner: rusttype::Font<'static>,
}

impl Font {
    /// Parse a font from the contents of a TrueType/OpenType file.
    pub fn from_bytes<S: Into<String>>(name: S, bytes: Vec<u8>) -> Result<Self, ResourceError> {
        let name = name.into();
        match rusttype::Font::try_from_vec(bytes) {
            Some(inner) => Ok(Font{name, inner}),
            None => Err(ResourceError::Font(name)),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Deref for Font {
    type Target = rusttype::Font<'static>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Font({:?}, {} glyph(s))", self.name, self.inner.glyph_count())
    }
}


/// Loader for fonts stored as files in a directory.
#[derive(Debug)]
pub struct FontLoader {
    inner: BytesLoader<'static>,
}

impl FontLoader {
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        FontLoader{
            inner: BytesLoader::new(FileLoader::for_extensions(directory, FILE_EXTENSIONS)),
        }
    }

    /// Names of all the fonts available in the loader's directory.
    #[inline]
    pub fn list(&self) -> Result<Vec<String>, ResourceError> {
        self.inner.files().paths().list()
    }
}

impl Loader for FontLoader {
    type Item = Font;
    type Err = ResourceError;

    fn load(&self, name: &str) -> Result<Font, Self::Err> {
        let bytes = self.inner.load(name)?;
        let font = Font::from_bytes(name, bytes).map_err(|e| {
            error!("Font file for `{}` resource cannot be parsed", name); e
        })?;
        debug!("Font `{}` loaded successfully", name);
        Ok(font)
    }
}


/// Font file used by tests that need real glyphs (DejaVu Sans Mono).
#[cfg(test)]
pub(crate) const TEST_FONT: &[u8] = include_bytes!("../tests/data/DejaVuSansMono.ttf");
