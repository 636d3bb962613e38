//! Module handling meme templates (background images).

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use image::{self, DynamicImage, GenericImageView, ImageFormat};

use crate::model::{Size, TemplateId};
use super::{Loader, ResourceError};
use super::filesystem::{extension, PathLoader};


/// Default image format to assume for templates of unknown format.
pub const DEFAULT_IMAGE_FORMAT: ImageFormat = ImageFormat::Png;

lazy_static! {
    /// Map of template file extensions to supported image formats.
    pub static ref IMAGE_FORMAT_EXTENSIONS: HashMap<&'static str, ImageFormat> = hashmap!{
        "gif" => ImageFormat::Gif,
        "jpeg" => ImageFormat::Jpeg,
        "jpg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
    };
}


/// Background image that memes are composed on.
#[derive(Clone)]
pub struct Template {
    image: DynamicImage,
    format: ImageFormat,
}

impl Template {
    /// Create the template for an image loaded from a file.
    /// Image format is figured out from the file extension.
    pub fn for_image<P: AsRef<Path>>(image: DynamicImage, path: P) -> Self {
        let format = extension(path)
            .and_then(|ext| IMAGE_FORMAT_EXTENSIONS.get(ext.as_str()).cloned())
            .unwrap_or(DEFAULT_IMAGE_FORMAT);
        Template{image, format}
    }

    /// Create a template from an in-memory image.
    #[inline]
    pub fn from_image(image: DynamicImage) -> Self {
        Template{image, format: DEFAULT_IMAGE_FORMAT}
    }
}

impl Template {
    #[inline]
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Format the template was loaded from.
    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Intrinsic size of the template image.
    #[inline]
    pub fn size(&self) -> Size {
        Size::from(self.image.dimensions())
    }

    /// Intrinsic width to height ratio of the template image.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.size().aspect_ratio()
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let (width, height) = self.image.dimensions();
        write!(fmt, "Template({}x{}, {:?})", width, height, self.format)
    }
}


/// Loader of templates stored as image files in a directory.
///
/// Template files are named after their `TemplateId`, e.g. `templates/17.jpg`.
#[derive(Debug)]
pub struct TemplateLoader {
    inner: PathLoader<'static>,
}

impl TemplateLoader {
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        let extensions = IMAGE_FORMAT_EXTENSIONS.keys().cloned().collect::<Vec<_>>();
        TemplateLoader{
            inner: PathLoader::for_extensions(directory, extensions),
        }
    }
}

impl Loader for TemplateLoader {
    type Item = Template;
    type Err = ResourceError;

    fn load(&self, name: &str) -> Result<Template, Self::Err> {
        let path = self.inner.load(name)?;
        trace!("Opening image {}", path.display());
        let image = image::open(&path).map_err(|e| {
            error!("Failed to open template image {}: {}", path.display(), e); e
        })?;
        Ok(Template::for_image(image, &path))
    }
}


/// List the ids of all templates available in given directory.
///
/// Files not named after a numeric id are skipped.
pub fn list_templates<D: AsRef<Path>>(directory: D) -> Result<Vec<TemplateId>, ResourceError> {
    debug!("Listing all available templates...");
    let loader = TemplateLoader::new(directory);
    let mut ids: Vec<_> = loader.inner.list()?.into_iter()
        .filter_map(|name| name.parse::<TemplateId>().map_err(|_| {
            trace!("Skipping template file with non-numeric name `{}`", name);
        }).ok())
        .collect();
    ids.sort();
    debug!("{} template(s) found", ids.len());
    Ok(ids)
}
