//! Module managing the files of the app: templates, saved memes & captures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbaImage;

use crate::render::encode_jpeg;
use crate::resources::IMAGE_FORMAT_EXTENSIONS;
use super::FilesError;


const TEMPLATES_DIR: &str = "templates";
const MEMES_DIR: &str = "memes";
const CACHE_DIR: &str = "cache";

/// Extension of the image files written.
const JPEG_EXTENSION: &str = "jpg";


/// The app-private directory holding all the files.
///
/// Its layout is:
/// * `templates/` -- background images, named after their `TemplateId`
/// * `memes/` -- rendered memes that have been saved
/// * `cache/` -- rendered memes captured for sharing
#[derive(Debug)]
pub struct MemeFiles {
    root: PathBuf,
    counter: AtomicUsize,
}

impl MemeFiles {
    /// Open the files directory at given root, creating it if necessary.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, FilesError> {
        let root = root.as_ref().to_owned();
        for dir in &[TEMPLATES_DIR, MEMES_DIR, CACHE_DIR] {
            let path = root.join(dir);
            fs::create_dir_all(&path).map_err(FilesError::io(&path))?;
        }
        debug!("Using {} as the files directory", root.display());
        Ok(MemeFiles{root, counter: AtomicUsize::new(0)})
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    #[inline]
    pub fn memes_dir(&self) -> PathBuf {
        self.root.join(MEMES_DIR)
    }

    #[inline]
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }
}

impl MemeFiles {
    /// Copy template images bundled with the app into the templates directory.
    ///
    /// Templates already installed are skipped.
    /// Returns the number of files actually copied.
    pub fn install_templates<P: AsRef<Path>>(&self, assets_dir: P) -> Result<usize, FilesError> {
        let assets_dir = assets_dir.as_ref();
        debug!("Installing templates from {}", assets_dir.display());

        let target_dir = self.templates_dir();
        let entries = fs::read_dir(assets_dir).map_err(FilesError::io(assets_dir))?;
        let mut copied = 0;
        for entry in entries {
            let entry = entry.map_err(FilesError::io(assets_dir))?;
            let source = entry.path();
            if !source.is_file() || !is_image_file(&source) {
                trace!("Skipping non-template file {}", source.display());
                continue;
            }
            let target = match source.file_name() {
                Some(name) => target_dir.join(name),
                None => continue,
            };
            if target.exists() {
                trace!("Template {} is already installed", target.display());
                continue;
            }
            fs::copy(&source, &target).map_err(FilesError::io(&target))?;
            trace!("Copied {} to {}", source.display(), target.display());
            copied += 1;
        }

        if copied > 0 {
            info!("Installed {} template(s) into {}", copied, target_dir.display());
        }
        Ok(copied)
    }

    /// Path for the image of a new saved meme. The file doesn't exist yet.
    #[inline]
    pub fn new_meme_path(&self) -> PathBuf {
        self.new_path(&self.memes_dir(), "meme")
    }

    /// Path for the image of a new capture to share. The file doesn't exist yet.
    #[inline]
    pub fn new_capture_path(&self) -> PathBuf {
        self.new_path(&self.cache_dir(), "capture")
    }

    fn new_path(&self, dir: &Path, prefix: &str) -> PathBuf {
        let now = time::get_time();
        let millis = now.sec * 1000 + (now.nsec / 1_000_000) as i64;
        loop {
            let n = self.counter.fetch_add(1, Ordering::Relaxed);
            let path = dir.join(format!("{}_{}_{}.{}", prefix, millis, n, JPEG_EXTENSION));
            if !path.exists() {
                return path;
            }
        }
    }

    /// Write an image as JPEG file of given quality.
    pub fn write_jpeg<P: AsRef<Path>>(&self, image: &RgbaImage, path: P,
                                      quality: u8) -> Result<PathBuf, FilesError> {
        let path = path.as_ref();
        let bytes = encode_jpeg(image, quality).map_err(FilesError::Encode)?;
        fs::write(path, &bytes).map_err(FilesError::io(path))?;
        debug!("Wrote {} byte(s) of JPEG to {}", bytes.len(), path.display());
        Ok(path.to_owned())
    }

    /// Delete a file, if it exists.
    ///
    /// Failures are only logged. Returns whether the file has been deleted.
    pub fn delete<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                true
            }
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("File to delete {} doesn't exist", path.display());
                false
            }
            Err(e) => {
                warn!("Failed to delete {}: {}", path.display(), e);
                false
            }
        }
    }

    /// URI under which the file can be shared with other apps.
    pub fn share_uri<P: AsRef<Path>>(&self, path: P) -> Result<String, FilesError> {
        let path = path.as_ref();
        let canonical = path.canonicalize().map_err(FilesError::io(path))?;
        Ok(file_uri(&canonical))
    }
}


fn is_image_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str())
        .map(|e| IMAGE_FORMAT_EXTENSIONS.contains_key(e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Format an absolute path as a `file://` URI.
fn file_uri(path: &Path) -> String {
    let mut uri = String::from("file://");
    for ch in path.to_string_lossy().chars() {
        match ch {
            ' ' => uri.push_str("%20"),
            '#' => uri.push_str("%23"),
            '%' => uri.push_str("%25"),
            '?' => uri.push_str("%3F"),
            '\\' => uri.push('/'),
            c => uri.push(c),
        }
    }
    uri
}
