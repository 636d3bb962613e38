//! Module implementing the builder for `Studio`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_cpupool::{self, CpuPool};

use crate::render::{Engine, EngineBuilder};
use crate::resources::{FontLoader, TemplateLoader};
use crate::storage::{JsonMemeStore, MemeFiles, MemeStore};
use super::{Studio, StudioError};


/// Name of the file holding the saved memes, relative to the files root.
pub const STORE_FILE: &str = "memes.json";
/// Directory with fonts, relative to the files root, if not specified otherwise.
pub const FONTS_DIR: &str = "fonts";


/// Builder for `Studio`.
#[must_use = "unused builder which must be used"]
pub struct Builder {
    root: PathBuf,
    font_directory: Option<PathBuf>,
    store: Option<Arc<dyn MemeStore>>,
    thread_count: usize,
    jpeg_quality: Option<u8>,
}

impl Builder {
    /// Create the builder for a studio keeping its files at given root directory.
    #[inline]
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Builder{
            root: root.as_ref().to_owned(),
            font_directory: None,
            store: None,
            thread_count: 0,
            jpeg_quality: None,
        }
    }

    /// Directory to load fonts from.
    /// By default, this is the `fonts/` directory under the root.
    #[inline]
    pub fn font_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.font_directory = Some(directory.as_ref().to_owned());
        self
    }

    /// Store to keep the saved memes in.
    /// By default, this is a JSON file under the root.
    #[inline]
    pub fn store<S: MemeStore + 'static>(self, store: S) -> Self {
        self.shared_store(Arc::new(store))
    }

    #[inline]
    pub fn shared_store(mut self, store: Arc<dyn MemeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Number of worker threads doing the rendering & file operations.
    /// Zero (the default) means one thread per CPU.
    #[inline]
    pub fn thread_count(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    /// Quality of the JPEG files of saved memes.
    #[inline]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }
}

impl Builder {
    /// Build the `Studio`, creating its directories if necessary.
    pub fn build(self) -> Result<Studio, StudioError> {
        let root = self.root;
        let files = MemeFiles::open(&root)?;

        let font_directory = self.font_directory.unwrap_or_else(|| root.join(FONTS_DIR));
        let mut engine_builder = EngineBuilder::<TemplateLoader, FontLoader>::new()
            .template_directory(files.templates_dir())
            .font_directory(&font_directory);
        if let Some(quality) = self.jpeg_quality {
            engine_builder = engine_builder.jpeg_quality(quality);
        }
        let engine: Engine = engine_builder.build()?;

        let store: Arc<dyn MemeStore> = match self.store {
            Some(store) => store,
            None => Arc::new(JsonMemeStore::open(root.join(STORE_FILE))?),
        };

        let pool = create_pool(self.thread_count);
        debug!("Studio created at {}, fonts from {}",
            files.root().display(), font_directory.display());
        Ok(Studio{engine, files: Arc::new(files), store, pool})
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Builder")
            .field("root", &self.root)
            .field("font_directory", &self.font_directory)
            .field("store", &self.store.as_ref().map(|_| "<custom>"))
            .field("thread_count", &self.thread_count)
            .field("jpeg_quality", &self.jpeg_quality)
            .finish()
    }
}


fn create_pool(thread_count: usize) -> CpuPool {
    let mut builder = futures_cpupool::Builder::new();
    builder.name_prefix("studio-");
    builder.after_start(|| trace!("Worker thread created in Studio::pool"));
    builder.before_stop(|| trace!("Stopping worker thread in Studio::pool"));
    if thread_count > 0 {
        trace!("Using {} worker thread(s) for the studio", thread_count);
        builder.pool_size(thread_count);
    }
    builder.create()
}
