//! Module defining and implementing resource loaders.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::iter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob;

use super::{Loader, ResourceError};


/// Loader for file paths from given directory.
///
/// The resources here are just file *paths* (`PathBuf`),
/// and no substantial "loading" is performed (only path resolution).
/// Resource name is the file stem, e.g. `17` for `templates/17.jpg`.
pub struct PathLoader<'pl> {
    directory: PathBuf,
    predicate: Arc<dyn Fn(&Path) -> bool + Send + Sync + 'pl>,
}

impl<'pl> PathLoader<'pl> {
    #[inline]
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        Self::with_predicate(directory, |_| true)
    }

    #[inline]
    pub fn for_extension<D: AsRef<Path>, S>(directory: D, extension: S) -> Self
        where S: ToString
    {
        Self::for_extensions(directory, iter::once(extension))
    }

    /// Create a loader which only gives out paths to files
    /// that have one of the extensions given.
    pub fn for_extensions<D: AsRef<Path>, I, S>(directory: D, extensions: I) -> Self
        where I: IntoIterator<Item=S>, S: ToString
    {
        let extensions: Vec<_> = extensions.into_iter()
            .map(|e| e.to_string().trim().to_lowercase())
            .collect();
        Self::with_predicate(directory, move |path| {
            let ext = extension(path);
            extensions.iter().any(|e| Some(e) == ext.as_ref())
        })
    }

    pub fn with_predicate<D, P>(directory: D, predicate: P) -> Self
        where D: AsRef<Path>, P: Fn(&Path) -> bool + Send + Sync + 'pl
    {
        PathLoader{
            directory: directory.as_ref().to_owned(),
            predicate: Arc::new(predicate),
        }
    }

    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl<'pl> PathLoader<'pl> {
    /// List the names of all resources available to this loader, sorted.
    pub fn list(&self) -> Result<Vec<String>, ResourceError> {
        let names: BTreeSet<_> = self.glob("*")?.into_iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
            .collect();
        debug!("{} resource(s) found in {}", names.len(), self.directory.display());
        Ok(names.into_iter().collect())
    }

    /// Yield paths to matching files whose file stem matches given glob pattern.
    fn glob(&self, stem_pattern: &str) -> Result<Vec<PathBuf>, ResourceError> {
        let file_part = format!("{}.*", stem_pattern);
        let pattern = format!("{}", self.directory.join(file_part).display());
        trace!("Globbing with {}", pattern);

        let glob_iter = glob::glob(&pattern).map_err(|e| {
            error!("Failed to glob over files with {}: {}", pattern, e); e
        })?;
        Ok(glob_iter
            .filter_map(|r| r.map_err(|e| warn!("Skipping unreadable path: {}", e)).ok())
            .filter(|f| (self.predicate)(f))
            .collect())
    }
}

impl<'pl> Loader for PathLoader<'pl> {
    type Item = PathBuf;
    type Err = ResourceError;

    /// "Load" a path "resource" from the loader's directory.
    fn load(&self, name: &str) -> Result<Self::Item, Self::Err> {
        let mut matches = self.glob(&glob::Pattern::escape(name))?;
        match matches.len() {
            0 => Err(ResourceError::NotFound(name.to_owned(), self.directory.clone())),
            1 => Ok(matches.remove(0)),
            c => Err(ResourceError::Ambiguous(name.to_owned(), c, self.directory.clone())),
        }
    }
}

impl<'pl> fmt::Debug for PathLoader<'pl> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("PathLoader")
            .field("directory", &self.directory)
            .finish()
    }
}


/// Loader for files in given directory.
///
/// The resources it doles out are just file handles (`std::fs::File`).
/// Wrappers around this loader can then implement their own decoding.
#[derive(Debug)]
pub struct FileLoader<'pl> {
    inner: PathLoader<'pl>,
}

impl<'pl> FileLoader<'pl> {
    /// Create a loader which only loads files
    /// that have one of the extensions given.
    #[inline]
    pub fn for_extensions<D: AsRef<Path>, I, S>(directory: D, extensions: I) -> Self
        where I: IntoIterator<Item=S>, S: ToString
    {
        FileLoader{inner: PathLoader::for_extensions(directory, extensions)}
    }

    #[inline]
    pub fn paths(&self) -> &PathLoader<'pl> {
        &self.inner
    }
}

impl<'pl> Loader for FileLoader<'pl> {
    type Item = File;
    type Err = ResourceError;

    fn load(&self, name: &str) -> Result<Self::Item, Self::Err> {
        let path = self.inner.load(name)?;
        Ok(fs::OpenOptions::new().read(true).open(path)?)
    }
}


/// Wrapper around FileLoader that loads the entire content of the files.
#[derive(Debug)]
pub struct BytesLoader<'fl> {
    inner: FileLoader<'fl>,
}

impl<'fl> BytesLoader<'fl> {
    #[inline]
    pub fn new(inner: FileLoader<'fl>) -> Self {
        BytesLoader{inner}
    }

    #[inline]
    pub fn files(&self) -> &FileLoader<'fl> {
        &self.inner
    }
}

impl<'fl> Loader for BytesLoader<'fl> {
    type Item = Vec<u8>;
    type Err = ResourceError;

    /// Load a file resource as its byte content.
    fn load(&self, name: &str) -> Result<Self::Item, Self::Err> {
        let file = self.inner.load(name)?;

        let mut bytes = match file.metadata() {
            Ok(stat) => Vec::with_capacity(stat.len() as usize),
            Err(e) => {
                warn!("Failed to stat file of resource `{}` to obtain its size: {}", name, e);
                Vec::new()
            },
        };

        let mut reader = BufReader::new(file);
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}


/// Get the (useful part of) file extension from the path.
pub(crate) fn extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref().extension().and_then(|e| e.to_str())
        .map(|s| s.trim().to_lowercase())
}
