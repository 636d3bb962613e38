//! Module handling the resources used for rendering memes.

mod error;
mod filesystem;
mod fonts;
mod templates;


pub use self::error::ResourceError;
pub use self::filesystem::{BytesLoader, FileLoader, PathLoader};
pub use self::fonts::{Font, FontLoader, FILE_EXTENSIONS as FONT_FILE_EXTENSIONS};
#[cfg(test)]
pub(crate) use self::fonts::TEST_FONT;
pub use self::templates::{list_templates, Template, TemplateLoader,
                          DEFAULT_IMAGE_FORMAT, IMAGE_FORMAT_EXTENSIONS};


use std::fmt;
use std::sync::Arc;

use crate::util::cache::ThreadSafeCache;


/// Loader of resources from some external source.
pub trait Loader {
    /// Type of resources that this loader can load.
    type Item;
    /// Error that may occur while loading the resource.
    type Err: Into<ResourceError>;

    /// Load a resource of given name.
    fn load(&self, name: &str) -> Result<Self::Item, Self::Err>;
}


/// A loader that keeps a cache of resources previously loaded.
pub struct CachingLoader<L: Loader> {
    inner: L,
    cache: ThreadSafeCache<String, L::Item>,
    pub(crate) phony: bool,
}

impl<L: Loader> CachingLoader<L> {
    #[inline]
    pub fn new(inner: L, capacity: usize) -> Self {
        CachingLoader{inner, cache: ThreadSafeCache::new(capacity), phony: false}
    }

    /// Create a phony version of CachingLoader that doesn't actually cache anything.
    ///
    /// This is used to transparently wrap a `Loader<Item=T>` into `Loader<Item=Arc<T>>`
    /// so that the engine can treat cached and uncached resources the same way.
    #[inline]
    pub(crate) fn phony(inner: L) -> Self {
        CachingLoader{inner, cache: ThreadSafeCache::new(1), phony: true}
    }

    #[inline]
    pub fn cache(&self) -> &ThreadSafeCache<String, L::Item> {
        &self.cache
    }
}

impl<L: Loader> Loader for CachingLoader<L> {
    type Item = Arc<L::Item>;
    type Err = L::Err;

    /// Load the object from cache or fall back on the original Loader.
    /// Cache the objects loaded this way.
    fn load(&self, name: &str) -> Result<Self::Item, Self::Err> {
        if self.phony {
            return self.inner.load(name).map(Arc::new);
        }
        if let Some(obj) = self.cache.get(name) {
            return Ok(obj);
        }
        let obj = self.inner.load(name)?;
        Ok(self.cache.put(name.to_owned(), obj))
    }
}

impl<L: Loader> fmt::Debug for CachingLoader<L> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("CachingLoader")
            .field("inner", &"...")
            .field("cache", &self.cache)
            .field("phony", &self.phony)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use spectral::prelude::*;

    use super::{CachingLoader, Loader, ResourceError};

    /// Loader that counts how many times it has been asked for something.
    struct CountingLoader {
        calls: Cell<usize>,
    }
    impl Loader for CountingLoader {
        type Item = String;
        type Err = ResourceError;
        fn load(&self, name: &str) -> Result<String, ResourceError> {
            self.calls.set(self.calls.get() + 1);
            if name.is_empty() {
                return Err(ResourceError::Other("empty name".into()));
            }
            Ok(name.to_uppercase())
        }
    }

    #[test]
    fn caches_loaded_objects() {
        let loader = CachingLoader::new(CountingLoader{calls: Cell::new(0)}, 4);
        assert_eq!("FOO", *loader.load("foo").unwrap());
        assert_eq!("FOO", *loader.load("foo").unwrap());
        assert_eq!(1, loader.inner.calls.get());
        assert_eq!(1, loader.cache().hits());
        assert_eq!(1, loader.cache().misses());
    }

    #[test]
    fn phony_doesnt_cache() {
        let loader = CachingLoader::phony(CountingLoader{calls: Cell::new(0)});
        loader.load("foo").unwrap();
        loader.load("foo").unwrap();
        assert_eq!(2, loader.inner.calls.get());
        assert!(loader.cache().is_empty());
    }

    #[test]
    fn errors_are_not_cached() {
        let loader = CachingLoader::new(CountingLoader{calls: Cell::new(0)}, 4);
        assert_that!(loader.load("")).is_err();
        assert_that!(loader.load("")).is_err();
        assert_eq!(2, loader.inner.calls.get());
    }
}
