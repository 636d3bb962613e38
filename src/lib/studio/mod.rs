//! Module implementing the studio: the controller that offloads
//! rendering and file operations onto a pool of worker threads.

mod builder;
mod draft;
mod error;


pub use self::builder::{Builder as StudioBuilder, FONTS_DIR, STORE_FILE};
pub use self::draft::MemeDraft;
pub use self::error::StudioError;


use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::Future;
use futures::sync::mpsc::UnboundedReceiver;
use futures_cpupool::CpuPool;
use itertools::Itertools;

use crate::model::{ImageMeme, MemeId, MemeItem, TemplateId};
use crate::render::Engine;
use crate::resources::list_templates;
use crate::storage::{sort_memes, MemeFiles, MemeStore, SortOrder, StoreError};


/// Future result of a studio operation.
pub type StudioFuture<T> = Box<dyn Future<Item=T, Error=StudioError> + Send>;


/// Creates, saves & shares memes in the background.
///
/// Every operation is executed in a separate thread
/// and returns a future that resolves when it's done.
#[derive(Clone)]
pub struct Studio {
    engine: Engine,
    files: Arc<MemeFiles>,
    store: Arc<dyn MemeStore>,
    pool: CpuPool,
}

impl Studio {
    /// Create a `Studio` with default settings, keeping its files at given root.
    #[inline]
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StudioError> {
        StudioBuilder::new(root).build()
    }

    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[inline]
    pub fn files(&self) -> &MemeFiles {
        &*self.files
    }

    /// Subscribe to changes in the list of saved memes.
    #[inline]
    pub fn subscribe(&self) -> UnboundedReceiver<Vec<ImageMeme>> {
        self.store.subscribe()
    }
}

// Creating memes.
impl Studio {
    /// Render the meme and keep it as a new saved meme.
    pub fn save<S: Into<String>>(&self, draft: MemeDraft, description: S) -> StudioFuture<ImageMeme> {
        let engine = self.engine.clone();
        let files = self.files.clone();
        let store = self.store.clone();
        let description = description.into();
        self.spawn(format!("save {:?}", draft), move || {
            let path = files.new_meme_path();
            let path = engine.render_meme(
                draft.template, &draft.text_boxes, draft.container, &path)
                .map_err(|e| { files.delete(&path); e })?;

            let mut meme = ImageMeme::new(path, description);
            match store.insert_or_replace(meme.clone()) {
                Ok(id) => {
                    meme.id = id;
                    info!("Saved meme {} as {}", id, meme.image_path.display());
                    Ok(meme)
                }
                Err(e) => {
                    files.delete(&meme.image_path);
                    Err(e.into())
                }
            }
        })
    }

    /// Render the meme for sharing, without saving it.
    /// Returns the URI of the rendered image.
    pub fn capture(&self, draft: MemeDraft) -> StudioFuture<String> {
        let engine = self.engine.clone();
        let files = self.files.clone();
        self.spawn(format!("capture {:?}", draft), move || {
            let path = files.new_capture_path();
            let path = engine.render_capture(
                draft.template, &draft.text_boxes, draft.container, &path)
                .map_err(|e| { files.delete(&path); e })?;
            Ok(files.share_uri(path)?)
        })
    }
}

// Managing saved memes.
impl Studio {
    /// URI under which a saved meme can be shared.
    pub fn share(&self, id: MemeId) -> StudioFuture<String> {
        let files = self.files.clone();
        let store = self.store.clone();
        self.spawn(format!("share meme {}", id), move || {
            let meme = store.get(id)?.ok_or(StudioError::NoSuchMeme(id))?;
            Ok(files.share_uri(&meme.image_path)?)
        })
    }

    /// All the saved memes, in given order.
    pub fn memes(&self, order: SortOrder) -> StudioFuture<Vec<ImageMeme>> {
        let store = self.store.clone();
        self.spawn(format!("list memes ({})", order), move || {
            let mut memes = store.all()?;
            sort_memes(&mut memes, order);
            Ok(memes)
        })
    }

    /// The whole gallery: saved memes in given order, followed by the templates.
    pub fn gallery(&self, order: SortOrder) -> StudioFuture<Vec<MemeItem>> {
        let store = self.store.clone();
        let templates_dir = self.files.templates_dir();
        self.spawn(format!("list gallery ({})", order), move || {
            let mut memes = store.all()?;
            sort_memes(&mut memes, order);
            let templates = list_templates(&templates_dir)?;
            Ok(memes.into_iter().map(MemeItem::from)
                .chain(templates.into_iter().map(MemeItem::from))
                .collect())
        })
    }

    /// Flip the "favorite" flag of a saved meme, returning the new value.
    pub fn toggle_favorite(&self, id: MemeId) -> StudioFuture<bool> {
        let store = self.store.clone();
        self.spawn(format!("toggle favorite of meme {}", id), move || {
            store.toggle_favorite(id).map_err(|e| match e {
                StoreError::NotFound(id) => StudioError::NoSuchMeme(id),
                e => e.into(),
            })
        })
    }

    /// Delete saved memes together with their image files.
    /// Returns the number of memes deleted.
    pub fn delete(&self, ids: Vec<MemeId>) -> StudioFuture<usize> {
        let files = self.files.clone();
        let store = self.store.clone();
        let ids: Vec<_> = ids.into_iter().unique().collect();
        self.spawn(format!("delete {} meme(s)", ids.len()), move || {
            let deleted = store.delete(&ids)?;
            for meme in &deleted {
                files.delete(&meme.image_path);
            }
            if deleted.len() < ids.len() {
                debug!("Only {} out of {} meme(s) to delete were found", deleted.len(), ids.len());
            }
            Ok(deleted.len())
        })
    }
}

// Managing templates.
impl Studio {
    /// Ids of all the installed templates.
    pub fn templates(&self) -> StudioFuture<Vec<TemplateId>> {
        let templates_dir = self.files.templates_dir();
        self.spawn("list templates".into(), move || Ok(list_templates(&templates_dir)?))
    }

    /// Install templates bundled in given directory.
    /// Returns the number of templates that weren't installed before.
    pub fn install_templates<P: AsRef<Path>>(&self, assets_dir: P) -> StudioFuture<usize> {
        let files = self.files.clone();
        let assets_dir: PathBuf = assets_dir.as_ref().to_owned();
        self.spawn(format!("install templates from {}", assets_dir.display()), move || {
            Ok(files.install_templates(&assets_dir)?)
        })
    }
}

impl Studio {
    fn spawn<T, F>(&self, what: String, f: F) -> StudioFuture<T>
        where T: Send + 'static, F: FnOnce() -> Result<T, StudioError> + Send + 'static
    {
        trace!("Scheduling studio task: {}", what);
        Box::new(self.pool.spawn_fn(move || {
            let result = f();
            match result {
                Ok(_) => trace!("Studio task done: {}", what),
                Err(ref e) => error!("Failed to {}: {}", what, e),
            }
            result
        }))
    }
}

impl fmt::Debug for Studio {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Studio")
            .field("engine", &self.engine)
            .field("files", &self.files)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use futures::{Future, Stream};
    use image::{Rgba, RgbaImage};
    use spectral::prelude::*;

    use crate::model::{ImageMeme, MemeId, MemeItem, Point, Size, TemplateId, TextBox, TextBoxId};
    use crate::render::RenderError;
    use crate::storage::{JsonMemeStore, MemoryMemeStore, SortOrder, StoreError};
    use super::{MemeDraft, Studio, StudioBuilder, StudioError, STORE_FILE};

    #[test]
    fn thread_safe() {
        fn assert_sync<T: Sync>() {}
        fn assert_send<T: Send>() {}

        assert_sync::<Studio>();
        assert_send::<Studio>();
    }

    fn studio(root: &Path) -> Studio {
        let studio = StudioBuilder::new(root)
            .store(MemoryMemeStore::new())
            .thread_count(2)
            .build().unwrap();
        write_template(&studio.files().templates_dir(), 1);
        studio
    }

    /// Write a 200x100 template image.
    fn write_template(dir: &Path, id: u32) {
        let image = RgbaImage::from_pixel(200, 100, Rgba([0x20, 0x40, 0x80, 0xff]));
        image.save(dir.join(format!("{}.png", id))).unwrap();
    }

    /// Draft without any text, so that no fonts are needed for rendering.
    fn blank_draft(template: u32) -> MemeDraft {
        let text_box = TextBox::new(TextBoxId(1), "", Point::new(10.0, 10.0), Default::default());
        MemeDraft::new(TemplateId(template), Size::new(400.0, 400.0), vec![text_box])
    }

    #[test]
    fn save_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());

        let meme = studio.save(blank_draft(1), "blank").wait().unwrap();
        assert!(!meme.id.is_unsaved());
        assert_eq!("blank", meme.description);

        let memes = studio.memes(SortOrder::NewestFirst).wait().unwrap();
        assert_eq!(vec![meme.clone()], memes);
        let image = image::open(&memes[0].image_path).unwrap();
        assert_eq!((400, 200), (image.width(), image.height()));
        assert_eq!(Some(studio.files().memes_dir().as_path()), meme.image_path.parent());
    }

    #[test]
    fn missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());
        match studio.save(blank_draft(9), "").wait() {
            Err(StudioError::Render(RenderError::Template(id, _))) => assert_eq!(TemplateId(9), id),
            r => panic!("unexpected result: {:?}", r),
        }
        assert_eq!(0, fs::read_dir(studio.files().memes_dir()).unwrap().count());
        assert_that!(studio.memes(SortOrder::default()).wait()).is_ok().is_empty();
    }

    #[test]
    fn delete_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());
        let first = studio.save(blank_draft(1), "first").wait().unwrap();
        let second = studio.save(blank_draft(1), "second").wait().unwrap();

        let deleted = studio.delete(vec![first.id, MemeId(99), first.id]).wait().unwrap();
        assert_eq!(1, deleted);
        assert!(!first.image_path.exists());
        assert!(second.image_path.exists());
        let ids: Vec<_> = studio.memes(SortOrder::default()).wait().unwrap()
            .into_iter().map(|m| m.id).collect();
        assert_eq!(vec![second.id], ids);
    }

    #[test]
    fn favorite_and_share() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());
        let meme = studio.save(blank_draft(1), "").wait().unwrap();

        assert_that!(studio.toggle_favorite(meme.id).wait()).is_ok().is_true();
        let uri = studio.share(meme.id).wait().unwrap();
        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with(".jpg"));

        match studio.toggle_favorite(MemeId(42)).wait() {
            Err(StudioError::NoSuchMeme(id)) => assert_eq!(MemeId(42), id),
            r => panic!("unexpected result: {:?}", r),
        }
        match studio.share(MemeId(42)).wait() {
            Err(e @ StudioError::NoSuchMeme(_)) => assert_eq!("Meme not found", e.user_message()),
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn capture_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());
        let uri = studio.capture(blank_draft(1)).wait().unwrap();
        assert!(uri.starts_with("file://"));
        assert_eq!(1, fs::read_dir(studio.files().cache_dir()).unwrap().count());
        assert_that!(studio.memes(SortOrder::default()).wait()).is_ok().is_empty();
    }

    #[test]
    fn gallery_lists_memes_then_templates() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());
        let meme = studio.save(blank_draft(1), "").wait().unwrap();

        let items = studio.gallery(SortOrder::default()).wait().unwrap();
        assert_eq!(vec![MemeItem::from(meme), MemeItem::from(TemplateId(1))], items);
    }

    #[test]
    fn install_templates() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());
        let assets = dir.path().join("assets");
        fs::create_dir(&assets).unwrap();
        write_template(&assets, 1);
        write_template(&assets, 2);

        assert_that!(studio.install_templates(&assets).wait()).is_ok().is_equal_to(1);
        assert_that!(studio.templates().wait()).is_ok()
            .is_equal_to(vec![TemplateId(1), TemplateId(2)]);
    }

    #[test]
    fn subscribers_see_saved_memes() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());
        let rx = studio.subscribe();
        studio.save(blank_draft(1), "").wait().unwrap();

        let (first, rx) = rx.into_future().wait().map_err(|_| ()).unwrap();
        assert_eq!(Some(0), first.map(|l: Vec<ImageMeme>| l.len()));
        let (second, _) = rx.into_future().wait().map_err(|_| ()).unwrap();
        assert_eq!(Some(1), second.map(|l| l.len()));
    }

    #[test]
    fn default_store_is_persistent() {
        let dir = tempfile::tempdir().unwrap();
        let meme = {
            let studio = Studio::open(dir.path()).unwrap();
            write_template(&studio.files().templates_dir(), 1);
            studio.save(blank_draft(1), "kept").wait().unwrap()
        };
        assert!(dir.path().join(STORE_FILE).is_file());

        let studio = Studio::open(dir.path()).unwrap();
        let memes = studio.memes(SortOrder::default()).wait().unwrap();
        assert_eq!(vec![meme], memes);
    }

    #[test]
    fn unsaved_meme_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonMemeStore::open(dir.path().join("gone").join(STORE_FILE)).unwrap();
        let studio = StudioBuilder::new(dir.path()).store(store).build().unwrap();
        write_template(&studio.files().templates_dir(), 1);

        match studio.save(blank_draft(1), "").wait() {
            Err(StudioError::Store(StoreError::Io{..})) => {}
            r => panic!("unexpected result: {:?}", r),
        }
        assert_that!(studio.memes(SortOrder::NewestFirst).wait()).is_ok().is_empty();
        assert_eq!(0, fs::read_dir(studio.files().memes_dir()).unwrap().count());
    }
}
