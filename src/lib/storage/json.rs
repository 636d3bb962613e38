//! Module implementing the meme store backed by a JSON file.

use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use antidote::Mutex;
use futures::sync::mpsc::UnboundedReceiver;

use crate::model::{ImageMeme, MemeId};
use super::{MemeStore, StoreError};
use super::memory::Table;


/// On-disk representation of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    /// Last id allocated, so that ids of deleted memes aren't reused.
    #[serde(default)]
    last_id: i64,
    #[serde(default)]
    memes: Vec<ImageMeme>,
}


/// Meme store that keeps the table of memes in a JSON file.
///
/// The whole table is held in memory and the file is rewritten
/// after every change (through a temporary file, so it's never left half-written).
#[derive(Debug)]
pub struct JsonMemeStore {
    path: PathBuf,
    table: Mutex<Table>,
}

impl JsonMemeStore {
    /// Open the store at given path.
    /// If the file doesn't exist yet, the store starts out empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_owned();
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Meme store file {} doesn't exist yet, starting empty", path.display());
                return Ok(JsonMemeStore{path, table: Mutex::new(Table::default())});
            }
            Err(e) => return Err(StoreError::Io{path, source: e}),
        };

        let store_file: StoreFile = match serde_json::from_reader(BufReader::new(file)) {
            Ok(sf) => sf,
            Err(e) => {
                error!("Failed to parse meme store file {}: {}", path.display(), e);
                return Err(StoreError::Json{path, source: e});
            }
        };
        let table = Table::from_memes(store_file.memes).with_last_id(store_file.last_id);
        debug!("Loaded {} saved meme(s) from {}", table.len(), path.display());
        Ok(JsonMemeStore{path, table: Mutex::new(table)})
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the table to the store file.
    fn save(&self, table: &Table) -> Result<(), StoreError> {
        let store_file = StoreFile{last_id: table.last_id(), memes: table.all()};
        let tmp_path = self.path.with_extension("json.tmp");
        trace!("Writing {} meme(s) to {}", store_file.memes.len(), tmp_path.display());

        let io_err = |path: &Path| {
            let path = path.to_owned();
            move |source: io::Error| StoreError::Io{path, source}
        };
        {
            let file = fs::File::create(&tmp_path).map_err(io_err(&tmp_path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &store_file)
                .map_err(|e| StoreError::Json{path: tmp_path.clone(), source: e})?;
            writer.flush().map_err(io_err(&tmp_path))?;
        }
        fs::rename(&tmp_path, &self.path).map_err(io_err(&self.path))?;
        debug!("Meme store saved to {}", self.path.display());
        Ok(())
    }

    /// Apply a change to the table, persist it and notify subscribers.
    /// If the change cannot be persisted, the table is left as it was.
    fn modify<T, F>(&self, f: F) -> Result<T, StoreError>
        where F: FnOnce(&mut Table) -> Result<(T, bool), StoreError>
    {
        let mut table = self.table.lock();
        let snapshot = table.snapshot();
        let (result, changed) = match f(&mut *table) {
            Ok(r) => r,
            Err(e) => {
                table.restore(snapshot);
                return Err(e);
            }
        };
        if changed {
            if let Err(e) = self.save(&*table) {
                warn!("Failed to save meme store, reverting the change: {}", e);
                table.restore(snapshot);
                return Err(e);
            }
            table.notify();
        }
        Ok(result)
    }
}

impl MemeStore for JsonMemeStore {
    fn all(&self) -> Result<Vec<ImageMeme>, StoreError> {
        Ok(self.table.lock().all())
    }

    fn get(&self, id: MemeId) -> Result<Option<ImageMeme>, StoreError> {
        Ok(self.table.lock().get(id).cloned())
    }

    fn insert_or_replace(&self, meme: ImageMeme) -> Result<MemeId, StoreError> {
        self.modify(|t| t.insert_or_replace(meme).map(|id| (id, true)))
    }

    fn delete(&self, ids: &[MemeId]) -> Result<Vec<ImageMeme>, StoreError> {
        self.modify(|t| {
            let deleted = t.delete(ids);
            let changed = !deleted.is_empty();
            Ok((deleted, changed))
        })
    }

    fn toggle_favorite(&self, id: MemeId) -> Result<bool, StoreError> {
        self.modify(|t| t.toggle_favorite(id).map(|fav| (fav, true)))
    }

    fn subscribe(&self) -> UnboundedReceiver<Vec<ImageMeme>> {
        self.table.lock().subscribe()
    }
}


#[cfg(test)]
mod tests {
    use std::fs;

    use spectral::prelude::*;

    use crate::model::{ImageMeme, MemeId};
    use super::super::{MemeStore, StoreError};
    use super::JsonMemeStore;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonMemeStore::open(dir.path().join("memes.json")).unwrap();
        assert_that!(store.all()).is_ok().is_empty();
        assert!(!store.path().exists());
    }

    #[test]
    fn changes_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memes.json");
        {
            let store = JsonMemeStore::open(&path).unwrap();
            let a = store.insert_or_replace(ImageMeme::new("a.jpg", "first")).unwrap();
            let b = store.insert_or_replace(ImageMeme::new("b.jpg", "second")).unwrap();
            store.toggle_favorite(b).unwrap();
            store.delete(&[a]).unwrap();
            let c = store.insert_or_replace(ImageMeme::new("c.jpg", "third")).unwrap();
            store.delete(&[c]).unwrap();
        }
        assert!(!dir.path().join("memes.json.tmp").exists());

        let store = JsonMemeStore::open(&path).unwrap();
        let memes = store.all().unwrap();
        assert_eq!(1, memes.len());
        assert_eq!(MemeId(2), memes[0].id);
        assert_eq!("second", memes[0].description);
        assert!(memes[0].is_favorite);

        // Ids of deleted memes aren't reused, even after reopening.
        assert_eq!(MemeId(4), store.insert_or_replace(ImageMeme::new("d.jpg", "")).unwrap());
    }

    #[test]
    fn malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memes.json");
        fs::write(&path, "{ nope").unwrap();
        match JsonMemeStore::open(&path) {
            Err(StoreError::Json{..}) => {}
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn failed_save_leaves_table_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let store = JsonMemeStore::open(data_dir.join("memes.json")).unwrap();

        match store.insert_or_replace(ImageMeme::new("a.jpg", "first")) {
            Err(StoreError::Io{..}) => {}
            r => panic!("unexpected result: {:?}", r),
        }
        assert_that!(store.all()).is_ok().is_empty();

        fs::create_dir(&data_dir).unwrap();
        let id = store.insert_or_replace(ImageMeme::new("a.jpg", "first")).unwrap();
        assert_eq!(MemeId(1), id);

        fs::remove_dir_all(&data_dir).unwrap();
        assert_that!(store.toggle_favorite(id)).is_err();
        assert_that!(store.delete(&[id])).is_err();
        let memes = store.all().unwrap();
        assert_eq!(1, memes.len());
        assert!(!memes[0].is_favorite);

        fs::create_dir(&data_dir).unwrap();
        assert_eq!(MemeId(2), store.insert_or_replace(ImageMeme::new("b.jpg", "")).unwrap());
        let reopened = JsonMemeStore::open(data_dir.join("memes.json")).unwrap();
        assert_eq!(2, reopened.all().unwrap().len());
    }
}
