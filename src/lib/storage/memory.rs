//! Module implementing the in-memory table of saved memes.

use std::collections::BTreeMap;
use std::fmt;

use antidote::Mutex;
use futures::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::model::{ImageMeme, MemeId};
use super::{MemeStore, StoreError};


/// Table of saved memes, keyed by their ids,
/// together with the subscribers to its changes.
#[derive(Default)]
pub(super) struct Table {
    memes: BTreeMap<MemeId, ImageMeme>,
    last_id: i64,
    subscribers: Vec<UnboundedSender<Vec<ImageMeme>>>,
}

impl Table {
    pub fn from_memes<I: IntoIterator<Item=ImageMeme>>(memes: I) -> Self {
        let memes: BTreeMap<_, _> = memes.into_iter().map(|m| (m.id, m)).collect();
        let last_id = memes.keys().next_back().map(|id| id.0).unwrap_or(0);
        Table{memes, last_id, subscribers: vec![]}
    }

    /// Make sure ids up to given one are never allocated.
    pub fn with_last_id(mut self, last_id: i64) -> Self {
        self.last_id = self.last_id.max(last_id);
        self
    }

    #[inline]
    pub fn last_id(&self) -> i64 {
        self.last_id
    }

    pub fn all(&self) -> Vec<ImageMeme> {
        self.memes.values().cloned().collect()
    }

    #[inline]
    pub fn get(&self, id: MemeId) -> Option<&ImageMeme> {
        self.memes.get(&id)
    }

    pub fn insert_or_replace(&mut self, mut meme: ImageMeme) -> Result<MemeId, StoreError> {
        if meme.id.0 < 0 {
            return Err(StoreError::InvalidId(meme.id));
        }
        if meme.id.is_unsaved() {
            self.last_id += 1;
            meme.id = MemeId(self.last_id);
            trace!("Allocated id {} for new meme {}", meme.id, meme.image_path.display());
        } else {
            self.last_id = self.last_id.max(meme.id.0);
        }
        let id = meme.id;
        if self.memes.insert(id, meme).is_some() {
            trace!("Replaced saved meme {}", id);
        }
        Ok(id)
    }

    /// Delete memes of given ids, returning those that existed.
    pub fn delete(&mut self, ids: &[MemeId]) -> Vec<ImageMeme> {
        ids.iter().filter_map(|id| self.memes.remove(id)).collect()
    }

    pub fn toggle_favorite(&mut self, id: MemeId) -> Result<bool, StoreError> {
        let meme = self.memes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        meme.is_favorite = !meme.is_favorite;
        Ok(meme.is_favorite)
    }

    /// Add a subscriber which immediately receives the current list.
    pub fn subscribe(&mut self) -> UnboundedReceiver<Vec<ImageMeme>> {
        let (tx, rx) = mpsc::unbounded();
        if tx.unbounded_send(self.all()).is_ok() {
            self.subscribers.push(tx);
        }
        rx
    }

    /// Send the current list to all subscribers, forgetting those that are gone.
    pub fn notify(&mut self) {
        let memes = self.all();
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.unbounded_send(memes.clone()).is_ok());
        if self.subscribers.len() < before {
            trace!("Dropped {} closed meme list subscriber(s)", before - self.subscribers.len());
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.memes.len()
    }

    /// Copy of the table's contents that it can be rolled back to.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot{memes: self.memes.clone(), last_id: self.last_id}
    }

    /// Roll the table's contents back, keeping the subscribers.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.memes = snapshot.memes;
        self.last_id = snapshot.last_id;
    }
}

/// Contents of a `Table` at some point in time.
pub(super) struct Snapshot {
    memes: BTreeMap<MemeId, ImageMeme>,
    last_id: i64,
}

impl fmt::Debug for Table {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Table")
            .field("len", &self.memes.len())
            .field("last_id", &self.last_id)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}


/// Meme store that keeps everything in memory only.
#[derive(Debug)]
pub struct MemoryMemeStore {
    table: Mutex<Table>,
}

impl MemoryMemeStore {
    #[inline]
    pub fn new() -> Self {
        MemoryMemeStore{table: Mutex::new(Table::default())}
    }

    /// Create the store with some memes already in it.
    pub fn with_memes<I: IntoIterator<Item=ImageMeme>>(memes: I) -> Self {
        MemoryMemeStore{table: Mutex::new(Table::from_memes(memes))}
    }
}

impl Default for MemoryMemeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemeStore for MemoryMemeStore {
    fn all(&self) -> Result<Vec<ImageMeme>, StoreError> {
        Ok(self.table.lock().all())
    }

    fn get(&self, id: MemeId) -> Result<Option<ImageMeme>, StoreError> {
        Ok(self.table.lock().get(id).cloned())
    }

    fn insert_or_replace(&self, meme: ImageMeme) -> Result<MemeId, StoreError> {
        let mut table = self.table.lock();
        let id = table.insert_or_replace(meme)?;
        table.notify();
        Ok(id)
    }

    fn delete(&self, ids: &[MemeId]) -> Result<Vec<ImageMeme>, StoreError> {
        let mut table = self.table.lock();
        let deleted = table.delete(ids);
        if !deleted.is_empty() {
            table.notify();
        }
        Ok(deleted)
    }

    fn toggle_favorite(&self, id: MemeId) -> Result<bool, StoreError> {
        let mut table = self.table.lock();
        let favorite = table.toggle_favorite(id)?;
        table.notify();
        Ok(favorite)
    }

    fn subscribe(&self) -> UnboundedReceiver<Vec<ImageMeme>> {
        self.table.lock().subscribe()
    }
}
