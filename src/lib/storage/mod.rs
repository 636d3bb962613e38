//! Module handling the persistence of saved memes and their files.

mod error;
mod files;
mod json;
mod memory;


pub use self::error::{FilesError, StoreError};
pub use self::files::MemeFiles;
pub use self::json::JsonMemeStore;
pub use self::memory::MemoryMemeStore;


use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use futures::sync::mpsc::UnboundedReceiver;

use crate::model::{ImageMeme, MemeId};


/// Store of the memes that have been saved.
pub trait MemeStore: Send + Sync {
    /// All the saved memes, in order of their ids.
    fn all(&self) -> Result<Vec<ImageMeme>, StoreError>;

    /// Saved meme of given id, if any.
    fn get(&self, id: MemeId) -> Result<Option<ImageMeme>, StoreError>;

    /// Save a meme, replacing the existing one with the same id.
    ///
    /// Memes with zero id are assigned the next available one.
    /// Returns the id of the saved meme.
    fn insert_or_replace(&self, meme: ImageMeme) -> Result<MemeId, StoreError>;

    /// Delete saved memes of given ids. Unknown ids are ignored.
    /// Returns the memes that have been deleted.
    fn delete(&self, ids: &[MemeId]) -> Result<Vec<ImageMeme>, StoreError>;

    /// Flip the "favorite" flag of a meme, returning the new value.
    fn toggle_favorite(&self, id: MemeId) -> Result<bool, StoreError>;

    /// Subscribe to changes in the store.
    ///
    /// The stream yields the current list of memes right away,
    /// and then the full list again after every change.
    fn subscribe(&self) -> UnboundedReceiver<Vec<ImageMeme>>;
}


macro_attr! {
    /// Order in which saved memes can be listed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash,
             Serialize, Deserialize, IterVariants!(SortOrders))]
    #[serde(rename_all = "snake_case")]
    pub enum SortOrder {
        NewestFirst,
        OldestFirst,
        FavoritesFirst,
    }
}

impl SortOrder {
    /// Short name of the order, as accepted by `SortOrder::from_str`.
    pub fn name(self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "newest",
            SortOrder::OldestFirst => "oldest",
            SortOrder::FavoritesFirst => "favorites",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::NewestFirst
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.name())
    }
}

impl FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        SortOrder::iter_variants()
            .find(|o| o.name() == s)
            .ok_or_else(|| format!("unknown sort order `{}`", s))
    }
}


/// Sort memes in given order.
///
/// Memes created at the same time are ordered by their ids.
pub fn sort_memes(memes: &mut [ImageMeme], order: SortOrder) {
    let newest_first = |a: &ImageMeme, b: &ImageMeme| -> Ordering {
        b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
    };
    match order {
        SortOrder::NewestFirst => memes.sort_by(newest_first),
        SortOrder::OldestFirst => memes.sort_by(|a, b| newest_first(b, a)),
        SortOrder::FavoritesFirst => memes.sort_by(|a, b| {
            b.is_favorite.cmp(&a.is_favorite).then_with(|| newest_first(a, b))
        }),
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use crate::model::{ImageMeme, MemeId};
    use super::{sort_memes, SortOrder};

    fn meme(id: i64, created_at: i64, is_favorite: bool) -> ImageMeme {
        ImageMeme{id: MemeId(id), created_at, is_favorite, ..ImageMeme::new("x.jpg", "")}
    }

    fn ids(memes: &[ImageMeme]) -> Vec<i64> {
        memes.iter().map(|m| m.id.0).collect()
    }

    #[test]
    fn sorting() {
        let mut memes = vec![
            meme(1, 100, false), meme(2, 300, true), meme(3, 200, false), meme(4, 200, true)];

        sort_memes(&mut memes, SortOrder::NewestFirst);
        assert_eq!(vec![2, 4, 3, 1], ids(&memes));
        sort_memes(&mut memes, SortOrder::OldestFirst);
        assert_eq!(vec![1, 3, 4, 2], ids(&memes));
        sort_memes(&mut memes, SortOrder::FavoritesFirst);
        assert_eq!(vec![2, 4, 3, 1], ids(&memes));
    }

    #[test]
    fn favorites_first_keeps_recency() {
        let mut memes = vec![meme(1, 100, true), meme(2, 300, false), meme(3, 200, true)];
        sort_memes(&mut memes, SortOrder::FavoritesFirst);
        assert_eq!(vec![3, 1, 2], ids(&memes));
    }

    #[test]
    fn parse_order() {
        assert_that!("Newest".parse::<SortOrder>()).is_ok().is_equal_to(SortOrder::NewestFirst);
        assert_that!(" favorites ".parse::<SortOrder>()).is_ok()
            .is_equal_to(SortOrder::FavoritesFirst);
        assert_that!("random".parse::<SortOrder>()).is_err();
        for order in SortOrder::iter_variants() {
            assert_eq!(Ok(order), order.to_string().parse());
        }
    }
}
