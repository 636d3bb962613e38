//! Module with the types of memes shown in the gallery.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;


/// Identifier of a bundled template image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
         Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub u32);

impl fmt::Display for TemplateId {
    /// Format the id as the template's resource name.
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

impl FromStr for TemplateId {
    type Err = <u32 as FromStr>::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TemplateId)
    }
}


/// Identifier of a saved meme.
///
/// A zero id means the meme hasn't been stored yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
         Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemeId(pub i64);

impl MemeId {
    #[inline]
    pub fn is_unsaved(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for MemeId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

impl FromStr for MemeId {
    type Err = <i64 as FromStr>::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(MemeId)
    }
}


/// A saved, fully composed meme (background with the text baked in).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMeme {
    #[serde(default)]
    pub id: MemeId,
    /// Path to the rendered image file.
    pub image_path: PathBuf,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_favorite: bool,
    /// Creation time as Unix timestamp in milliseconds.
    pub created_at: i64,
}

impl ImageMeme {
    /// Create a new, not yet stored meme for an image file, timestamped now.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(image_path: P, description: S) -> Self {
        ImageMeme{
            id: MemeId::default(),
            image_path: image_path.into(),
            description: description.into(),
            is_favorite: false,
            created_at: now_millis(),
        }
    }
}

fn now_millis() -> i64 {
    let now = time::get_time();
    now.sec * 1000 + (now.nsec / 1_000_000) as i64
}


/// Item of the meme gallery: either a template to start from, or a saved meme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MemeItem {
    Template { id: TemplateId },
    Image(ImageMeme),
}

impl MemeItem {
    #[inline]
    pub fn is_template(&self) -> bool {
        match *self { MemeItem::Template{..} => true, _ => false }
    }

    #[inline]
    pub fn as_image(&self) -> Option<&ImageMeme> {
        match *self { MemeItem::Image(ref m) => Some(m), _ => None }
    }
}

impl From<TemplateId> for MemeItem {
    fn from(id: TemplateId) -> Self {
        MemeItem::Template{id}
    }
}
impl From<ImageMeme> for MemeItem {
    fn from(meme: ImageMeme) -> Self {
        MemeItem::Image(meme)
    }
}
