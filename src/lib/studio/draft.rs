//! Module defining the draft of a meme that's ready to be rendered.

use std::fmt;

use crate::editor::EditorSession;
use crate::model::{Size, TemplateId, TextBox};


/// Snapshot of a meme being edited: the background template,
/// the size of the on-screen container it's shown in, and the text boxes.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct MemeDraft {
    pub template: TemplateId,
    pub container: Size,
    #[serde(default)]
    pub text_boxes: Vec<TextBox>,
}

impl MemeDraft {
    #[inline]
    pub fn new(template: TemplateId, container: Size, text_boxes: Vec<TextBox>) -> Self {
        MemeDraft{template, container, text_boxes}
    }

    /// Take a snapshot of the text boxes of an editing session.
    pub fn from_session(template: TemplateId, container: Size, session: &EditorSession) -> Self {
        Self::new(template, container, session.text_boxes().to_vec())
    }

    /// Whether the draft has any text that would be rendered.
    pub fn has_text(&self) -> bool {
        self.text_boxes.iter().any(|tb| !tb.text.trim().is_empty())
    }
}

impl fmt::Debug for MemeDraft {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "MemeDraft({} in {:?}, {} text box(es))",
            self.template, self.container, self.text_boxes.len())
    }
}
