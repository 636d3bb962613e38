//! Module implementing the editing session of a single meme.

use crate::model::{FontVariant, MemeColor, MemeTextStyle, Point, Size, TextBox, TextBoxId,
                   DEFAULT_TEXT_BOX_TEXT, MAX_TEXT_BOXES, MAX_TEXT_LENGTH};
use super::error::EditorError;
use super::placement;


/// In-memory editing model for the text boxes of a meme.
///
/// Positions are kept in screen space, relative to the top-left corner
/// of the on-screen container the image is shown in, and are only converted
/// to bitmap space when the meme is rendered (see `MemeDimensions::remap`).
///
/// The image size is the area, in the same container coordinates,
/// that new text boxes are placed in and moved boxes are kept within.
/// Usually that's the size of the container itself.
///
/// All mutation goes through `&mut self`, so user actions are serialized
/// by construction.
#[derive(Debug, Default)]
pub struct EditorSession {
    image_size: Size,
    text_boxes: Vec<TextBox>,
    selected: Option<TextBoxId>,
    last_id: u32,
}

impl EditorSession {
    /// Create an empty session for an image displayed in an area of given on-screen size.
    #[inline]
    pub fn new(image_size: Size) -> Self {
        EditorSession{image_size, ..Self::default()}
    }

    /// Size of the on-screen area that text boxes are kept within.
    #[inline]
    pub fn image_size(&self) -> Size {
        self.image_size
    }

    /// Change the on-screen size of the image, e.g. after the layout got measured.
    ///
    /// Existing text boxes are left where they are.
    #[inline]
    pub fn set_image_size(&mut self, size: Size) {
        trace!("Editor image size changed to {:?}", size);
        self.image_size = size;
    }
}

// Accessors.
impl EditorSession {
    /// All text boxes, in the order of their creation.
    #[inline]
    pub fn text_boxes(&self) -> &[TextBox] {
        &self.text_boxes
    }

    #[inline]
    pub fn get(&self, id: TextBoxId) -> Option<&TextBox> {
        self.text_boxes.iter().find(|tb| tb.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text_boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text_boxes.is_empty()
    }

    /// Id of the currently selected text box, if any.
    #[inline]
    pub fn selected_id(&self) -> Option<TextBoxId> {
        self.selected
    }

    /// Currently selected text box, if any.
    #[inline]
    pub fn selected(&self) -> Option<&TextBox> {
        self.selected.and_then(|id| self.get(id))
    }
}

// Adding & removing text boxes.
impl EditorSession {
    /// Add a text box with the placeholder text and default style.
    #[inline]
    pub fn add_text_box(&mut self) -> Result<TextBoxId, EditorError> {
        self.add_text_box_with(DEFAULT_TEXT_BOX_TEXT, MemeTextStyle::default())
    }

    /// Add a text box with given text and style.
    ///
    /// The box is placed near the center of the image, avoiding existing boxes
    /// on a best-effort basis. It becomes the selected box.
    pub fn add_text_box_with<S: Into<String>>(&mut self, text: S,
                                              style: MemeTextStyle) -> Result<TextBoxId, EditorError> {
        if self.text_boxes.len() >= MAX_TEXT_BOXES {
            return Err(EditorError::TooManyTextBoxes);
        }
        let text = text.into();
        check_text(&text)?;

        self.last_id += 1;
        let id = TextBoxId(self.last_id);
        let mut text_box = TextBox::new(id, text, Point::origin(), style);

        let existing: Vec<_> = self.text_boxes.iter().map(|tb| tb.position).collect();
        match placement::place(text_box.estimated_size(), self.image_size, &existing) {
            Some(p) => text_box.position = p.position,
            None => debug!("Image size unknown, text box {} stays at the origin", id),
        }

        debug!("Added text box {:?}", text_box);
        self.text_boxes.push(text_box);
        self.selected = Some(id);
        Ok(id)
    }

    /// Delete a text box. If it was selected, the selection is cleared.
    pub fn delete(&mut self, id: TextBoxId) -> Result<TextBox, EditorError> {
        let index = self.text_boxes.iter().position(|tb| tb.id == id)
            .ok_or(EditorError::NoSuchTextBox(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        let text_box = self.text_boxes.remove(index);
        debug!("Deleted text box {:?}", text_box);
        Ok(text_box)
    }

    /// Delete the selected text box, if any.
    pub fn delete_selected(&mut self) -> Option<TextBox> {
        let id = self.selected?;
        self.delete(id).ok()
    }

    /// Remove all text boxes.
    #[inline]
    pub fn clear(&mut self) {
        self.text_boxes.clear();
        self.selected = None;
    }
}

// Selection.
impl EditorSession {
    pub fn select(&mut self, id: TextBoxId) -> Result<(), EditorError> {
        if self.get(id).is_none() {
            return Err(EditorError::NoSuchTextBox(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    #[inline]
    pub fn deselect(&mut self) {
        self.selected = None;
    }
}

// Modifying text boxes.
impl EditorSession {
    /// Drag a text box by given offset.
    pub fn move_by(&mut self, id: TextBoxId, dx: f32, dy: f32) -> Result<Point, EditorError> {
        let position = self.get(id).ok_or(EditorError::NoSuchTextBox(id))?.position;
        self.move_to(id, Point::new(position.x + dx, position.y + dy))
    }

    /// Move a text box to given position, kept within the image if its size is known.
    pub fn move_to(&mut self, id: TextBoxId, position: Point) -> Result<Point, EditorError> {
        let position = self.clamp_to_image(position);
        let text_box = self.get_mut(id)?;
        trace!("Moving text box {} from {:?} to {:?}", id, text_box.position, position);
        text_box.position = position;
        Ok(position)
    }

    /// Change the text of a text box.
    pub fn edit_text<S: Into<String>>(&mut self, id: TextBoxId, text: S) -> Result<(), EditorError> {
        let text = text.into();
        check_text(&text)?;
        self.get_mut(id)?.text = text;
        Ok(())
    }

    /// Replace the whole style of a text box.
    pub fn set_style(&mut self, id: TextBoxId, style: MemeTextStyle) -> Result<(), EditorError> {
        self.get_mut(id)?.style = style;
        Ok(())
    }

    pub fn set_font(&mut self, id: TextBoxId, font: FontVariant) -> Result<(), EditorError> {
        self.update_style(id, |s| s.with_font(font))
    }

    pub fn set_color(&mut self, id: TextBoxId, color: MemeColor) -> Result<(), EditorError> {
        self.update_style(id, |s| s.with_color(color))
    }

    pub fn set_size(&mut self, id: TextBoxId, size: f32) -> Result<(), EditorError> {
        self.update_style(id, |s| s.with_size(size))
    }
}

// Undo & redo are not supported.
impl EditorSession {
    #[inline]
    pub fn can_undo(&self) -> bool { false }
    #[inline]
    pub fn can_redo(&self) -> bool { false }

    /// Always does nothing and returns `false`.
    #[inline]
    pub fn undo(&mut self) -> bool { false }
    /// Always does nothing and returns `false`.
    #[inline]
    pub fn redo(&mut self) -> bool { false }
}

impl EditorSession {
    #[doc(hidden)]
    fn get_mut(&mut self, id: TextBoxId) -> Result<&mut TextBox, EditorError> {
        self.text_boxes.iter_mut().find(|tb| tb.id == id)
            .ok_or(EditorError::NoSuchTextBox(id))
    }

    #[doc(hidden)]
    fn update_style<F>(&mut self, id: TextBoxId, f: F) -> Result<(), EditorError>
        where F: FnOnce(MemeTextStyle) -> MemeTextStyle
    {
        let text_box = self.get_mut(id)?;
        text_box.style = f(text_box.style);
        Ok(())
    }

    #[doc(hidden)]
    fn clamp_to_image(&self, p: Point) -> Point {
        if self.image_size.is_empty() {
            return p;
        }
        Point::new(p.x.max(0.0).min(self.image_size.width),
                   p.y.max(0.0).min(self.image_size.height))
    }
}

fn check_text(text: &str) -> Result<(), EditorError> {
    let len = text.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(EditorError::TextTooLong(len));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;

    use crate::model::{FontVariant, MemeColor, MemeTextStyle, Point, Size, TextBoxId,
                       MAX_TEXT_BOXES, MAX_TEXT_LENGTH, PLACEMENT_ATTEMPTS};
    use super::super::EditorError;
    use super::EditorSession;

    fn session() -> EditorSession {
        EditorSession::new(Size::new(1000.0, 800.0))
    }

    #[test]
    fn ids_are_unique() {
        let mut s = session();
        let a = s.add_text_box().unwrap();
        let b = s.add_text_box().unwrap();
        s.delete(b).unwrap();
        let c = s.add_text_box().unwrap();
        assert_eq!(TextBoxId(1), a);
        assert_ne!(b, c);
        assert_eq!(2, s.len());
    }

    #[test]
    fn added_box_is_selected() {
        let mut s = session();
        let id = s.add_text_box().unwrap();
        assert_eq!(Some(id), s.selected_id());
        assert_that!(s.selected().map(|tb| tb.id)).is_some().is_equal_to(id);
    }

    #[test]
    fn added_boxes_dont_coincide() {
        let mut s = session();
        let style = MemeTextStyle::default();
        // Few enough for every box to find a free spot within the attempt budget.
        for _ in 0..4 {
            s.add_text_box_with("Such meme", style).unwrap();
        }
        let min_distance = s.text_boxes()[0].estimated_size().width / 2.0;
        let boxes = s.text_boxes();
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                assert_that!(a.position.distance_to(b.position))
                    .is_greater_than(min_distance);
            }
        }
    }

    #[test]
    fn add_without_image_size() {
        let mut s = EditorSession::default();
        let id = s.add_text_box().unwrap();
        assert_eq!(Point::origin(), s.get(id).unwrap().position);
    }

    #[test]
    fn crowded_image_still_accepts_boxes() {
        // Too small to step anywhere, so every box lands on the same spot.
        let mut s = EditorSession::new(Size::new(10.0, 10.0));
        for _ in 0..3 {
            s.add_text_box().unwrap();
        }
        assert_eq!(3, s.len());
        assert!(PLACEMENT_ATTEMPTS > 0);
    }

    #[test]
    fn too_many_boxes() {
        let mut s = session();
        for _ in 0..MAX_TEXT_BOXES {
            s.add_text_box().unwrap();
        }
        assert_that!(s.add_text_box()).is_err().is_equal_to(EditorError::TooManyTextBoxes);
    }

    #[test]
    fn drag_is_clamped() {
        let mut s = session();
        let id = s.add_text_box().unwrap();
        s.move_to(id, Point::new(10.0, 10.0)).unwrap();
        assert_eq!(Point::new(15.0, 30.0), s.move_by(id, 5.0, 20.0).unwrap());
        assert_eq!(Point::new(0.0, 800.0), s.move_by(id, -100.0, 5000.0).unwrap());
    }

    #[test]
    fn edit_and_restyle() {
        let mut s = session();
        let id = s.add_text_box().unwrap();
        s.edit_text(id, "One does not simply").unwrap();
        s.set_font(id, FontVariant::Spaced).unwrap();
        s.set_color(id, MemeColor::Yellow).unwrap();
        s.set_size(id, 48.0).unwrap();

        let tb = s.get(id).unwrap();
        assert_eq!("One does not simply", tb.text);
        assert_eq!(MemeTextStyle::new(FontVariant::Spaced, MemeColor::Yellow, 48.0), tb.style);
    }

    #[test]
    fn text_too_long() {
        let mut s = session();
        let id = s.add_text_box().unwrap();
        let text: String = ::std::iter::repeat('x').take(MAX_TEXT_LENGTH + 1).collect();
        assert_that!(s.edit_text(id, text)).is_err()
            .is_equal_to(EditorError::TextTooLong(MAX_TEXT_LENGTH + 1));
    }

    #[test]
    fn delete_selected_clears_selection() {
        let mut s = session();
        let a = s.add_text_box().unwrap();
        let b = s.add_text_box().unwrap();
        assert_eq!(Some(b), s.delete_selected().map(|tb| tb.id));
        assert_eq!(None, s.selected_id());
        s.select(a).unwrap();
        s.delete(a).unwrap();
        assert_that!(s.selected()).is_none();
        assert!(s.is_empty());
    }

    #[test]
    fn unknown_ids() {
        let mut s = session();
        let missing = TextBoxId(42);
        assert_that!(s.select(missing)).is_err().is_equal_to(EditorError::NoSuchTextBox(missing));
        assert_that!(s.move_by(missing, 1.0, 1.0)).is_err();
        assert_that!(s.delete(missing)).is_err();
    }

    #[test]
    fn undo_is_disabled() {
        let mut s = session();
        s.add_text_box().unwrap();
        assert!(!s.can_undo());
        assert!(!s.undo());
        assert!(!s.can_redo());
        assert!(!s.redo());
        assert_eq!(1, s.len());
    }
}
