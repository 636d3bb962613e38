//! Module implementing the placement heuristic for new text boxes.
//!
//! This is deliberately cheap: candidates are checked against
//! the positions of existing boxes only, without any real collision geometry.

use crate::model::{Point, Size, PLACEMENT_ATTEMPTS, PLACEMENT_STEP};


/// Result of placing a text box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Where the box should go.
    pub position: Point,
    /// How many candidate positions have been checked.
    pub attempts: usize,
    /// Whether the position is clear of other boxes.
    /// If not, the attempt budget has been exhausted and the box may overlap.
    pub accepted: bool,
}


/// Find a position for a new text box of given size
/// that doesn't coincide with any of the existing boxes.
///
/// Returns `None` if the image has no area to place anything in.
#[inline]
pub fn place(box_size: Size, image_size: Size, existing: &[Point]) -> Option<Placement> {
    place_with(PLACEMENT_ATTEMPTS, PLACEMENT_STEP, box_size, image_size, existing)
}

/// Find a position for a new text box, with custom attempt budget and step.
pub fn place_with(attempts: usize, step: f32,
                  box_size: Size, image_size: Size,
                  existing: &[Point]) -> Option<Placement> {
    if image_size.is_empty() || attempts == 0 {
        trace!("Not placing a text box within an image of size {:?}", image_size);
        return None;
    }

    // Top-left corners further than this would push the box out of the image.
    let max_x = (image_size.width - box_size.width).max(0.0);
    let max_y = (image_size.height - box_size.height).max(0.0);
    let min_distance = box_size.width / 2.0;

    let mut candidate = Point::new(max_x / 2.0, max_y / 2.0);
    for attempt in 1..=attempts {
        if existing.iter().all(|p| p.distance_to(candidate) > min_distance) {
            trace!("Placing {:?} text box at {:?} after {} attempt(s)",
                box_size, candidate, attempt);
            return Some(Placement{position: candidate, attempts: attempt, accepted: true});
        }
        if attempt < attempts {
            candidate = Point::new((candidate.x + step).min(max_x),
                                   (candidate.y + step).min(max_y));
        }
    }

    debug!("No free spot for {:?} text box within {} attempts, settling for {:?}",
        box_size, attempts, candidate);
    Some(Placement{position: candidate, attempts, accepted: false})
}
