//! Module implementing the text box editing model.

mod error;
mod placement;
mod session;


pub use self::error::EditorError;
pub use self::placement::{place as place_text_box,
                          place_with as place_text_box_with,
                          Placement};
pub use self::session::EditorSession;
