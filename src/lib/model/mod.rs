//! Module defining the data model of memes and their text boxes.

mod constants;
mod types;


pub use self::constants::*;
pub use self::types::*;
