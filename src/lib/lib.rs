//!
//! lolz  -- Memes on demand
//!

             extern crate antidote;
             extern crate either;
#[macro_use] extern crate enum_derive;
             extern crate futures;
             extern crate futures_cpupool;
             extern crate glob;
             extern crate image;
             extern crate itertools;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
             extern crate lru_cache;
#[macro_use] extern crate macro_attr;
#[macro_use] extern crate maplit;
             extern crate rusttype;
             extern crate serde;
#[macro_use] extern crate serde_derive;
             extern crate serde_json;
             extern crate thiserror;
             extern crate time;


#[cfg(test)] #[macro_use] extern crate spectral;
#[cfg(test)]              extern crate tempfile;


mod editor;
mod model;
mod render;
mod resources;
mod storage;
mod studio;
mod util;


pub use crate::editor::*;
pub use crate::model::*;
pub use crate::render::*;
pub use crate::resources::*;
pub use crate::storage::*;
pub use crate::studio::*;
pub use crate::util::cache::*;
