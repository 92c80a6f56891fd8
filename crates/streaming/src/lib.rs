pub mod cache;
pub mod source;
pub mod tile;

pub use cache::*;
pub use source::*;
pub use tile::*;
