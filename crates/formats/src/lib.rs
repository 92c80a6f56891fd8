pub mod geojson;
pub mod import;
pub mod materials;

pub use geojson::*;
pub use import::*;
pub use materials::*;
