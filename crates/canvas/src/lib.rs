pub mod raster;
pub mod surface;
pub mod trace;

pub use raster::*;
pub use surface::*;
pub use trace::*;
