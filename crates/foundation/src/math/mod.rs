pub mod mercator;
pub mod precision;
pub mod simplify;
pub mod vec;

pub use mercator::*;
pub use precision::*;
pub use simplify::*;
pub use vec::*;
