pub mod bounds;
pub mod color;
pub mod math;
pub mod solar;
pub mod time;

// Foundation crate: small, well-tested primitives with no dependencies.
pub use bounds::*;
pub use color::*;
pub use solar::*;
pub use time::*;
