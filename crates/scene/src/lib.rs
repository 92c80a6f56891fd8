pub mod building;
pub mod depth;
pub mod hit_registry;
pub mod view;
pub mod visibility;

pub use building::*;
pub use depth::*;
pub use hit_registry::*;
pub use view::*;
pub use visibility::*;
