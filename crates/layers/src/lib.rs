pub mod buildings;
pub mod hit;
pub mod shadows;
pub mod shapes;
pub mod simplified;
pub mod stack;

pub use hit::HitPass;
pub use shadows::ShadowPass;
pub use shapes::Shading;
pub use simplified::{MAX_SIMPLE_ZOOM, SIMPLE_HEIGHT_LIMIT, is_simple};
pub use stack::LayerStack;
