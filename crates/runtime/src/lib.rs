pub mod event_bus;
pub mod redraw;
pub mod timers;

pub use event_bus::*;
pub use redraw::*;
pub use timers::*;
