pub mod animation;
pub mod instance;
pub mod interact;
pub mod movement;
pub mod registry;

pub use animation::{animate_mascots, AnimationClock, FrameDisplay};
pub use instance::{activate_opened, finalize_closing, FloatingMascot, Lifecycle};
pub use interact::track_hover;
pub use movement::{move_mascots, MovementEngine};
pub use registry::{
    handle_close, handle_show, ActiveMascots, CloseMascot, MascotClosed, ShowMascot,
};
