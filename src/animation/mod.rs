//! Time-based property animation.
//!
//! - [`Tween`]: the generic "animate a value toward a target over a
//!   duration" primitive
//! - [`TweenScheduler`]: per-scene table of tweens keyed by
//!   `(node, channel)`, last writer wins
//! - [`Ease`]: easing curves

pub mod ease;
pub mod scheduler;
pub mod tween;
pub mod values;

pub use ease::Ease;
pub use scheduler::{TweenChannel, TweenKey, TweenScheduler, TweenStep};
pub use tween::Tween;
pub use values::Interpolatable;
