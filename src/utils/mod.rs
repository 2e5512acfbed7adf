//! Utility Module
//!
//! - [`time`]: frame timing for render loops

pub mod time;

pub use time::Timer;
