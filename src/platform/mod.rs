//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (display refresh to simulation frames)

pub mod clock;

pub use clock::FrameClock;
