//! Ambient effects for neonveil.
//!
//! This crate provides the two animated backdrops (a drifting particle field
//! and falling rain columns), the cell surface they paint into, and the
//! performance controller that degrades them on slow hosts.

mod animations;
mod chars;
mod error;
mod performance;
mod state;
mod surface;

pub use animations::particles::{MAX_SPEED, Particle, ParticleField};
pub use animations::rain::{RainColumnEffect, RainDrop, column_count, random_glyph};
pub use chars::RAIN_GLYPHS;
pub use error::InitError;
pub use performance::{
    DeviceSignals, MIN_CORES, MOBILE_AGENTS, PerformanceController, SLOW_CONNECTIONS, detect,
};
pub use state::BackdropState;
pub use surface::{Surface, Texel};
