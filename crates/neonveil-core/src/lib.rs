//! Core types shared by the neonveil crates.
//!
//! Geometry is expressed in logical pixels so that effect parameters (column
//! widths, particle speeds, the mobile breakpoint) keep their meaning no
//! matter how the host maps pixels onto terminal cells.

mod color;
mod environment;
mod frame;
mod geometry;
mod quality;

pub use color::{ParseRgbError, Rgb};
pub use environment::{BodyClass, Environment};
pub use frame::{DueFrames, FrameHandle, FrameScheduler};
pub use geometry::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Container, MOBILE_BREAKPOINT_PX, PxSize};
pub use quality::{
    DEFAULT_ANIMATION_DURATION, EMERGENCY_PARTICLE_OPACITY, LOW_PERFORMANCE_ANIMATION_DURATION,
    VisualQuality,
};
