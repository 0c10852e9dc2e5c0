//! Stateful per-frame animators.

pub mod particles;
pub mod rain;
