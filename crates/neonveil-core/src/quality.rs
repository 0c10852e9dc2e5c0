//! Visual-quality flags written by the performance controller and read by
//! the animators and UI.

use std::time::Duration;

/// Default duration for UI transitions.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(600);

/// Transition duration applied on low-performance devices.
pub const LOW_PERFORMANCE_ANIMATION_DURATION: Duration = Duration::from_millis(200);

/// Particle surface opacity after an emergency degrade.
pub const EMERGENCY_PARTICLE_OPACITY: f32 = 0.03;

#[derive(Debug, Clone, PartialEq)]
pub struct VisualQuality {
    /// Base duration for UI transitions and choreography.
    pub animation_duration: Duration,
    /// Whether decorative extras such as particle pulsing run.
    pub heavy_effects: bool,
    /// Opacity multiplier applied to the particle surface.
    pub particle_opacity: f32,
    /// Whether the rain surface is displayed at all.
    pub rain_visible: bool,
}

impl Default for VisualQuality {
    fn default() -> Self {
        Self {
            animation_duration: DEFAULT_ANIMATION_DURATION,
            heavy_effects: true,
            particle_opacity: 1.0,
            rain_visible: true,
        }
    }
}

impl VisualQuality {
    /// Whether an emergency degrade has been applied.
    pub fn is_degraded(&self) -> bool {
        !self.rain_visible || self.particle_opacity < 1.0
    }

    /// Scale a nominal transition delay by the current animation duration.
    pub fn scale(&self, nominal: Duration) -> Duration {
        let nanos = nominal.as_nanos() * self.animation_duration.as_nanos()
            / DEFAULT_ANIMATION_DURATION.as_nanos();
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
