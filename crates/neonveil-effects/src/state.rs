//! Backdrop state management.

use neonveil_config::{ParticleSettings, RainSettings};
use neonveil_core::{Container, DueFrames, Environment, FrameScheduler, VisualQuality};
use ratatui::{Frame, layout::Rect};

use crate::animations::{particles::ParticleField, rain::RainColumnEffect};
use crate::error::{InitError, Result};

/// Both animated backdrops and the containers hosting them.
///
/// Rain is painted first so particles float over it.
#[derive(Debug)]
pub struct BackdropState {
    particles: ParticleField,
    rain: RainColumnEffect,
    particle_container: Container,
    rain_container: Container,
    particle_settings: ParticleSettings,
    rain_settings: RainSettings,
}

impl BackdropState {
    pub fn new(particle_settings: ParticleSettings, rain_settings: RainSettings) -> Self {
        Self::from_parts(
            ParticleField::new(particle_settings.clone()),
            RainColumnEffect::new(rain_settings.clone()),
            particle_settings,
            rain_settings,
        )
    }

    /// Deterministic backdrop for a given seed.
    pub fn seeded(particle_settings: ParticleSettings, rain_settings: RainSettings, seed: u64) -> Self {
        Self::from_parts(
            ParticleField::seeded(particle_settings.clone(), seed),
            RainColumnEffect::seeded(rain_settings.clone(), seed.wrapping_add(1)),
            particle_settings,
            rain_settings,
        )
    }

    fn from_parts(
        particles: ParticleField,
        rain: RainColumnEffect,
        particle_settings: ParticleSettings,
        rain_settings: RainSettings,
    ) -> Self {
        Self {
            particles,
            rain,
            particle_container: Container::new(Container::PARTICLES, Rect::default()),
            rain_container: Container::new(Container::RAIN, Rect::default()),
            particle_settings,
            rain_settings,
        }
    }

    /// Start the rain, then the particle field, over `area`.
    ///
    /// Settings the effects cannot run with are rejected before anything is
    /// attached.
    pub fn initialize(
        &mut self,
        area: Rect,
        env: &Environment,
        frames: &mut FrameScheduler,
    ) -> Result<()> {
        self.check_settings()?;
        self.place(area);
        if area.is_empty() {
            tracing::debug!("backdrop area is empty, effects not started");
            return Ok(());
        }
        self.rain.initialize(&self.rain_container, env, frames);
        let count = self.particle_settings.count_for(env.is_mobile());
        self.particles
            .initialize(&self.particle_container, count, env, frames);
        Ok(())
    }

    /// Rebuild both effects for a new viewport.
    ///
    /// Running effects are resized in place. Effects that were never started
    /// (for example because the viewport used to be mobile) are started if
    /// the new snapshot allows it.
    pub fn resize(&mut self, area: Rect, env: &Environment, frames: &mut FrameScheduler) {
        self.place(area);
        if area.is_empty() || self.check_settings().is_err() {
            return;
        }
        if self.rain.is_active() {
            self.rain.resize(&self.rain_container);
        } else {
            self.rain.initialize(&self.rain_container, env, frames);
        }
        if self.particles.is_active() {
            self.particles.resize(&self.particle_container, env);
        } else {
            let count = self.particle_settings.count_for(env.is_mobile());
            self.particles
                .initialize(&self.particle_container, count, env, frames);
        }
    }

    /// Advance whichever effects have a frame due.
    pub fn tick(&mut self, due: &DueFrames, frames: &mut FrameScheduler, quality: &VisualQuality) {
        self.rain.tick(due, frames, quality);
        self.particles.tick(due, frames, quality);
    }

    /// Render the backdrop to the frame.
    pub fn render(&self, frame: &mut Frame) {
        if let Some(surface) = self.rain.surface() {
            frame.render_widget(surface, self.rain_container.area());
        }
        if let Some(surface) = self.particles.surface() {
            frame.render_widget(surface, self.particle_container.area());
        }
    }

    /// Stop both effects and detach their surfaces.
    pub fn teardown(&mut self, frames: &mut FrameScheduler) {
        self.rain.teardown(frames);
        self.particles.teardown(frames);
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn rain(&self) -> &RainColumnEffect {
        &self.rain
    }

    /// Number of surfaces currently attached.
    pub fn attached_surfaces(&self) -> usize {
        usize::from(self.rain.is_active()) + usize::from(self.particles.is_active())
    }

    fn check_settings(&self) -> Result<()> {
        if self.particle_settings.palette.is_empty() {
            return Err(InitError::EmptyPalette);
        }
        let rain = &self.rain_settings;
        if !rain.column_width_px.is_finite() || rain.column_width_px <= 0.0 {
            return Err(InitError::ColumnWidth(rain.column_width_px));
        }
        if !rain.min_speed.is_finite()
            || !rain.max_speed.is_finite()
            || rain.min_speed >= rain.max_speed
        {
            return Err(InitError::SpeedRange {
                min: rain.min_speed,
                max: rain.max_speed,
            });
        }
        if !(0.0..=1.0).contains(&rain.glyph_reroll_chance) {
            return Err(InitError::RerollChance(rain.glyph_reroll_chance));
        }
        Ok(())
    }

    fn place(&mut self, area: Rect) {
        self.particle_container.set_area(area);
        self.rain_container.set_area(area);
    }
}

#[cfg(test)]
mod tests {
    use neonveil_core::PxSize;

    use super::*;

    fn backdrop() -> BackdropState {
        BackdropState::seeded(ParticleSettings::default(), RainSettings::default(), 11)
    }

    fn env_for(area: Rect, reduced_motion: bool) -> Environment {
        Environment::capture(PxSize::from_rect(area), reduced_motion)
    }

    #[test]
    fn test_initialize_desktop_starts_both() {
        let area = Rect::new(0, 0, 100, 30);
        let mut frames = FrameScheduler::new();
        let mut state = backdrop();
        state.initialize(area, &env_for(area, false), &mut frames).unwrap();

        assert_eq!(state.attached_surfaces(), 2);
        assert_eq!(state.rain().drops().len(), 50);
        assert_eq!(state.particles().particles().len(), 50);
        assert_eq!(frames.pending_count(), 2);
    }

    #[test]
    fn test_initialize_mobile_starts_rain_only() {
        let area = Rect::new(0, 0, 60, 30);
        let mut frames = FrameScheduler::new();
        let mut state = backdrop();
        state.initialize(area, &env_for(area, false), &mut frames).unwrap();

        assert!(state.rain().is_active());
        assert!(!state.particles().is_active());
    }

    #[test]
    fn test_resize_to_desktop_starts_particles() {
        let small = Rect::new(0, 0, 60, 30);
        let large = Rect::new(0, 0, 120, 30);
        let mut frames = FrameScheduler::new();
        let mut state = backdrop();
        state.initialize(small, &env_for(small, false), &mut frames).unwrap();
        state.resize(large, &env_for(large, false), &mut frames);

        assert!(state.particles().is_active());
        assert_eq!(state.particles().particles().len(), 50);
        assert_eq!(state.rain().drops().len(), 60);
    }

    #[test]
    fn test_resize_to_mobile_uses_mobile_count() {
        let large = Rect::new(0, 0, 120, 30);
        let small = Rect::new(0, 0, 60, 30);
        let mut frames = FrameScheduler::new();
        let mut state = backdrop();
        state.initialize(large, &env_for(large, false), &mut frames).unwrap();
        state.resize(small, &env_for(small, false), &mut frames);

        assert_eq!(state.particles().particles().len(), 20);
        assert_eq!(state.rain().drops().len(), 30);
    }

    #[test]
    fn test_reduced_motion_starts_nothing() {
        let area = Rect::new(0, 0, 100, 30);
        let mut frames = FrameScheduler::new();
        let mut state = backdrop();
        state.initialize(area, &env_for(area, true), &mut frames).unwrap();
        state.resize(area, &env_for(area, true), &mut frames);
        assert_eq!(state.attached_surfaces(), 0);
    }

    #[test]
    fn test_bad_settings_are_rejected() {
        let area = Rect::new(0, 0, 100, 30);
        let mut frames = FrameScheduler::new();
        let particles = ParticleSettings {
            palette: Vec::new(),
            ..Default::default()
        };
        let mut state = BackdropState::seeded(particles, RainSettings::default(), 1);
        assert_eq!(
            state.initialize(area, &env_for(area, false), &mut frames),
            Err(InitError::EmptyPalette)
        );

        let rain = RainSettings {
            min_speed: 5.0,
            max_speed: 5.0,
            ..Default::default()
        };
        let mut state = BackdropState::seeded(ParticleSettings::default(), rain, 1);
        assert!(matches!(
            state.initialize(area, &env_for(area, false), &mut frames),
            Err(InitError::SpeedRange { .. })
        ));
        state.resize(area, &env_for(area, false), &mut frames);
        assert_eq!(state.attached_surfaces(), 0);
        assert_eq!(frames.pending_count(), 0);
    }

    #[test]
    fn test_non_finite_rain_settings_are_rejected() {
        let area = Rect::new(0, 0, 100, 30);
        let mut frames = FrameScheduler::new();
        let rain = RainSettings {
            max_speed: f32::INFINITY,
            ..Default::default()
        };
        let mut state = BackdropState::seeded(ParticleSettings::default(), rain, 1);
        assert!(matches!(
            state.initialize(area, &env_for(area, false), &mut frames),
            Err(InitError::SpeedRange { .. })
        ));

        let rain = RainSettings {
            column_width_px: f32::NAN,
            ..Default::default()
        };
        let mut state = BackdropState::seeded(ParticleSettings::default(), rain, 1);
        assert!(matches!(
            state.initialize(area, &env_for(area, false), &mut frames),
            Err(InitError::ColumnWidth(_))
        ));
        assert_eq!(state.attached_surfaces(), 0);
        assert_eq!(frames.pending_count(), 0);
    }

    #[test]
    fn test_tick_then_teardown() {
        let area = Rect::new(0, 0, 100, 30);
        let mut frames = FrameScheduler::new();
        let mut state = backdrop();
        state.initialize(area, &env_for(area, false), &mut frames).unwrap();

        for _ in 0..3 {
            let due = frames.begin_frame();
            state.tick(&due, &mut frames, &VisualQuality::default());
        }
        assert_eq!(frames.pending_count(), 2);

        state.teardown(&mut frames);
        state.teardown(&mut frames);
        assert_eq!(state.attached_surfaces(), 0);
        assert_eq!(frames.pending_count(), 0);
    }
}
