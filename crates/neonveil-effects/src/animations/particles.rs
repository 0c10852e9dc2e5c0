//! Floating particle field (stateful).

use neonveil_config::{BoundaryPolicy, ParticleSettings};
use neonveil_core::{Container, DueFrames, Environment, FrameHandle, FrameScheduler, Rgb, VisualQuality};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::surface::Surface;

/// Largest velocity component magnitude, in px/frame.
pub const MAX_SPEED: f32 = 0.25;

/// Phase advance per frame for pulsing particles.
const PULSE_STEP: f32 = 0.02;

/// A drifting glow dot.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in px from the surface's top-left corner.
    pub x: f32,
    pub y: f32,
    /// Velocity in px/frame, each component within [-0.5, 0.5).
    pub vx: f32,
    pub vy: f32,
    /// Radius in px, within [1, 4).
    pub radius: f32,
    /// Base opacity, within [0.3, 0.8).
    pub opacity: f32,
    /// Drawn from the configured palette.
    pub color: Rgb,
    /// Pulse phase in radians.
    pub phase: f32,
}

impl Particle {
    /// Create a particle at a uniformly random state inside `width` x `height`.
    pub fn random(rng: &mut impl Rng, width: f32, height: f32, palette: &[Rgb]) -> Self {
        Self {
            x: rng.gen_range(0.0..1.0) * width,
            y: rng.gen_range(0.0..1.0) * height,
            vx: (rng.gen_range(0.0..1.0) - 0.5) * MAX_SPEED * 2.0,
            vy: (rng.gen_range(0.0..1.0) - 0.5) * MAX_SPEED * 2.0,
            radius: rng.gen_range(0.0..1.0) * 3.0 + 1.0,
            opacity: rng.gen_range(0.0..1.0) * 0.5 + 0.3,
            color: palette[rng.gen_range(0..palette.len())],
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }

    /// Move one frame and apply the boundary policy.
    pub fn step(&mut self, width: f32, height: f32, boundary: BoundaryPolicy) {
        self.x += self.vx;
        self.y += self.vy;
        match boundary {
            BoundaryPolicy::Reflect => {
                if self.x < 0.0 || self.x > width {
                    self.vx = -self.vx;
                }
                if self.y < 0.0 || self.y > height {
                    self.vy = -self.vy;
                }
                self.x = self.x.clamp(0.0, width.max(0.0));
                self.y = self.y.clamp(0.0, height.max(0.0));
            }
            BoundaryPolicy::Wrap => {
                self.x = wrap(self.x, width);
                self.y = wrap(self.y, height);
            }
        }
    }

    /// Radius and opacity to draw with, pulsed if requested.
    pub fn appearance(&self, pulse: bool) -> (f32, f32) {
        if pulse {
            let wave = self.phase.sin();
            (
                self.radius + wave * 0.5,
                (self.opacity + wave * 0.2).clamp(0.0, 1.0),
            )
        } else {
            (self.radius, self.opacity)
        }
    }
}

fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Fixed-size set of drifting glow dots over one surface.
#[derive(Debug)]
pub struct ParticleField {
    settings: ParticleSettings,
    particles: Vec<Particle>,
    /// Attached drawing surface. `None` until initialized and after teardown.
    surface: Option<Surface>,
    /// Host region the surface covers.
    container: Option<Container>,
    /// Target population; `particles` is regenerated to this size.
    count: usize,
    /// Pulsing for the current frame, settings gated by heavy effects.
    pulse: bool,
    /// Outstanding frame request.
    frame: Option<FrameHandle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(settings: ParticleSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic field for a given seed.
    pub fn seeded(settings: ParticleSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: ParticleSettings, rng: StdRng) -> Self {
        let pulse = settings.pulse;
        Self {
            settings,
            particles: Vec::new(),
            surface: None,
            container: None,
            count: 0,
            pulse,
            frame: None,
            rng,
        }
    }

    /// Attach a surface to the container and start animating `count`
    /// particles.
    ///
    /// Does nothing under reduced motion, on mobile viewports, or when the
    /// field is already running.
    pub fn initialize(
        &mut self,
        container: &Container,
        count: usize,
        env: &Environment,
        frames: &mut FrameScheduler,
    ) {
        if env.reduced_motion() || env.is_mobile() {
            tracing::debug!(
                reduced_motion = env.reduced_motion(),
                mobile = env.is_mobile(),
                "particle field disabled"
            );
            return;
        }
        if self.surface.is_some() {
            return;
        }
        self.surface = Some(Surface::new(container));
        self.container = Some(container.clone());
        self.count = count;
        self.populate();
        self.frame = Some(frames.request());
        tracing::info!(count, container = container.name(), "particle field started");
    }

    /// Advance every particle one frame and repaint the surface.
    pub fn advance_frame(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let (width, height) = (surface.width(), surface.height());
        surface.clear();
        for particle in &mut self.particles {
            particle.step(width, height, self.settings.boundary);
            if self.pulse {
                particle.phase = (particle.phase + PULSE_STEP) % std::f32::consts::TAU;
            }
            let (radius, alpha) = particle.appearance(self.pulse);
            surface.plot_disc(particle.x, particle.y, radius, particle.color, alpha);
        }
    }

    /// Run one frame if this field's request is due, then request the next.
    pub fn tick(&mut self, due: &DueFrames, frames: &mut FrameScheduler, quality: &VisualQuality) {
        let Some(handle) = self.frame else {
            return;
        };
        if !due.contains(handle) {
            return;
        }
        self.apply_quality(quality);
        self.advance_frame();
        self.frame = Some(frames.request());
    }

    /// Follow the shared quality flags.
    pub fn apply_quality(&mut self, quality: &VisualQuality) {
        self.pulse = self.settings.pulse && quality.heavy_effects;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_opacity(quality.particle_opacity);
        }
    }

    /// Re-measure the container and rebuild every particle for the new size.
    pub fn resize(&mut self, container: &Container, env: &Environment) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(container);
        self.container = Some(container.clone());
        self.count = self.settings.count_for(env.is_mobile());
        self.populate();
        tracing::debug!(count = self.count, "particle field resized");
    }

    /// Stop animating and detach the surface. Safe to call repeatedly.
    pub fn teardown(&mut self, frames: &mut FrameScheduler) {
        if let Some(handle) = self.frame.take() {
            frames.cancel(handle);
        }
        if self.surface.take().is_some() {
            tracing::debug!("particle field torn down");
        }
        self.container = None;
        self.particles.clear();
    }

    pub fn is_active(&self) -> bool {
        self.surface.is_some()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Particle count the field was last populated with.
    pub fn target_count(&self) -> usize {
        self.count
    }

    fn populate(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let (width, height) = (surface.width(), surface.height());
        let palette = &self.settings.palette;
        let rng = &mut self.rng;
        self.particles = (0..self.count)
            .map(|_| Particle::random(rng, width, height, palette))
            .collect();
    }
}
