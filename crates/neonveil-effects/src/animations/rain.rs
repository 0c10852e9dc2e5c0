//! Matrix rain animation (stateful).

use neonveil_config::RainSettings;
use neonveil_core::{Container, DueFrames, Environment, FrameHandle, FrameScheduler, VisualQuality};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::chars::RAIN_GLYPHS;
use crate::surface::Surface;

/// State for a single falling column.
#[derive(Debug, Clone, PartialEq)]
pub struct RainDrop {
    pub column: usize,
    /// Left edge of the column, fixed for the drop's lifetime.
    pub x: f32,
    /// Baseline of the glyph.
    pub y: f32,
    /// Fall speed in px/frame.
    pub speed: f32,
    pub glyph: char,
}

/// Number of columns that fit in `width`.
pub fn column_count(width: f32, column_width: f32) -> usize {
    if column_width <= 0.0 || width <= 0.0 {
        return 0;
    }
    (width / column_width).floor() as usize
}

/// Pick a glyph uniformly from the rain alphabet.
pub fn random_glyph(rng: &mut impl Rng) -> char {
    RAIN_GLYPHS[rng.gen_range(0..RAIN_GLYPHS.len())]
}

/// One falling glyph per fixed-width column across a surface.
#[derive(Debug)]
pub struct RainColumnEffect {
    settings: RainSettings,
    drops: Vec<RainDrop>,
    surface: Option<Surface>,
    frame: Option<FrameHandle>,
    rng: StdRng,
}

impl RainColumnEffect {
    pub fn new(settings: RainSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic effect for a given seed.
    pub fn seeded(settings: RainSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: RainSettings, rng: StdRng) -> Self {
        Self {
            settings,
            drops: Vec::new(),
            surface: None,
            frame: None,
            rng,
        }
    }

    /// Attach a surface to the container and start the columns falling.
    ///
    /// Does nothing under reduced motion or when already running.
    pub fn initialize(
        &mut self,
        container: &Container,
        env: &Environment,
        frames: &mut FrameScheduler,
    ) {
        if env.reduced_motion() {
            tracing::debug!("rain disabled by reduced motion");
            return;
        }
        if self.surface.is_some() {
            return;
        }
        let mut surface = Surface::new(container);
        surface.set_opacity(self.settings.opacity);
        self.surface = Some(surface);
        self.create_drops();
        self.frame = Some(frames.request());
        tracing::info!(
            columns = self.drops.len(),
            container = container.name(),
            "rain started"
        );
    }

    /// Fade the previous frame, draw every drop, then move the drops.
    pub fn advance_frame(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let height = surface.height();
        surface.fade(self.settings.trail_fade);
        for drop in &mut self.drops {
            surface.draw_glyph(drop.x, drop.y, drop.glyph, self.settings.color);
            drop.y += drop.speed;
            if drop.y > height {
                drop.y = 0.0;
                drop.glyph = random_glyph(&mut self.rng);
            }
            if self.rng.gen_bool(self.settings.glyph_reroll_chance) {
                drop.glyph = random_glyph(&mut self.rng);
            }
        }
    }

    /// Run one frame if this effect's request is due, then request the next.
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
        if let Some(surface) = self.surface.as_mut() {
            surface.set_visible(quality.rain_visible);
        }
    }

    /// Re-measure the container and rebuild the columns.
    pub fn resize(&mut self, container: &Container) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(container);
        self.create_drops();
        tracing::debug!(columns = self.drops.len(), "rain resized");
    }

    /// Stop animating and detach the surface. Safe to call repeatedly.
    pub fn teardown(&mut self, frames: &mut FrameScheduler) {
        if let Some(handle) = self.frame.take() {
            frames.cancel(handle);
        }
        if self.surface.take().is_some() {
            tracing::debug!("rain torn down");
        }
        self.drops.clear();
    }

    pub fn is_active(&self) -> bool {
        self.surface.is_some()
    }

    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    /// Mutable access to the drops, for driving specific states.
    pub fn drops_mut(&mut self) -> &mut [RainDrop] {
        &mut self.drops
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    fn create_drops(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let height = surface.height();
        let column_width = self.settings.column_width_px;
        let (min_speed, max_speed) = (self.settings.min_speed, self.settings.max_speed);
        let rng = &mut self.rng;
        self.drops = (0..column_count(surface.width(), column_width))
            .map(|column| RainDrop {
                column,
                x: column as f32 * column_width,
                y: rng.gen_range(0.0..1.0) * height,
                speed: rng.gen_range(min_speed..max_speed),
                glyph: random_glyph(rng),
            })
            .collect();
    }
}
