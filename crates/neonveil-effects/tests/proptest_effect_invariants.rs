//! Property-based invariant tests for the animators.
//!
//! 1. Particles stay inside their surface after any number of frames.
//! 2. A velocity component flips exactly when the step would leave bounds.
//! 3. Resize followed by a frame yields counts matching the new size.
//! 4. Overflowing drops restart at the top with a valid glyph.
//! 5. Teardown is idempotent and leaves nothing attached.

use neonveil_config::{BoundaryPolicy, ParticleSettings, RainSettings};
use neonveil_core::{Container, Environment, FrameScheduler, PxSize, Rgb};
use neonveil_effects::{
    MAX_SPEED, Particle, ParticleField, RAIN_GLYPHS, RainColumnEffect, column_count,
};
use proptest::prelude::*;
use ratatui::layout::Rect;

// ── Helpers ─────────────────────────────────────────────────────────────

fn desktop() -> Environment {
    Environment::capture(PxSize::new(1280.0, 720.0), false)
}

fn area_strategy() -> impl Strategy<Value = Rect> {
    (1u16..=240, 1u16..=80).prop_map(|(w, h)| Rect::new(0, 0, w, h))
}

fn boundary_strategy() -> impl Strategy<Value = BoundaryPolicy> {
    prop_oneof![Just(BoundaryPolicy::Reflect), Just(BoundaryPolicy::Wrap)]
}

fn velocity_strategy() -> impl Strategy<Value = f32> {
    -MAX_SPEED..=MAX_SPEED
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Clamp invariant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn particles_stay_in_bounds(
        area in area_strategy(),
        boundary in boundary_strategy(),
        seed in any::<u64>(),
        frames_to_run in 0usize..400,
    ) {
        let settings = ParticleSettings { boundary, ..Default::default() };
        let mut frames = FrameScheduler::new();
        let mut field = ParticleField::seeded(settings, seed);
        field.initialize(&Container::new(Container::PARTICLES, area), 40, &desktop(), &mut frames);

        for _ in 0..frames_to_run {
            field.advance_frame();
        }

        let size = PxSize::from_rect(area);
        for p in field.particles() {
            prop_assert!(p.x >= 0.0 && p.x <= size.width, "x={} width={}", p.x, size.width);
            prop_assert!(p.y >= 0.0 && p.y <= size.height, "y={} height={}", p.y, size.height);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Reflection flips exactly on boundary contact
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reflection_flips_only_when_leaving(
        x in 0.0f32..=100.0,
        y in 0.0f32..=100.0,
        vx in velocity_strategy(),
        vy in velocity_strategy(),
    ) {
        let mut p = Particle { x, y, vx, vy, radius: 2.0, opacity: 0.5, color: Rgb::NEON_GREEN, phase: 0.0 };
        let (next_x, next_y) = (x + vx, y + vy);
        p.step(100.0, 100.0, BoundaryPolicy::Reflect);

        let left_x = !(0.0..=100.0).contains(&next_x);
        let left_y = !(0.0..=100.0).contains(&next_y);
        prop_assert_eq!(p.vx, if left_x { -vx } else { vx });
        prop_assert_eq!(p.vy, if left_y { -vy } else { vy });
    }

    #[test]
    fn still_particle_never_moves(
        x in 0.0f32..=100.0,
        y in 0.0f32..=100.0,
        boundary in boundary_strategy(),
        steps in 1usize..200,
    ) {
        let mut p = Particle { x, y, vx: 0.0, vy: 0.0, radius: 1.0, opacity: 0.3, color: Rgb::EMBER, phase: 0.0 };
        for _ in 0..steps {
            p.step(100.0, 100.0, boundary);
        }
        // Wrap maps the far edge onto the near one; nothing else may change.
        if boundary == BoundaryPolicy::Reflect || (x < 100.0 && y < 100.0) {
            prop_assert_eq!((p.x, p.y), (x, y));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Resize then advance
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_then_advance_matches_new_size(
        before in area_strategy(),
        after in area_strategy(),
        seed in any::<u64>(),
    ) {
        let env = desktop();
        let mut frames = FrameScheduler::new();

        let mut rain = RainColumnEffect::seeded(RainSettings::default(), seed);
        rain.initialize(&Container::new(Container::RAIN, before), &env, &mut frames);
        rain.resize(&Container::new(Container::RAIN, after));
        rain.advance_frame();
        let width = PxSize::from_rect(after).width;
        prop_assert_eq!(rain.drops().len(), column_count(width, 20.0));
        prop_assert_eq!(rain.drops().len(), (width / 20.0).floor() as usize);

        let mut field = ParticleField::seeded(ParticleSettings::default(), seed);
        field.initialize(&Container::new(Container::PARTICLES, before), 50, &env, &mut frames);
        field.resize(&Container::new(Container::PARTICLES, after), &env);
        field.advance_frame();
        prop_assert_eq!(field.particles().len(), 50);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Overflow wraps to the top
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overflowing_drop_restarts_at_top(
        area in area_strategy(),
        overshoot in 0.001f32..500.0,
        seed in any::<u64>(),
    ) {
        let mut frames = FrameScheduler::new();
        let mut rain = RainColumnEffect::seeded(RainSettings::default(), seed);
        rain.initialize(&Container::new(Container::RAIN, area), &desktop(), &mut frames);
        prop_assume!(!rain.drops().is_empty());

        let height = PxSize::from_rect(area).height;
        rain.drops_mut()[0].y = height + overshoot;
        rain.advance_frame();

        prop_assert_eq!(rain.drops()[0].y, 0.0);
        prop_assert!(RAIN_GLYPHS.contains(&rain.drops()[0].glyph));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Teardown idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn teardown_twice_detaches_everything(area in area_strategy(), seed in any::<u64>()) {
        let env = desktop();
        let mut frames = FrameScheduler::new();
        let mut rain = RainColumnEffect::seeded(RainSettings::default(), seed);
        let mut field = ParticleField::seeded(ParticleSettings::default(), seed);
        rain.initialize(&Container::new(Container::RAIN, area), &env, &mut frames);
        field.initialize(&Container::new(Container::PARTICLES, area), 30, &env, &mut frames);

        for _ in 0..2 {
            rain.teardown(&mut frames);
            field.teardown(&mut frames);
        }
        prop_assert!(rain.surface().is_none());
        prop_assert!(field.surface().is_none());
        prop_assert_eq!(frames.pending_count(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// End to end: column count at exact and non-multiple widths
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn column_count_truncates_at_non_multiple_width() {
    assert_eq!(column_count(800.0, 20.0), 40);
    assert_eq!(column_count(815.0, 20.0), 40);

    let mut frames = FrameScheduler::new();
    let mut rain = RainColumnEffect::seeded(RainSettings::default(), 42);
    rain.initialize(
        &Container::new(Container::RAIN, Rect::new(0, 0, 80, 24)),
        &desktop(),
        &mut frames,
    );
    assert_eq!(rain.drops().len(), 40);

    // 81 cells = 810 px, still 40 whole columns
    rain.resize(&Container::new(Container::RAIN, Rect::new(0, 0, 81, 24)));
    assert_eq!(rain.drops().len(), 40);
}
