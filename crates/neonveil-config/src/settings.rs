//! Configuration sections.

use neonveil_core::Rgb;
use serde::{Deserialize, Serialize};

/// What a particle does when it reaches an edge of its surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Invert the velocity component and clamp back inside.
    #[default]
    Reflect,
    /// Re-enter from the opposite edge.
    Wrap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Minimize animation, as with an OS-level reduced-motion preference.
    pub reduced: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Network effective type (`slow-2g`, `2g`, `3g`, `4g`), if known.
    pub connection: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub count_desktop: usize,
    pub count_mobile: usize,
    /// Accent colors; each particle picks one uniformly at creation.
    pub palette: Vec<Rgb>,
    pub boundary: BoundaryPolicy,
    /// Sinusoidally pulse radius and opacity.
    pub pulse: bool,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            count_desktop: 50,
            count_mobile: 20,
            palette: vec![Rgb::NEON_GREEN, Rgb::EMBER],
            boundary: BoundaryPolicy::Reflect,
            pulse: false,
        }
    }
}

impl ParticleSettings {
    /// Target particle count for the given viewport class.
    pub fn count_for(&self, is_mobile: bool) -> usize {
        if is_mobile {
            self.count_mobile
        } else {
            self.count_desktop
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainSettings {
    pub column_width_px: f32,
    /// Slowest fall speed in px/frame (inclusive).
    pub min_speed: f32,
    /// Fastest fall speed in px/frame (exclusive).
    pub max_speed: f32,
    /// Per-frame probability that a drop swaps its glyph.
    pub glyph_reroll_chance: f64,
    /// Alpha of the black overlay painted each frame.
    pub trail_fade: f32,
    /// Opacity of the whole rain surface.
    pub opacity: f32,
    pub color: Rgb,
}

impl Default for RainSettings {
    fn default() -> Self {
        Self {
            column_width_px: 20.0,
            min_speed: 2.0,
            max_speed: 5.0,
            glyph_reroll_chance: 0.02,
            trail_fade: 0.05,
            opacity: 0.35,
            color: Rgb::NEON_GREEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    /// Sample frame rate on desktop viewports.
    pub monitor: bool,
    pub low_fps_threshold: f32,
    /// Samples required before the average is trusted.
    pub min_samples: usize,
    /// Capacity of the rolling sample window.
    pub window: usize,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            monitor: true,
            low_fps_threshold: 30.0,
            min_samples: 5,
            window: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// One entry of the expandable project list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub details: String,
}

impl ProjectEntry {
    fn new(title: &str, summary: &str, details: &str) -> Self {
        Self {
            title: title.to_string(),
            summary: summary.to_string(),
            details: details.to_string(),
        }
    }
}

pub(crate) fn default_projects() -> Vec<ProjectEntry> {
    vec![
        ProjectEntry::new(
            "Home lab SOC",
            "Log pipeline and detection rules for a small network.",
            "Syslog collection, Sigma rules translated to queries, and alert triage dashboards.",
        ),
        ProjectEntry::new(
            "Packet dissector",
            "Protocol parser for a proprietary IoT beacon.",
            "Reverse engineered framing and checksums, then wrote a dissector and a fuzzing corpus.",
        ),
        ProjectEntry::new(
            "CTF write-ups",
            "Solutions for web, pwn and crypto challenges.",
            "Heap exploitation notes, padding-oracle tooling and a reusable exploit template.",
        ),
        ProjectEntry::new(
            "Hardened workstation",
            "Reproducible secure desktop build.",
            "Full-disk encryption, secure boot, application sandboxing and audited defaults.",
        ),
    ]
}
