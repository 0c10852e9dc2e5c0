//! Frame-rate based quality throttle.
//!
//! Two independent mechanisms feed the shared [`VisualQuality`] flags:
//!
//! - a static check of device capabilities at startup, which shortens UI
//!   transitions and disables decorative extras on weak devices, and
//! - a live frame-rate monitor that, once the rolling average stays under
//!   the threshold, dims the particle surface and hides the rain.
//!
//! There is no path back to full quality once the live degrade fires.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use neonveil_config::PerformanceSettings;
use neonveil_core::{
    EMERGENCY_PARTICLE_OPACITY, Environment, LOW_PERFORMANCE_ANIMATION_DURATION, VisualQuality,
};
use sysinfo::{CpuRefreshKind, RefreshKind, System};

/// Devices with fewer logical cores are treated as low performance.
pub const MIN_CORES: usize = 4;

/// Connection effective types considered slow.
pub const SLOW_CONNECTIONS: &[&str] = &["slow-2g", "2g", "3g"];

/// Device-name fragments that mark a mobile client.
pub const MOBILE_AGENTS: &[&str] = &[
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

/// Capability signals used for the static performance check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSignals {
    /// Logical core count, if it could be determined.
    pub logical_cores: Option<usize>,
    /// Network effective type, if known.
    pub connection: Option<String>,
    /// Free-form client description, matched against [`MOBILE_AGENTS`].
    pub user_agent: String,
}

impl DeviceSignals {
    /// Read signals from the host system.
    pub fn probe(connection: Option<String>) -> Self {
        let sys =
            System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
        let cores = sys.cpus().len();
        let user_agent = [
            System::long_os_version(),
            Some(std::env::consts::OS.to_string()),
            std::env::var("TERM_PROGRAM").ok(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        Self {
            logical_cores: (cores > 0).then_some(cores),
            connection,
            user_agent,
        }
    }

    /// Whether the user agent names a mobile client.
    pub fn is_mobile_agent(&self) -> bool {
        let agent = self.user_agent.to_lowercase();
        MOBILE_AGENTS.iter().any(|needle| agent.contains(needle))
    }

    /// Whether the connection is in a slow tier.
    pub fn is_slow_connection(&self) -> bool {
        self.connection
            .as_deref()
            .is_some_and(|c| SLOW_CONNECTIONS.contains(&c.trim().to_lowercase().as_str()))
    }
}

/// Pure capability check: few cores, a slow connection, or a mobile agent.
pub fn detect(signals: &DeviceSignals) -> bool {
    signals.logical_cores.is_some_and(|cores| cores < MIN_CORES)
        || signals.is_slow_connection()
        || signals.is_mobile_agent()
}

/// Samples the achieved frame rate and degrades visual quality when it stays
/// low.
#[derive(Debug)]
pub struct PerformanceController {
    settings: PerformanceSettings,
    /// Result of the last [`PerformanceController::detect`].
    low_performance: bool,
    /// Off on mobile viewports and when disabled in settings.
    monitoring: bool,
    /// Frames counted since `last_sample`.
    frame_count: u32,
    /// Start of the current sampling period. `None` re-anchors on the next
    /// frame.
    last_sample: Option<Instant>,
    /// Most recent sample.
    fps: Option<u32>,
    /// Rolling window, oldest first, at most `settings.window` long.
    samples: VecDeque<u32>,
    emergency_count: u32,
}

impl PerformanceController {
    pub fn new(settings: PerformanceSettings) -> Self {
        let window = settings.window;
        Self {
            settings,
            low_performance: false,
            monitoring: false,
            frame_count: 0,
            last_sample: None,
            fps: None,
            samples: VecDeque::with_capacity(window),
            emergency_count: 0,
        }
    }

    /// Classify the device from its capability signals.
    pub fn detect(&mut self, signals: &DeviceSignals) -> bool {
        self.low_performance = detect(signals);
        tracing::info!(
            low_performance = self.low_performance,
            cores = ?signals.logical_cores,
            connection = ?signals.connection,
            "device performance detected"
        );
        self.low_performance
    }

    pub fn is_low_performance(&self) -> bool {
        self.low_performance
    }

    /// On low-performance devices, shorten transitions and drop heavy effects.
    pub fn apply_static_optimization(&self, quality: &mut VisualQuality) -> bool {
        if !self.low_performance {
            return false;
        }
        quality.animation_duration = LOW_PERFORMANCE_ANIMATION_DURATION;
        quality.heavy_effects = false;
        tracing::info!("static performance optimization applied");
        true
    }

    /// Begin frame-rate sampling from `now`. Mobile viewports are never
    /// sampled.
    pub fn start_monitoring(&mut self, env: &Environment, now: Instant) {
        self.monitoring = self.settings.monitor && !env.is_mobile();
        self.frame_count = 0;
        self.last_sample = Some(now);
        tracing::debug!(monitoring = self.monitoring, "frame-rate monitor armed");
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Drop the sampling period in progress. The next counted frame starts a
    /// fresh one, so time spent paused never reads as a low frame rate.
    pub fn pause_sampling(&mut self) {
        self.frame_count = 0;
        self.last_sample = None;
    }

    /// Count one rendered frame at `now`.
    ///
    /// Once a second has elapsed since the last sample the instantaneous
    /// frame rate is pushed into the rolling window. When the window holds
    /// enough samples and their mean is below the threshold the emergency
    /// optimization is applied and `true` is returned.
    pub fn monitor(&mut self, now: Instant, quality: &mut VisualQuality) -> bool {
        if !self.monitoring {
            return false;
        }
        let Some(last) = self.last_sample else {
            self.last_sample = Some(now);
            return false;
        };
        self.frame_count += 1;

        let elapsed = now.saturating_duration_since(last);
        if elapsed < SAMPLE_PERIOD {
            return false;
        }
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let fps = (f64::from(self.frame_count) * 1000.0 / elapsed_ms).round() as u32;
        self.fps = Some(fps);
        self.push_sample(fps);
        self.frame_count = 0;
        self.last_sample = Some(now);

        match self.average_fps() {
            Some(avg)
                if self.samples.len() >= self.settings.min_samples
                    && avg < f64::from(self.settings.low_fps_threshold) =>
            {
                tracing::warn!(fps, average = avg, "sustained low frame rate");
                self.apply_emergency_optimization(quality);
                true
            }
            _ => false,
        }
    }

    /// Dim the particle surface almost to nothing and hide the rain.
    pub fn apply_emergency_optimization(&mut self, quality: &mut VisualQuality) {
        quality.particle_opacity = EMERGENCY_PARTICLE_OPACITY;
        quality.rain_visible = false;
        self.emergency_count += 1;
        tracing::warn!(
            count = self.emergency_count,
            "emergency performance optimization applied"
        );
    }

    /// Most recent frame-rate sample.
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    /// Mean of the rolling window, if any samples exist.
    pub fn average_fps(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: u64 = self.samples.iter().map(|&s| u64::from(s)).sum();
        Some(sum as f64 / self.samples.len() as f64)
    }

    pub fn samples(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }

    /// How many times the emergency optimization has fired.
    pub fn emergency_count(&self) -> u32 {
        self.emergency_count
    }

    fn push_sample(&mut self, fps: u32) {
        self.samples.push_back(fps);
        while self.samples.len() > self.settings.window {
            self.samples.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use neonveil_core::{DEFAULT_ANIMATION_DURATION, PxSize};

    use super::*;

    fn signals(cores: Option<usize>, connection: Option<&str>, agent: &str) -> DeviceSignals {
        DeviceSignals {
            logical_cores: cores,
            connection: connection.map(str::to_string),
            user_agent: agent.to_string(),
        }
    }

    fn desktop() -> Environment {
        Environment::capture(PxSize::new(1200.0, 800.0), false)
    }

    /// Drive `seconds` worth of frames at a steady `fps`, returning how many
    /// times the emergency path fired.
    fn run(
        controller: &mut PerformanceController,
        quality: &mut VisualQuality,
        start: Instant,
        seconds: u32,
        fps: u32,
    ) -> u32 {
        let mut fired = 0;
        for frame in 1..=u64::from(seconds * fps) {
            let at = start + Duration::from_nanos(1_000_000_000 * frame / u64::from(fps));
            if controller.monitor(at, quality) {
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn test_detect_signals() {
        assert!(!detect(&signals(Some(8), Some("4g"), "Linux 6.1 linux")));
        assert!(detect(&signals(Some(2), None, "Linux")));
        assert!(detect(&signals(Some(8), Some("3g"), "Linux")));
        assert!(detect(&signals(Some(8), Some("Slow-2G"), "Linux")));
        assert!(detect(&signals(Some(8), None, "Android 14 android")));
        assert!(detect(&signals(None, None, "Mozilla (iPhone; CPU iPhone OS)")));
        assert!(!detect(&signals(None, None, "macOS 15 Apple_Terminal")));
    }

    #[test]
    fn test_static_optimization_only_when_low() {
        let mut quality = VisualQuality::default();
        let mut controller = PerformanceController::new(PerformanceSettings::default());

        controller.detect(&signals(Some(16), None, "Linux"));
        assert!(!controller.apply_static_optimization(&mut quality));
        assert_eq!(quality.animation_duration, DEFAULT_ANIMATION_DURATION);

        controller.detect(&signals(Some(2), None, "Linux"));
        assert!(controller.apply_static_optimization(&mut quality));
        assert_eq!(quality.animation_duration, LOW_PERFORMANCE_ANIMATION_DURATION);
        assert!(!quality.heavy_effects);
        assert!(quality.rain_visible);
    }

    #[test]
    fn test_sample_is_rounded_frames_per_second() {
        let mut quality = VisualQuality::default();
        let mut controller = PerformanceController::new(PerformanceSettings::default());
        let start = Instant::now();
        controller.start_monitoring(&desktop(), start);

        run(&mut controller, &mut quality, start, 1, 48);
        assert_eq!(controller.fps(), Some(48));
        assert_eq!(controller.samples().collect::<Vec<_>>(), vec![48]);
    }

    #[test]
    fn test_low_fps_fires_once_after_five_samples() {
        let mut quality = VisualQuality::default();
        let mut controller = PerformanceController::new(PerformanceSettings::default());
        let start = Instant::now();
        controller.start_monitoring(&desktop(), start);

        assert_eq!(run(&mut controller, &mut quality, start, 4, 20), 0);
        assert!(!quality.is_degraded());

        let resumed = start + Duration::from_secs(4);
        assert_eq!(run(&mut controller, &mut quality, resumed, 1, 20), 1);
        assert_eq!(controller.emergency_count(), 1);
        assert_eq!(quality.particle_opacity, EMERGENCY_PARTICLE_OPACITY);
        assert!(!quality.rain_visible);
    }

    #[test]
    fn test_low_fps_refires_while_condition_holds() {
        let mut quality = VisualQuality::default();
        let mut controller = PerformanceController::new(PerformanceSettings::default());
        let start = Instant::now();
        controller.start_monitoring(&desktop(), start);

        assert_eq!(run(&mut controller, &mut quality, start, 7, 20), 3);
        assert_eq!(controller.emergency_count(), 3);
    }

    #[test]
    fn test_healthy_fps_never_fires() {
        let mut quality = VisualQuality::default();
        let mut controller = PerformanceController::new(PerformanceSettings::default());
        let start = Instant::now();
        controller.start_monitoring(&desktop(), start);

        assert_eq!(run(&mut controller, &mut quality, start, 20, 30), 0);
        assert_eq!(controller.samples().count(), 10);
        assert!(!quality.is_degraded());
    }

    #[test]
    fn test_mobile_is_not_monitored() {
        let mut quality = VisualQuality::default();
        let mut controller = PerformanceController::new(PerformanceSettings::default());
        let start = Instant::now();
        let mobile = Environment::capture(PxSize::new(600.0, 800.0), false);
        controller.start_monitoring(&mobile, start);

        assert!(!controller.is_monitoring());
        assert_eq!(run(&mut controller, &mut quality, start, 10, 5), 0);
        assert_eq!(controller.fps(), None);
    }

    #[test]
    fn test_window_keeps_latest_samples() {
        let mut quality = VisualQuality::default();
        let mut controller = PerformanceController::new(PerformanceSettings::default());
        let start = Instant::now();
        controller.start_monitoring(&desktop(), start);

        run(&mut controller, &mut quality, start, 10, 60);
        let later = start + Duration::from_secs(10);
        run(&mut controller, &mut quality, later, 3, 40);

        let samples: Vec<u32> = controller.samples().collect();
        assert_eq!(samples.len(), 10);
        assert_eq!(&samples[7..], &[40, 40, 40]);
        assert_eq!(controller.average_fps(), Some(54.0));
    }

    #[test]
    fn test_paused_gap_is_not_sampled() {
        let mut quality = VisualQuality::default();
        let mut controller = PerformanceController::new(PerformanceSettings::default());
        let start = Instant::now();
        controller.start_monitoring(&desktop(), start);
        run(&mut controller, &mut quality, start, 3, 60);

        controller.pause_sampling();
        let resumed = start + Duration::from_secs(60);
        assert_eq!(run(&mut controller, &mut quality, resumed, 2, 60), 0);
        assert!(controller.samples().all(|fps| fps == 60));
        assert!(!quality.is_degraded());
    }
}
