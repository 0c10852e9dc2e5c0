//! Debouncing of terminal resize events.

use std::time::{Duration, Instant};

use neonveil_core::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use ratatui::layout::Size;

/// Quiet period after an ordinary resize.
pub const RESIZE_DELAY: Duration = Duration::from_millis(250);

/// Settle period after the viewport flips between portrait and landscape.
pub const ORIENTATION_DELAY: Duration = Duration::from_millis(500);

/// Collapses bursts of resize events into one, delivered after the burst
/// goes quiet.
#[derive(Debug)]
pub struct ResizeDebouncer {
    settled: Size,
    pending: Option<(Size, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(initial: Size) -> Self {
        Self {
            settled: initial,
            pending: None,
        }
    }

    /// Record a resize to `size` observed at `now`, restarting the timer.
    pub fn push(&mut self, size: Size, now: Instant) {
        let delay = if is_portrait(size) != is_portrait(self.settled) {
            ORIENTATION_DELAY
        } else {
            RESIZE_DELAY
        };
        self.pending = Some((size, now + delay));
    }

    /// The final size of a burst once its quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        match self.pending {
            Some((size, deadline)) if now >= deadline => {
                self.pending = None;
                self.settled = size;
                Some(size)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

fn is_portrait(size: Size) -> bool {
    f32::from(size.height) * CELL_HEIGHT_PX > f32::from(size.width) * CELL_WIDTH_PX
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_is_delivered_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut debounce = ResizeDebouncer::new(Size::new(100, 30));
        debounce.push(Size::new(101, 30), t0);
        debounce.push(Size::new(102, 30), t0 + ms(100));
        debounce.push(Size::new(103, 30), t0 + ms(200));

        assert_eq!(debounce.poll(t0 + ms(300)), None);
        assert_eq!(debounce.poll(t0 + ms(450)), Some(Size::new(103, 30)));
        assert_eq!(debounce.poll(t0 + ms(900)), None);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_orientation_flip_waits_longer() {
        let t0 = Instant::now();
        // 100x30 cells is 1000x600 px (landscape), 40x60 is 400x1200 px
        let mut debounce = ResizeDebouncer::new(Size::new(100, 30));
        debounce.push(Size::new(40, 60), t0);

        assert_eq!(debounce.poll(t0 + ms(300)), None);
        assert_eq!(debounce.poll(t0 + ms(500)), Some(Size::new(40, 60)));
    }
}
