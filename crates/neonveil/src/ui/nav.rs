//! Slide-in navigation drawer.

use std::time::{Duration, Instant};

use neonveil_core::VisualQuality;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{Strings, Theme};
use crate::choreography::{Choreographer, Sequence, SequenceHandle};

pub const LINK_COUNT: usize = 4;

const REVEAL_START: Duration = Duration::from_millis(200);
const REVEAL_STEP: Duration = Duration::from_millis(100);
const HIDE_STEP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavStep {
    RevealLink(usize),
    HideLink(usize),
}

#[derive(Debug, Default)]
pub struct NavDrawer {
    active: bool,
    links: [bool; LINK_COUNT],
    choreo: Choreographer<NavStep>,
    /// Reveal still in flight, if any.
    revealing: Option<SequenceHandle>,
}

impl NavDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, now: Instant, quality: &VisualQuality) {
        if self.active {
            self.close(now, quality);
        } else {
            self.open(now, quality);
        }
    }

    /// Show the drawer, then reveal the links one after another.
    pub fn open(&mut self, now: Instant, quality: &VisualQuality) {
        self.active = true;
        let sequence = (0..LINK_COUNT).fold(Sequence::new(), |seq, i| {
            let offset = REVEAL_START + REVEAL_STEP * i as u32;
            seq.at(quality.scale(offset), NavStep::RevealLink(i))
        });
        self.revealing = Some(self.choreo.start(sequence, now));
        self.poll(now);
        tracing::debug!("navigation drawer opened");
    }

    /// Hide the drawer and retract the links one after another.
    pub fn close(&mut self, now: Instant, quality: &VisualQuality) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        if let Some(handle) = self.revealing.take()
            && self.choreo.cancel(handle)
        {
            tracing::debug!("link reveal cut short");
        }
        let sequence = (0..LINK_COUNT).fold(Sequence::new(), |seq, i| {
            seq.at(quality.scale(HIDE_STEP * i as u32), NavStep::HideLink(i))
        });
        self.choreo.start(sequence, now);
        self.poll(now);
        tracing::debug!("navigation drawer closed");
        true
    }

    pub fn poll(&mut self, now: Instant) {
        for step in self.choreo.poll(now) {
            match step {
                NavStep::RevealLink(i) => self.links[i] = true,
                NavStep::HideLink(i) => self.links[i] = false,
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_link_visible(&self, index: usize) -> bool {
        self.links.get(index).copied().unwrap_or(false)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, strings: &Strings, theme: &Theme) {
        if !self.active {
            return;
        }
        let lines: Vec<Line> = strings
            .nav_links
            .iter()
            .enumerate()
            .map(|(i, label)| {
                if self.is_link_visible(i) {
                    Line::from(format!("› {label}")).style(Style::new().fg(theme.text).bold())
                } else {
                    Line::from("")
                }
            })
            .collect();
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::new().fg(theme.accent))
            .title(strings.navigation);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn visible(nav: &NavDrawer) -> Vec<bool> {
        (0..LINK_COUNT).map(|i| nav.is_link_visible(i)).collect()
    }

    #[test]
    fn test_open_reveals_links_staggered() {
        let t0 = Instant::now();
        let mut nav = NavDrawer::new();
        nav.open(t0, &VisualQuality::default());
        assert!(nav.is_active());
        assert_eq!(visible(&nav), [false; 4]);

        nav.poll(t0 + ms(200));
        assert_eq!(visible(&nav), [true, false, false, false]);
        nav.poll(t0 + ms(350));
        assert_eq!(visible(&nav), [true, true, false, false]);
        nav.poll(t0 + ms(500));
        assert_eq!(visible(&nav), [true; 4]);
    }

    #[test]
    fn test_close_hides_links_staggered() {
        let t0 = Instant::now();
        let quality = VisualQuality::default();
        let mut nav = NavDrawer::new();
        nav.open(t0, &quality);
        nav.poll(t0 + ms(600));

        let t1 = t0 + ms(1000);
        assert!(nav.close(t1, &quality));
        assert!(!nav.is_active());
        assert_eq!(visible(&nav), [false, true, true, true]);
        nav.poll(t1 + ms(100));
        assert_eq!(visible(&nav), [false, false, false, true]);
        nav.poll(t1 + ms(150));
        assert_eq!(visible(&nav), [false; 4]);
        assert!(!nav.close(t1, &quality));
    }

    #[test]
    fn test_closing_mid_reveal_cancels_remaining_reveals() {
        let t0 = Instant::now();
        let quality = VisualQuality::default();
        let mut nav = NavDrawer::new();
        nav.open(t0, &quality);
        nav.poll(t0 + ms(250));
        nav.toggle(t0 + ms(250), &quality);

        nav.poll(t0 + ms(2000));
        assert_eq!(visible(&nav), [false; 4]);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let t0 = Instant::now();
        let quality = VisualQuality {
            animation_duration: Duration::ZERO,
            ..Default::default()
        };
        let mut nav = NavDrawer::new();
        nav.open(t0, &quality);
        assert_eq!(visible(&nav), [true; 4]);
        nav.close(t0, &quality);
        assert_eq!(visible(&nav), [false; 4]);
    }
}
