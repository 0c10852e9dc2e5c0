//! Expandable project cards (accordion).

use std::time::{Duration, Instant};

use neonveil_config::ProjectEntry;
use neonveil_core::VisualQuality;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{Strings, Theme};
use crate::choreography::{Choreographer, Sequence, SequenceHandle};

const DETAILS_DELAY: Duration = Duration::from_millis(150);

/// Load-time reveal: first card delay and per-card stagger.
const REVEAL_START_DESKTOP: Duration = Duration::from_millis(500);
const REVEAL_STEP_DESKTOP: Duration = Duration::from_millis(200);
const REVEAL_START_MOBILE: Duration = Duration::from_millis(300);
const REVEAL_STEP_MOBILE: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub struct ProjectCards {
    entries: Vec<ProjectEntry>,
    /// Card under the cursor.
    selected: usize,
    /// The single expanded card, if any.
    expanded: Option<usize>,
    /// Whether the expanded card's detail line is showing yet.
    details_shown: bool,
    /// Per-card `animate-in` state.
    revealed: Vec<bool>,
    details: Choreographer<usize>,
    details_sequence: Option<SequenceHandle>,
    reveal: Choreographer<usize>,
}

impl ProjectCards {
    /// Cards start hidden until [`ProjectCards::reveal`] animates them in.
    pub fn new(entries: Vec<ProjectEntry>) -> Self {
        let revealed = vec![false; entries.len()];
        Self {
            entries,
            selected: 0,
            expanded: None,
            details_shown: false,
            revealed,
            details: Choreographer::new(),
            details_sequence: None,
            reveal: Choreographer::new(),
        }
    }

    /// Animate the cards in one after another, faster on mobile.
    pub fn reveal(&mut self, now: Instant, quality: &VisualQuality, is_mobile: bool) {
        let (start, step) = if is_mobile {
            (REVEAL_START_MOBILE, REVEAL_STEP_MOBILE)
        } else {
            (REVEAL_START_DESKTOP, REVEAL_STEP_DESKTOP)
        };
        self.revealed.fill(false);
        let sequence = (0..self.entries.len()).fold(Sequence::new(), |seq, i| {
            seq.at(quality.scale(start + step * i as u32), i)
        });
        self.reveal.start(sequence, now);
        self.poll(now);
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn entries(&self) -> &[ProjectEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + self.entries.len() - 1) % self.entries.len();
        }
    }

    /// Expand card `index` and collapse every other one, or collapse it if
    /// it is already expanded.
    pub fn toggle(&mut self, index: usize, now: Instant, quality: &VisualQuality) {
        if index >= self.entries.len() {
            tracing::debug!(index, "no project card at index");
            return;
        }
        if self.expanded == Some(index) {
            self.collapse_all();
            return;
        }
        self.expanded = Some(index);
        self.details_shown = false;
        self.details_sequence = Some(
            self.details
                .start(Sequence::new().at(quality.scale(DETAILS_DELAY), index), now),
        );
        self.poll(now);
    }

    /// Collapse whichever card is expanded. Returns whether one was.
    pub fn collapse_all(&mut self) -> bool {
        self.details_shown = false;
        if let Some(handle) = self.details_sequence.take()
            && self.details.cancel(handle)
        {
            tracing::debug!("pending card details cancelled");
        }
        self.expanded.take().is_some()
    }

    pub fn poll(&mut self, now: Instant) {
        for index in self.reveal.poll(now) {
            if let Some(revealed) = self.revealed.get_mut(index) {
                *revealed = true;
            }
        }
        for index in self.details.poll(now) {
            if self.expanded == Some(index) {
                self.details_shown = true;
            }
        }
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn details_shown(&self) -> bool {
        self.details_shown
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, strings: &Strings, theme: &Theme) {
        let mut lines = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if !self.is_revealed(i) {
                continue;
            }
            let expanded = self.expanded == Some(i);
            let arrow = if expanded { "▾ " } else { "▸ " };
            let title_style = if i == self.selected {
                Style::new().fg(theme.accent).bold()
            } else {
                Style::new().fg(theme.text)
            };
            lines.push(Line::from(vec![
                Span::styled(arrow, Style::new().fg(theme.secondary)),
                Span::styled(entry.title.as_str(), title_style),
            ]));
            lines.push(Line::from(format!("  {}", entry.summary)).style(Style::new().fg(theme.muted)));
            if expanded && self.details_shown {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}: ", strings.details), Style::new().fg(theme.secondary)),
                    Span::styled(entry.details.as_str(), Style::new().fg(theme.text)),
                ]));
            }
            lines.push(Line::from(""));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::new().fg(theme.accent))
            .title(strings.projects);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn cards() -> ProjectCards {
        let entries = (0..3)
            .map(|i| ProjectEntry {
                title: format!("project {i}"),
                summary: "summary".to_string(),
                details: "details".to_string(),
            })
            .collect();
        ProjectCards::new(entries)
    }

    #[test]
    fn test_toggle_is_an_accordion() {
        let t0 = Instant::now();
        let quality = VisualQuality::default();
        let mut cards = cards();
        cards.toggle(0, t0, &quality);
        assert_eq!(cards.expanded(), Some(0));

        cards.toggle(2, t0, &quality);
        assert_eq!(cards.expanded(), Some(2));

        cards.toggle(2, t0, &quality);
        assert_eq!(cards.expanded(), None);
    }

    #[test]
    fn test_details_follow_expansion() {
        let t0 = Instant::now();
        let mut cards = cards();
        cards.toggle(1, t0, &VisualQuality::default());
        assert!(!cards.details_shown());
        cards.poll(t0 + ms(149));
        assert!(!cards.details_shown());
        cards.poll(t0 + ms(150));
        assert!(cards.details_shown());
    }

    #[test]
    fn test_collapse_all_cancels_pending_details() {
        let t0 = Instant::now();
        let mut cards = cards();
        cards.toggle(1, t0, &VisualQuality::default());
        assert!(cards.collapse_all());
        cards.poll(t0 + ms(500));
        assert!(!cards.details_shown());
        assert!(!cards.collapse_all());
    }

    fn revealed(cards: &ProjectCards) -> Vec<bool> {
        (0..3).map(|i| cards.is_revealed(i)).collect()
    }

    #[test]
    fn test_reveal_staggers_cards_on_desktop() {
        let t0 = Instant::now();
        let mut cards = cards();
        cards.reveal(t0, &VisualQuality::default(), false);
        assert_eq!(revealed(&cards), [false; 3]);

        cards.poll(t0 + ms(499));
        assert_eq!(revealed(&cards), [false; 3]);
        cards.poll(t0 + ms(500));
        assert_eq!(revealed(&cards), [true, false, false]);
        cards.poll(t0 + ms(750));
        assert_eq!(revealed(&cards), [true, true, false]);
        cards.poll(t0 + ms(900));
        assert_eq!(revealed(&cards), [true; 3]);
    }

    #[test]
    fn test_reveal_is_quicker_on_mobile() {
        let t0 = Instant::now();
        let mut cards = cards();
        cards.reveal(t0, &VisualQuality::default(), true);
        cards.poll(t0 + ms(300));
        assert_eq!(revealed(&cards), [true, false, false]);
        cards.poll(t0 + ms(600));
        assert_eq!(revealed(&cards), [true; 3]);
    }

    #[test]
    fn test_reveal_is_instant_without_animation_time() {
        let quality = VisualQuality {
            animation_duration: Duration::ZERO,
            ..Default::default()
        };
        let mut cards = cards();
        cards.reveal(Instant::now(), &quality, false);
        assert_eq!(revealed(&cards), [true; 3]);
    }

    #[test]
    fn test_expanding_does_not_interrupt_reveal() {
        let t0 = Instant::now();
        let quality = VisualQuality::default();
        let mut cards = cards();
        cards.reveal(t0, &quality, false);
        cards.toggle(0, t0 + ms(100), &quality);
        cards.collapse_all();

        cards.poll(t0 + ms(900));
        assert_eq!(revealed(&cards), [true; 3]);
    }

    #[test]
    fn test_selection_wraps() {
        let mut cards = cards();
        cards.select_previous();
        assert_eq!(cards.selected(), 2);
        cards.select_next();
        assert_eq!(cards.selected(), 0);
    }

    #[test]
    fn test_out_of_range_toggle_is_ignored() {
        let mut cards = cards();
        cards.toggle(9, Instant::now(), &VisualQuality::default());
        assert_eq!(cards.expanded(), None);
    }
}
