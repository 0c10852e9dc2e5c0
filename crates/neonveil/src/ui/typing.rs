//! Typewriter subtitle.

use std::time::{Duration, Instant};

use neonveil_core::VisualQuality;
use ratatui::{
    style::{Style, Stylize},
    text::Span,
};

use super::Theme;
use crate::choreography::{Choreographer, Sequence};

const TYPING_START: Duration = Duration::from_millis(800);
const CHAR_DELAY_DESKTOP: Duration = Duration::from_millis(50);
const CHAR_DELAY_MOBILE: Duration = Duration::from_millis(30);
const BLINK_DESKTOP: Duration = Duration::from_millis(1000);
const BLINK_MOBILE: Duration = Duration::from_millis(1500);

const CARET: &str = "▌";

#[derive(Debug, Default)]
pub struct Typewriter {
    /// Characters shown so far.
    typed: usize,
    done: bool,
    /// Caret half-period once typing is done. `None` keeps it steady.
    blink: Option<Duration>,
    finished_at: Option<Instant>,
    caret_on: bool,
    choreo: Choreographer<Option<usize>>,
}

impl Typewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type out `text` one character at a time, quicker on mobile.
    pub fn start(&mut self, text: &str, now: Instant, quality: &VisualQuality, is_mobile: bool) {
        let (per_char, blink) = if is_mobile {
            (CHAR_DELAY_MOBILE, BLINK_MOBILE)
        } else {
            (CHAR_DELAY_DESKTOP, BLINK_DESKTOP)
        };
        let count = text.chars().count();
        let sequence = (1..=count).fold(Sequence::new(), |seq, n| {
            seq.at(quality.scale(TYPING_START + per_char * n as u32), Some(n))
        });
        let end = quality.scale(TYPING_START + per_char * (count as u32 + 1));
        self.typed = 0;
        self.done = false;
        self.finished_at = None;
        self.caret_on = true;
        self.blink = (!quality.animation_duration.is_zero()).then_some(blink);
        self.choreo.start(sequence.at(end, None), now);
        self.poll(now);
    }

    pub fn poll(&mut self, now: Instant) {
        for step in self.choreo.poll(now) {
            match step {
                Some(n) => self.typed = n,
                None => {
                    self.done = true;
                    self.finished_at = Some(now);
                }
            }
        }
        if let (Some(finished), Some(blink)) = (self.finished_at, self.blink) {
            let phase = now.saturating_duration_since(finished).as_millis() / blink.as_millis();
            self.caret_on = phase % 2 == 0;
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn caret_visible(&self) -> bool {
        self.caret_on
    }

    /// The part of `text` typed so far. Once done the whole text shows, so a
    /// language switch never truncates it.
    pub fn visible<'a>(&self, text: &'a str) -> &'a str {
        if self.done {
            return text;
        }
        match text.char_indices().nth(self.typed) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }

    pub fn spans<'a>(&self, text: &'a str, theme: &Theme) -> [Span<'a>; 2] {
        let caret = if self.caret_on { CARET } else { " " };
        [
            Span::styled(self.visible(text), Style::new().fg(theme.text)),
            caret.fg(theme.accent),
        ]
    }
}
