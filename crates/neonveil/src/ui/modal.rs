//! Project detail modal.

use std::time::{Duration, Instant};

use neonveil_config::ProjectEntry;
use neonveil_core::VisualQuality;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{Strings, Theme};
use crate::choreography::{Choreographer, Sequence, SequenceHandle};

const FOCUS_DELAY: Duration = Duration::from_millis(100);
const FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalStep {
    Focus,
    Hide,
}

#[derive(Debug, Default)]
pub struct Modal {
    project: Option<usize>,
    displayed: bool,
    focused: bool,
    closing: bool,
    choreo: Choreographer<ModalStep>,
    /// Pending focus or hide.
    pending: Option<SequenceHandle>,
}

impl Modal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the modal for `project`, replacing any modal already shown.
    pub fn open(&mut self, project: usize, now: Instant, quality: &VisualQuality) {
        if self.displayed {
            self.hide();
        }
        self.project = Some(project);
        self.displayed = true;
        self.closing = false;
        self.pending = Some(self.choreo.start(
            Sequence::new().at(quality.scale(FOCUS_DELAY), ModalStep::Focus),
            now,
        ));
        self.poll(now);
        tracing::debug!(project, "modal opened");
    }

    /// Fade the modal out. Returns false when no modal is open.
    pub fn close(&mut self, now: Instant, quality: &VisualQuality) -> bool {
        if !self.is_open() {
            return false;
        }
        self.closing = true;
        self.focused = false;
        self.pending = Some(self.choreo.start(
            Sequence::new().at(quality.scale(FADE_OUT), ModalStep::Hide),
            now,
        ));
        self.poll(now);
        true
    }

    pub fn poll(&mut self, now: Instant) {
        for step in self.choreo.poll(now) {
            match step {
                ModalStep::Focus => self.focused = true,
                ModalStep::Hide => self.hide(),
            }
        }
    }

    /// Displayed and not fading out.
    pub fn is_open(&self) -> bool {
        self.displayed && !self.closing
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn project(&self) -> Option<usize> {
        self.project.filter(|_| self.displayed)
    }

    fn hide(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.choreo.cancel(handle);
        }
        self.displayed = false;
        self.focused = false;
        self.closing = false;
        self.project = None;
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        projects: &[ProjectEntry],
        strings: &Strings,
        theme: &Theme,
    ) {
        let Some(entry) = self.project().and_then(|i| projects.get(i)) else {
            return;
        };
        let border = if self.closing { theme.muted } else { theme.accent };
        let border_style = if self.is_focused() {
            Style::new().fg(border).bold()
        } else {
            Style::new().fg(border)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(entry.title.as_str())
            .title_bottom(Line::from(strings.close_hint).right_aligned());
        let body = vec![
            Line::from(entry.summary.as_str()).style(Style::new().fg(theme.text).bold()),
            Line::from(""),
            Line::from(entry.details.as_str()).style(Style::new().fg(theme.text)),
        ];
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(body).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}
