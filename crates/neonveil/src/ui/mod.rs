//! Interactive overlays drawn above the backdrop.

mod language;
mod modal;
mod nav;
mod projects;
mod typing;

use std::time::Instant;

use neonveil_config::ProjectEntry;
use neonveil_core::{Rgb, VisualQuality};
use ratatui::style::Color;

pub use language::{Language, LanguageDropdown, Strings};
pub use modal::Modal;
pub use nav::NavDrawer;
pub use projects::ProjectCards;
pub use typing::Typewriter;

/// Colors shared by every overlay.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub secondary: Color,
    pub text: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Rgb::NEON_GREEN.to_color(),
            secondary: Rgb::EMBER.to_color(),
            text: Color::White,
            muted: Color::DarkGray,
        }
    }
}

/// Which overlay an Esc press dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissed {
    Modal,
    Drawer,
    Dropdown,
    Cards,
}

#[derive(Debug)]
pub struct Overlays {
    pub nav: NavDrawer,
    pub modal: Modal,
    pub language: LanguageDropdown,
    pub cards: ProjectCards,
    pub subtitle: Typewriter,
}

impl Overlays {
    pub fn new(projects: Vec<ProjectEntry>, language: Language) -> Self {
        Self {
            nav: NavDrawer::new(),
            modal: Modal::new(),
            language: LanguageDropdown::new(language),
            cards: ProjectCards::new(projects),
            subtitle: Typewriter::new(),
        }
    }

    /// Load-time entrance: cards slide in and the subtitle types itself.
    pub fn animate_in(&mut self, now: Instant, quality: &VisualQuality, is_mobile: bool) {
        self.cards.reveal(now, quality, is_mobile);
        let text = self.strings().subtitle;
        self.subtitle.start(text, now, quality, is_mobile);
    }

    /// Apply every step that has come due.
    pub fn poll(&mut self, now: Instant) {
        self.nav.poll(now);
        self.modal.poll(now);
        self.cards.poll(now);
        self.subtitle.poll(now);
    }

    /// Dismiss the topmost open overlay: modal, then drawer, then
    /// dropdown, then expanded cards.
    pub fn dismiss_topmost(&mut self, now: Instant, quality: &VisualQuality) -> Option<Dismissed> {
        if self.modal.close(now, quality) {
            Some(Dismissed::Modal)
        } else if self.nav.close(now, quality) {
            Some(Dismissed::Drawer)
        } else if self.language.close() {
            Some(Dismissed::Dropdown)
        } else if self.cards.collapse_all() {
            Some(Dismissed::Cards)
        } else {
            None
        }
    }

    /// Open the modal for the selected card.
    pub fn open_selected(&mut self, now: Instant, quality: &VisualQuality) -> bool {
        let index = self.cards.selected();
        if index >= self.cards.entries().len() {
            tracing::error!(index, "no project to show in modal");
            return false;
        }
        self.modal.open(index, now, quality);
        true
    }

    pub fn strings(&self) -> &'static Strings {
        self.language.language().strings()
    }
}
