//! Interface language and its dropdown.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::Theme;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Name of the language in itself.
    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Fr => &FR,
        }
    }
}

/// Every user-facing label, per language.
#[derive(Debug)]
pub struct Strings {
    pub projects: &'static str,
    /// Typed out under the title after startup.
    pub subtitle: &'static str,
    pub navigation: &'static str,
    pub nav_links: [&'static str; 4],
    pub language: &'static str,
    pub details: &'static str,
    pub close_hint: &'static str,
    pub quit: &'static str,
    pub menu: &'static str,
    pub open: &'static str,
    pub toggle: &'static str,
}

static EN: Strings = Strings {
    projects: "Projects",
    subtitle: "things that glow in the dark",
    navigation: "Navigation",
    nav_links: ["Home", "About", "Projects", "Contact"],
    language: "Language",
    details: "Details",
    close_hint: "Esc to close",
    quit: " quit  ",
    menu: " menu  ",
    open: " open  ",
    toggle: " expand  ",
};

static FR: Strings = Strings {
    projects: "Projets",
    subtitle: "des choses qui brillent dans le noir",
    navigation: "Navigation",
    nav_links: ["Accueil", "À propos", "Projets", "Contact"],
    language: "Langue",
    details: "Détails",
    close_hint: "Échap pour fermer",
    quit: " quitter  ",
    menu: " menu  ",
    open: " ouvrir  ",
    toggle: " déplier  ",
};

/// Language picker toggled open and closed.
#[derive(Debug, Default)]
pub struct LanguageDropdown {
    open: bool,
    highlighted: usize,
    language: Language,
}

impl LanguageDropdown {
    pub fn new(language: Language) -> Self {
        Self {
            open: false,
            highlighted: 0,
            language,
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.highlighted = Language::ALL
                .iter()
                .position(|&lang| lang == self.language)
                .unwrap_or(0);
        }
    }

    /// Close the dropdown, returning whether it was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlight_next(&mut self) {
        self.highlighted = (self.highlighted + 1) % Language::ALL.len();
    }

    pub fn highlight_previous(&mut self) {
        self.highlighted = (self.highlighted + Language::ALL.len() - 1) % Language::ALL.len();
    }

    /// Switch to the highlighted language and close.
    pub fn choose_highlighted(&mut self) -> Language {
        self.choose(Language::ALL[self.highlighted])
    }

    pub fn choose(&mut self, language: Language) -> Language {
        if language != self.language {
            tracing::info!(language = language.code(), "language changed");
        }
        self.language = language;
        self.open = false;
        language
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.open {
            return;
        }
        let lines: Vec<Line> = Language::ALL
            .iter()
            .enumerate()
            .map(|(i, lang)| {
                let marker = if *lang == self.language { "● " } else { "  " };
                let line = Line::from(format!("{marker}{}", lang.label()));
                if i == self.highlighted {
                    line.style(Style::new().fg(theme.accent).bold().reversed())
                } else {
                    line.style(Style::new().fg(theme.text))
                }
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::new().fg(theme.accent))
            .title(self.language.strings().language);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
