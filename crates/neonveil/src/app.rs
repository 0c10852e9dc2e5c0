//! Application context: owns the backdrop, the performance controller and
//! the overlays, and drives them from the terminal event loop.

use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use neonveil_config::Config;
use neonveil_core::{BodyClass, Environment, FrameScheduler, PxSize, VisualQuality};
use neonveil_effects::{BackdropState, DeviceSignals, InitError, PerformanceController};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Flex, Layout, Rect, Size},
    style::Stylize,
    text::{Line, Span},
};

use crate::debounce::ResizeDebouncer;
use crate::ui::{Language, Overlays, Theme};

/// Event poll timeout, roughly one frame at 60 Hz.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Notable transitions of the application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Initialized,
    FallbackEngaged,
    Resized { width: u16, height: u16 },
    EmergencyOptimization,
    Paused,
    Resumed,
    TornDown,
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    initialized: bool,
    fallback: bool,
    /// Terminal focus lost: the backdrop holds still.
    paused: bool,
    config: Config,
    env: Environment,
    area: Rect,
    frames: FrameScheduler,
    quality: VisualQuality,
    backdrop: BackdropState,
    perf: PerformanceController,
    body_classes: BTreeSet<BodyClass>,
    ui: Overlays,
    theme: Theme,
    debounce: ResizeDebouncer,
    events: VecDeque<LifecycleEvent>,
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of `size` cells.
    pub fn new(config: Config, size: Size) -> Self {
        let language = Language::from_code(&config.ui.language).unwrap_or_else(|| {
            tracing::warn!(language = %config.ui.language, "unknown language, using English");
            Language::En
        });
        let area = Rect::new(0, 0, size.width, size.height);
        Self {
            running: false,
            initialized: false,
            fallback: false,
            paused: false,
            env: Environment::capture(PxSize::from_rect(area), config.motion.reduced),
            area,
            frames: FrameScheduler::new(),
            quality: VisualQuality::default(),
            backdrop: BackdropState::new(config.particles.clone(), config.rain.clone()),
            perf: PerformanceController::new(config.performance.clone()),
            body_classes: BTreeSet::new(),
            ui: Overlays::new(config.projects.clone(), language),
            theme: Theme::default(),
            debounce: ResizeDebouncer::new(size),
            events: VecDeque::new(),
            config,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.init(Instant::now());
        while self.running {
            self.step(Instant::now());
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            for event in self.drain_events() {
                tracing::debug!(?event, "lifecycle event");
            }
        }
        self.teardown();
        Ok(())
    }

    /// Start everything once, probing the host for its capabilities.
    pub fn init(&mut self, now: Instant) {
        let signals = DeviceSignals::probe(self.config.device.connection.clone());
        self.init_with(&signals, now);
    }

    /// Start everything once from the given device signals.
    ///
    /// A failure routes to [`App::fallback_init`] so the overlays stay usable
    /// without the backdrop.
    pub fn init_with(&mut self, signals: &DeviceSignals, now: Instant) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        match self.try_init(signals, now) {
            Ok(()) => {
                tracing::info!(classes = %self.class_list(), "initialized");
                self.events.push_back(LifecycleEvent::Initialized);
            }
            Err(err) => {
                tracing::error!(error = %err, "initialization failed");
                self.fallback_init();
            }
        }
        self.ui.animate_in(now, &self.quality, self.env.is_mobile());
    }

    fn try_init(&mut self, signals: &DeviceSignals, now: Instant) -> Result<(), InitError> {
        self.env = Environment::capture(PxSize::from_rect(self.area), self.config.motion.reduced);
        self.sync_body_classes();

        self.perf.detect(signals);
        self.perf.apply_static_optimization(&mut self.quality);
        if self.env.reduced_motion() {
            self.quality.animation_duration = Duration::ZERO;
        }

        self.backdrop
            .initialize(self.area, &self.env, &mut self.frames)?;
        self.perf.start_monitoring(&self.env, now);
        Ok(())
    }

    /// Minimal mode: no backdrop, instant transitions, overlays still wired.
    pub fn fallback_init(&mut self) {
        self.backdrop.teardown(&mut self.frames);
        self.fallback = true;
        self.quality.animation_duration = Duration::ZERO;
        self.body_classes.insert(BodyClass::FallbackMode);
        tracing::warn!("running in fallback mode");
        self.events.push_back(LifecycleEvent::FallbackEngaged);
    }

    /// One loop iteration: settle resizes, run due choreography, advance the
    /// effects whose frame is due and sample the frame rate.
    pub fn step(&mut self, now: Instant) {
        if let Some(size) = self.debounce.poll(now) {
            self.apply_resize(size, now);
        }
        self.ui.poll(now);
        if self.paused {
            return;
        }

        let due = self.frames.begin_frame();
        self.backdrop.tick(&due, &mut self.frames, &self.quality);
        if self.perf.monitor(now, &mut self.quality) {
            self.events.push_back(LifecycleEvent::EmergencyOptimization);
        }
    }

    /// Focus left the terminal. Pending frames stay queued until
    /// [`App::resume`].
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.perf.pause_sampling();
        tracing::info!("animations paused");
        self.events.push_back(LifecycleEvent::Paused);
    }

    /// Focus came back. With reduced motion the backdrop stays still.
    pub fn resume(&mut self) {
        if !self.paused || self.env.reduced_motion() {
            return;
        }
        self.paused = false;
        tracing::info!("animations resumed");
        self.events.push_back(LifecycleEvent::Resumed);
    }

    /// Queue a terminal resize. It takes effect once the burst settles.
    pub fn resize(&mut self, size: Size, now: Instant) {
        self.debounce.push(size, now);
    }

    fn apply_resize(&mut self, size: Size, now: Instant) {
        self.area = Rect::new(0, 0, size.width, size.height);
        let was_mobile = self.env.is_mobile();
        self.env = Environment::capture(PxSize::from_rect(self.area), self.config.motion.reduced);
        self.sync_body_classes();

        if !self.fallback {
            self.backdrop.resize(self.area, &self.env, &mut self.frames);
            if was_mobile != self.env.is_mobile() {
                self.perf.start_monitoring(&self.env, now);
            }
        }
        self.ui.cards.collapse_all();
        tracing::info!(
            width = size.width,
            height = size.height,
            mobile = self.env.is_mobile(),
            "viewport resized"
        );
        self.events.push_back(LifecycleEvent::Resized {
            width: size.width,
            height: size.height,
        });
    }

    /// Stop both effects. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.backdrop.teardown(&mut self.frames);
        self.events.push_back(LifecycleEvent::TornDown);
    }

    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain(..).collect()
    }

    fn sync_body_classes(&mut self) {
        self.body_classes = self.env.body_classes().into_iter().collect();
        if self.fallback {
            self.body_classes.insert(BodyClass::FallbackMode);
        }
    }

    fn class_list(&self) -> String {
        self.body_classes
            .iter()
            .map(|class| class.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        self.backdrop.render(frame);

        let theme = &self.theme;
        let strings = self.ui.strings();
        let area = frame.area();
        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let mut title = vec![
            " NEONVEIL ".bold().fg(theme.accent),
            format!("[{}] ", self.ui.language.language().code()).fg(theme.muted),
        ];
        title.extend(self.ui.subtitle.spans(strings.subtitle, theme));
        let title = Line::from(title);
        frame.render_widget(title, header);

        let [cards] = Layout::horizontal([Constraint::Max(72)])
            .flex(Flex::Center)
            .areas(body);
        self.ui.cards.render(frame, cards, strings, theme);

        let [_, drawer] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(26)]).areas(body);
        self.ui.nav.render(frame, drawer, strings, theme);

        let dropdown_width = 18.min(area.width);
        let dropdown = Rect::new(
            area.right().saturating_sub(dropdown_width),
            body.y,
            dropdown_width,
            4.min(body.height),
        );
        self.ui.language.render(frame, dropdown, theme);

        self.ui.modal.render(
            frame,
            centered(body, 64, 12),
            self.ui.cards.entries(),
            strings,
            theme,
        );

        let mut spans: Vec<Span> = vec![format!(" {} ", self.class_list()).fg(theme.secondary)];
        if let Some(fps) = self.perf.fps() {
            spans.push(format!("{fps} fps  ").dark_gray());
        }
        spans.extend([
            "q".bold().fg(theme.accent),
            strings.quit.dark_gray(),
            "m".bold().fg(theme.accent),
            strings.menu.dark_gray(),
            "o".bold().fg(theme.accent),
            strings.open.dark_gray(),
            "⏎".bold().fg(theme.accent),
            strings.toggle.dark_gray(),
            "l".bold().fg(theme.accent),
            format!(" {}", strings.language.to_lowercase()).dark_gray(),
        ]);
        frame.render_widget(Line::from(spans), status);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(FRAME_INTERVAL)? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key, now),
                Event::Resize(width, height) => self.resize(Size::new(width, height), now),
                Event::FocusLost => self.pause(),
                Event::FocusGained => self.resume(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent, now: Instant) {
        let quality = &self.quality;
        match (key.modifiers, key.code) {
            (_, KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Esc) => {
                if let Some(dismissed) = self.ui.dismiss_topmost(now, quality) {
                    tracing::debug!(?dismissed, "overlay dismissed");
                }
            }
            (_, KeyCode::Char('m')) => self.ui.nav.toggle(now, quality),
            (_, KeyCode::Char('l')) => self.ui.language.toggle(),
            (_, KeyCode::Char('o')) => {
                self.ui.open_selected(now, quality);
            }
            (_, KeyCode::Up) if self.ui.language.is_open() => self.ui.language.highlight_previous(),
            (_, KeyCode::Down) if self.ui.language.is_open() => self.ui.language.highlight_next(),
            (_, KeyCode::Enter | KeyCode::Char(' ')) if self.ui.language.is_open() => {
                self.ui.language.choose_highlighted();
            }
            (_, KeyCode::Up) => self.ui.cards.select_previous(),
            (_, KeyCode::Down) => self.ui.cards.select_next(),
            (_, KeyCode::Enter | KeyCode::Char(' ')) => {
                let selected = self.ui.cards.selected();
                self.ui.cards.toggle(selected, now, quality);
            }
            _ => {}
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
