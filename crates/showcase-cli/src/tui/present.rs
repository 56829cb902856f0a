//! Full-screen slideshow over a filtered project list.
//!
//! Key bindings: ←/→ or h/l navigate, space toggles autoplay, Esc/q close.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use showcase_core::{Navigator, Slide};
use std::time::{Duration, Instant};
use tracing::debug;

const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct PresentView {
    nav: Navigator,
    title: String,
    should_quit: bool,
}

impl PresentView {
    pub const fn new(nav: Navigator, title: String) -> Self {
        Self {
            nav,
            title,
            should_quit: false,
        }
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub const fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close(),
            KeyCode::Char('c') if ctrl => self.close(),
            KeyCode::Right | KeyCode::Char('l') => {
                self.nav.next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.nav.prev();
            }
            KeyCode::Char(' ') => {
                let on = self.nav.toggle_autoplay(now);
                debug!(autoplay = on, "autoplay toggled");
            }
            _ => {}
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(slide) = self.nav.tick(now) {
            debug!(position = slide.position, "autoplay advance");
        }
    }

    /// How long the event loop may block before the next autoplay deadline.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.nav
            .next_deadline()
            .map_or(IDLE_POLL, |deadline| {
                deadline.saturating_duration_since(now).min(IDLE_POLL)
            })
    }

    fn close(&mut self) {
        self.nav.close();
        self.should_quit = true;
    }

    pub fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        render_into(frame, self, area);
    }
}

fn render_into(frame: &mut Frame<'_>, view: &PresentView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" {} ", view.title))
        .title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    match view.nav.slide() {
        Some(slide) => frame.render_widget(
            Paragraph::new(slide_lines(&slide))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false }),
            chunks[0],
        ),
        None => frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "No projects to show",
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center),
            chunks[0],
        ),
    }

    frame.render_widget(
        Paragraph::new(footer_line(view.nav.autoplay())).alignment(Alignment::Center),
        chunks[1],
    );
}

fn slide_lines(slide: &Slide) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(
            slide.heading.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            slide.tag.clone(),
            Style::default().fg(Color::Cyan),
        )),
        Line::default(),
        Line::from(Span::styled(
            slide.embed_url.clone(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )),
        Line::default(),
        Line::from(Span::styled(
            slide.counter.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn footer_line(autoplay: bool) -> Line<'static> {
    let key = Style::default().fg(Color::Yellow);
    let dim = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled("←/→", key),
        Span::styled(" navigate  ", dim),
        Span::styled("space", key),
        Span::styled(
            if autoplay {
                " autoplay: on  "
            } else {
                " autoplay: off  "
            },
            dim,
        ),
        Span::styled("q", key),
        Span::styled(" close", dim),
    ])
}

/// Take over the terminal and run the slideshow until closed.
///
/// # Errors
///
/// Returns an error if the terminal cannot be initialised or drawn.
pub fn run_present(mut view: PresentView) -> Result<()> {
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, &mut view);
    ratatui::restore();
    debug!(state = ?view.navigator().state(), "slideshow closed");
    result
}

fn event_loop(terminal: &mut DefaultTerminal, view: &mut PresentView) -> Result<()> {
    while !view.should_quit() {
        terminal.draw(|frame| view.render(frame))?;

        if event::poll(view.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            view.handle_key(key, Instant::now());
        }
        view.tick(Instant::now());
    }
    Ok(())
}
