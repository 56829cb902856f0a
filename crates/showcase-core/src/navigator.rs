//! Slideshow state machine over an ordered project list.
//!
//! The navigator is `Closed` or `Open { position, autoplay }`. Position
//! arithmetic wraps in both directions. Autoplay is a deadline rather than a
//! background timer: the host calls [`Navigator::tick`] with the current
//! instant and at most one advance happens per call. Closing clears the
//! deadline and the loaded embed, so a close can never be followed by a
//! stray advance.

use crate::model::{DEFAULT_AUTOPLAY_MS, Project};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Closed,
    Open { position: usize, autoplay: bool },
}

/// What the presentation layer shows for the current slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    /// `"{title} — {student}"`.
    pub heading: String,
    /// `"{klass} • {grade}"`.
    pub tag: String,
    /// 1-based `"i / n"`.
    pub counter: String,
    pub embed_url: String,
    pub position: usize,
    pub len: usize,
}

impl Slide {
    fn for_project(project: &Project, position: usize, len: usize) -> Self {
        Self {
            heading: format!("{} — {}", project.title, project.student),
            tag: format!("{} • {}", project.klass, project.grade),
            counter: format!("{} / {len}", position + 1),
            embed_url: project.embed_url.clone(),
            position,
            len,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    list: Vec<Project>,
    state: NavState,
    interval: Duration,
    deadline: Option<Instant>,
    loaded: Option<String>,
}

impl Navigator {
    #[must_use]
    pub const fn new(list: Vec<Project>, interval: Duration) -> Self {
        Self {
            list,
            state: NavState::Closed,
            interval,
            deadline: None,
            loaded: None,
        }
    }

    /// Build with an interval in milliseconds; `0` falls back to the default.
    #[must_use]
    pub const fn with_autoplay_ms(list: Vec<Project>, autoplay_ms: u64) -> Self {
        let ms = if autoplay_ms == 0 {
            DEFAULT_AUTOPLAY_MS
        } else {
            autoplay_ms
        };
        Self::new(list, Duration::from_millis(ms))
    }

    #[must_use]
    pub const fn state(&self) -> NavState {
        self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, NavState::Open { .. })
    }

    #[must_use]
    pub const fn autoplay(&self) -> bool {
        matches!(self.state, NavState::Open { autoplay: true, .. })
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Embed currently loaded in the viewer, if any.
    #[must_use]
    pub fn loaded_embed(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    /// When the next autoplay advance is due.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn slide(&self) -> Option<Slide> {
        match self.state {
            NavState::Open { position, .. } => self
                .list
                .get(position)
                .map(|project| Slide::for_project(project, position, self.list.len())),
            NavState::Closed => None,
        }
    }

    /// Open at `start` (taken modulo the list length). No-op on an empty list.
    pub fn open(&mut self, start: usize) -> Option<Slide> {
        if self.list.is_empty() {
            return None;
        }
        let autoplay = self.autoplay();
        self.show(start % self.list.len(), autoplay)
    }

    /// Close the viewer, cancelling autoplay and unloading the embed.
    pub fn close(&mut self) {
        self.state = NavState::Closed;
        self.deadline = None;
        self.loaded = None;
    }

    /// Advance one slide, wrapping to the start.
    pub fn next(&mut self) -> Option<Slide> {
        let NavState::Open { position, autoplay } = self.state else {
            return None;
        };
        let len = self.list.len();
        self.show((position + 1) % len, autoplay)
    }

    /// Step back one slide, wrapping to the end.
    pub fn prev(&mut self) -> Option<Slide> {
        let NavState::Open { position, autoplay } = self.state else {
            return None;
        };
        let len = self.list.len();
        self.show((position + len - 1) % len, autoplay)
    }

    /// Flip autoplay. Returns the new setting; closed viewers are untouched.
    pub fn toggle_autoplay(&mut self, now: Instant) -> bool {
        let NavState::Open { position, autoplay } = self.state else {
            return false;
        };
        let autoplay = !autoplay;
        self.state = NavState::Open { position, autoplay };
        self.deadline = autoplay.then(|| now + self.interval);
        autoplay
    }

    /// Fire a due autoplay advance. At most one advance per call; the next
    /// deadline is measured from `now`.
    pub fn tick(&mut self, now: Instant) -> Option<Slide> {
        let deadline = self.deadline?;
        if !self.autoplay() || now < deadline {
            return None;
        }
        self.deadline = Some(now + self.interval);
        self.next()
    }

    /// Swap in a new list. An open viewer keeps its position clamped into
    /// range, or closes if the new list is empty.
    pub fn replace_list(&mut self, list: Vec<Project>) -> Option<Slide> {
        self.list = list;
        let NavState::Open { position, autoplay } = self.state else {
            return None;
        };
        if self.list.is_empty() {
            self.close();
            return None;
        }
        let position = position.min(self.list.len() - 1);
        self.show(position, autoplay)
    }

    fn show(&mut self, position: usize, autoplay: bool) -> Option<Slide> {
        self.state = NavState::Open { position, autoplay };
        let project = self.list.get(position)?;
        self.loaded = Some(project.embed_url.clone());
        Some(Slide::for_project(project, position, self.list.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects(n: usize) -> Vec<Project> {
        (0..n)
            .map(|i| Project {
                id: format!("p{i}"),
                title: format!("Design {i}"),
                student: format!("Student {i}"),
                klass: "RM225 - G3 - Kappa".into(),
                grade: "Grade 3".into(),
                embed_url: format!("https://www.tinkercad.com/embed/{i}"),
                ..Project::default()
            })
            .collect()
    }

    fn position(nav: &Navigator) -> Option<usize> {
        match nav.state() {
            NavState::Open { position, .. } => Some(position),
            NavState::Closed => None,
        }
    }

    #[test]
    fn open_shows_slide_text() {
        let mut nav = Navigator::with_autoplay_ms(projects(3), 9000);
        let slide = nav.open(1).expect("slide");
        assert_eq!(slide.heading, "Design 1 — Student 1");
        assert_eq!(slide.tag, "RM225 - G3 - Kappa • Grade 3");
        assert_eq!(slide.counter, "2 / 3");
        assert_eq!(nav.loaded_embed(), Some("https://www.tinkercad.com/embed/1"));
    }

    #[test]
    fn open_on_empty_list_is_noop() {
        let mut nav = Navigator::with_autoplay_ms(Vec::new(), 9000);
        assert!(nav.open(0).is_none());
        assert_eq!(nav.state(), NavState::Closed);
    }

    #[test]
    fn open_wraps_start_index() {
        let mut nav = Navigator::with_autoplay_ms(projects(3), 9000);
        nav.open(7);
        assert_eq!(position(&nav), Some(1));
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut nav = Navigator::with_autoplay_ms(projects(3), 9000);
        nav.open(2);
        assert_eq!(nav.next().map(|s| s.position), Some(0));
        assert_eq!(nav.prev().map(|s| s.position), Some(2));
        assert_eq!(nav.prev().map(|s| s.position), Some(1));
    }

    #[test]
    fn single_item_stays_put() {
        let mut nav = Navigator::with_autoplay_ms(projects(1), 9000);
        nav.open(0);
        assert_eq!(nav.next().map(|s| s.counter), Some("1 / 1".to_string()));
        assert_eq!(nav.prev().map(|s| s.position), Some(0));
    }

    #[test]
    fn navigation_while_closed_is_noop() {
        let mut nav = Navigator::with_autoplay_ms(projects(3), 9000);
        assert!(nav.next().is_none());
        assert!(nav.prev().is_none());
        assert!(!nav.toggle_autoplay(Instant::now()));
        assert_eq!(nav.state(), NavState::Closed);
    }

    #[test]
    fn autoplay_advances_once_per_due_tick() {
        let mut nav = Navigator::with_autoplay_ms(projects(3), 1000);
        let t0 = Instant::now();
        nav.open(0);
        assert!(nav.toggle_autoplay(t0));

        assert!(nav.tick(t0 + Duration::from_millis(999)).is_none());
        // Far past several intervals still moves one slide.
        let slide = nav.tick(t0 + Duration::from_millis(5000)).expect("advance");
        assert_eq!(slide.position, 1);
        assert_eq!(
            nav.next_deadline(),
            Some(t0 + Duration::from_millis(6000))
        );
    }

    #[test]
    fn toggling_off_cancels_deadline() {
        let mut nav = Navigator::with_autoplay_ms(projects(3), 1000);
        let t0 = Instant::now();
        nav.open(0);
        nav.toggle_autoplay(t0);
        assert!(!nav.toggle_autoplay(t0));
        assert!(nav.next_deadline().is_none());
        assert!(nav.tick(t0 + Duration::from_secs(10)).is_none());
        assert_eq!(position(&nav), Some(0));
    }

    #[test]
    fn close_cancels_autoplay_and_unloads() {
        let mut nav = Navigator::with_autoplay_ms(projects(3), 1000);
        let t0 = Instant::now();
        nav.open(0);
        nav.toggle_autoplay(t0);
        nav.close();

        assert_eq!(nav.state(), NavState::Closed);
        assert!(nav.loaded_embed().is_none());
        assert!(nav.tick(t0 + Duration::from_secs(10)).is_none());
        assert_eq!(nav.state(), NavState::Closed);

        // Reopening starts with autoplay off.
        nav.open(0);
        assert!(!nav.autoplay());
    }

    #[test]
    fn replace_list_clamps_or_closes() {
        let mut nav = Navigator::with_autoplay_ms(projects(5), 9000);
        nav.open(4);
        let slide = nav.replace_list(projects(2)).expect("still open");
        assert_eq!(slide.position, 1);

        assert!(nav.replace_list(Vec::new()).is_none());
        assert_eq!(nav.state(), NavState::Closed);
    }

    #[test]
    fn replace_list_while_closed_stays_closed() {
        let mut nav = Navigator::with_autoplay_ms(projects(2), 9000);
        assert!(nav.replace_list(projects(4)).is_none());
        assert_eq!(nav.len(), 4);
        assert!(!nav.is_open());
    }

    #[test]
    fn zero_interval_uses_default() {
        let nav = Navigator::with_autoplay_ms(projects(1), 0);
        assert_eq!(nav.interval(), Duration::from_millis(DEFAULT_AUTOPLAY_MS));
    }
}
