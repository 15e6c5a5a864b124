use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::notifier::Notifier;
use crate::tasks::{TaskId, TaskList};
use crate::theme::{ThemeManager, ThemeMode};
use crate::timer::{SessionBoundary, SessionKind, Timer};
use crate::view::{self, TaskListView, TimerView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    pub timer: Timer,
    pub tasks: TaskList,
    pub theme: ThemeManager,
    pub notifier: Notifier,
    pub input: String,
    pub input_mode: InputMode,
    selected: Option<usize>,
}

impl App {
    pub fn new(timer: Timer, theme: ThemeManager, notifier: Notifier) -> Self {
        Self {
            timer,
            tasks: TaskList::new(),
            theme,
            notifier,
            input: String::new(),
            input_mode: InputMode::Normal,
            selected: None,
        }
    }

    // ── Projections ──────────────────────────────────────────────────

    pub fn timer_view(&self) -> TimerView {
        view::timer_view(&self.timer)
    }

    pub fn task_view(&self) -> TaskListView {
        view::task_view(&self.tasks, self.theme.mode(), self.selected)
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.mode()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    // ── Clock ────────────────────────────────────────────────────────

    pub fn on_clock(&mut self, now: Instant) {
        for boundary in self.timer.advance_to(now) {
            self.on_session_boundary(boundary);
        }
    }

    fn on_session_boundary(&mut self, boundary: SessionBoundary) {
        let (title, body) = boundary.ended.ended_message();
        self.notifier.notify(title, body);
        tracing::info!(
            ended = ?boundary.ended,
            started = ?boundary.started,
            pomodoros = self.timer.completed_pomodoros(),
            "session boundary"
        );
    }

    // ── Timer controls ───────────────────────────────────────────────

    pub fn toggle_timer(&mut self, now: Instant) {
        self.timer.toggle(now);
        tracing::debug!(state = ?self.timer.state(), "timer toggled");
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
        tracing::debug!("timer reset");
    }

    pub fn switch_session(&mut self) {
        self.timer.switch_session();
        tracing::debug!(kind = ?self.timer.kind(), "session switched");
    }

    pub fn adjust(&mut self, kind: SessionKind, delta: i32) {
        if !self.timer.adjust(kind, delta) {
            tracing::debug!(?kind, delta, "adjustment ignored while running");
        }
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn submit_task(&mut self) -> Option<TaskId> {
        let id = self.tasks.add(&self.input)?;
        self.input.clear();
        Some(id)
    }

    pub fn toggle_task(&mut self, id: TaskId) {
        self.tasks.toggle(id);
    }

    pub fn delete_task(&mut self, id: TaskId) {
        if self.tasks.delete(id) {
            self.selected = match self.tasks.len() {
                0 => None,
                len => self.selected.map(|idx| idx.min(len - 1)),
            };
        }
    }

    fn selected_task(&self) -> Option<TaskId> {
        self.selected.and_then(|idx| self.tasks.iter().nth(idx)).map(|t| t.id)
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.tasks.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match (self.selected, down) {
            (Some(idx), true) => (idx + 1).min(len - 1),
            (Some(idx), false) => idx.saturating_sub(1),
            (None, true) => 0,
            (None, false) => len - 1,
        });
    }

    // ── Theme ────────────────────────────────────────────────────────

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Returns true when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match self.input_mode {
            InputMode::Editing => {
                self.handle_editing(key);
                false
            }
            InputMode::Normal => self.handle_normal(key, now),
        }
    }

    fn handle_editing(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                self.submit_task();
            }
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            _ => {}
        }
    }

    fn handle_normal(&mut self, key: KeyEvent, now: Instant) -> bool {
        if self.notifier.is_requesting_permission() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.notifier.resolve_permission(true);
                    return false;
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.notifier.resolve_permission(false);
                    return false;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.toggle_timer(now),
            KeyCode::Char('r') => self.reset_timer(),
            KeyCode::Char('s') | KeyCode::Tab => self.switch_session(),
            KeyCode::Char('w') => self.adjust(SessionKind::Work, -1),
            KeyCode::Char('W') => self.adjust(SessionKind::Work, 1),
            KeyCode::Char('b') => self.adjust(SessionKind::Break, -1),
            KeyCode::Char('B') => self.adjust(SessionKind::Break, 1),
            KeyCode::Char('a') | KeyCode::Char('i') => self.input_mode = InputMode::Editing,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Char('x') | KeyCode::Enter => {
                if let Some(id) = self.selected_task() {
                    self.toggle_task(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_task() {
                    self.delete_task(id);
                }
            }
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::notifier::Permission;
    use crate::notifier::testing::RecordingSink;
    use crate::storage::MemoryStore;
    use crate::timer::{SessionConfig, TimerState};

    fn app(permission: Permission) -> (App, RecordingSink) {
        let sink = RecordingSink::default();
        let app = App::new(
            Timer::new(SessionConfig::new(1, 1)),
            ThemeManager::new(Box::new(MemoryStore::default()), None),
            Notifier::new(Box::new(sink.clone()), permission),
        );
        (app, sink)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn boundary_notifies_and_keeps_running() {
        let (mut app, sink) = app(Permission::Granted);
        let t0 = Instant::now();
        app.toggle_timer(t0);
        app.on_clock(t0 + Duration::from_secs(61));

        assert_eq!(app.timer.state(), TimerState::Running(SessionKind::Break));
        assert_eq!(app.timer.completed_pomodoros(), 1);
        assert_eq!(
            sink.shown.borrow().as_slice(),
            [("Work session over".to_string(), "Time for a break!".to_string())]
        );
    }

    #[test]
    fn boundary_proceeds_while_permission_is_pending() {
        let (mut app, sink) = app(Permission::Undetermined);
        let t0 = Instant::now();
        app.toggle_timer(t0);
        app.on_clock(t0 + Duration::from_secs(61));
        assert!(app.notifier.is_requesting_permission());
        assert_eq!(app.timer.kind(), SessionKind::Break);

        app.on_clock(t0 + Duration::from_secs(64));
        assert_eq!(app.timer.remaining_secs(), 57);
        assert!(sink.shown.borrow().is_empty());

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(sink.shown.borrow().len(), 1);
        assert!(app.timer.is_running());
    }

    #[test]
    fn key_map_drives_the_timer() {
        let (mut app, _) = app(Permission::Denied);
        press(&mut app, KeyCode::Char('W'));
        assert_eq!(app.timer.remaining_secs(), 120);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.timer.is_running());
        press(&mut app, KeyCode::Char('W'));
        assert_eq!(app.timer.config().minutes(SessionKind::Work), 2);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.timer.state(), TimerState::Idle(SessionKind::Break));

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.timer.state(), TimerState::Idle(SessionKind::Work));
        assert_eq!(app.timer.remaining_secs(), 120);
    }

    #[test]
    fn task_input_round_trip_through_keys() {
        let (mut app, _) = app(Permission::Denied);
        assert!(matches!(app.task_view(), TaskListView::Placeholder(_)));

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.tasks.is_empty());
        assert_eq!(app.input, "   ");

        app.input.clear();
        type_text(&mut app, "Write spec");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tasks.len(), 1);
        assert!(app.input.is_empty());
        assert_eq!(app.input_mode, InputMode::Editing);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('x'));
        assert!(app.tasks.iter().next().unwrap().completed);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.tasks.is_empty());
        assert_eq!(app.selected(), None);
        assert!(matches!(app.task_view(), TaskListView::Placeholder(_)));

        app.input = "again".into();
        app.submit_task();
        assert!(matches!(app.task_view(), TaskListView::Rows(rows) if rows.len() == 1));
    }

    #[test]
    fn theme_key_restyles_every_row() {
        let (mut app, _) = app(Permission::Denied);
        app.input = "one".into();
        app.submit_task();
        app.input = "two".into();
        app.submit_task();

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme_mode(), ThemeMode::Dark);
        let TaskListView::Rows(rows) = app.task_view() else { panic!("expected rows") };
        assert!(rows.iter().all(|r| r.dark));
    }

    #[test]
    fn quit_keys() {
        let (mut app, _) = app(Permission::Denied);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now()
        ));

        press(&mut app, KeyCode::Char('a'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.input, "q");
    }
}
