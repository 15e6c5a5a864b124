//! Pure projection of application state into what the screen shows.

use crate::tasks::{TaskId, TaskList};
use crate::theme::ThemeMode;
use crate::timer::{SessionKind, Timer};

pub const EMPTY_TASKS: &str = "No tasks yet, add your first one!";
pub const POMODORO_ICON: &str = "🍅";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerView {
    pub kind: SessionKind,
    pub label: &'static str,
    pub clock: String,
    pub warning: bool,
    pub running: bool,
    pub control: &'static str,
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub pomodoros: String,
}

pub fn timer_view(timer: &Timer) -> TimerView {
    let running = timer.is_running();
    TimerView {
        kind: timer.kind(),
        label: timer.kind().label(),
        clock: timer.clock(),
        warning: timer.is_warning(),
        running,
        control: if running { "⏸" } else { "▶" },
        work_minutes: timer.config().minutes(SessionKind::Work),
        break_minutes: timer.config().minutes(SessionKind::Break),
        pomodoros: POMODORO_ICON.repeat(timer.completed_pomodoros() as usize),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub dark: bool,
    pub selected: bool,
}

impl TaskRow {
    pub fn checkbox(&self) -> &'static str {
        if self.completed { "[x]" } else { "[ ]" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
    Placeholder(&'static str),
    Rows(Vec<TaskRow>),
}

pub fn task_view(tasks: &TaskList, mode: ThemeMode, selected: Option<usize>) -> TaskListView {
    if tasks.is_empty() {
        return TaskListView::Placeholder(EMPTY_TASKS);
    }
    let dark = mode == ThemeMode::Dark;
    TaskListView::Rows(
        tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| TaskRow {
                id: task.id,
                text: task.text.clone(),
                completed: task.completed,
                dark,
                selected: selected == Some(idx),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::timer::SessionConfig;

    #[test]
    fn idle_timer_projection() {
        let view = timer_view(&Timer::new(SessionConfig::default()));
        assert_eq!(view.label, SessionKind::Work.label());
        assert_eq!(view.clock, "25:00");
        assert_eq!(view.control, "▶");
        assert!(!view.warning);
        assert_eq!((view.work_minutes, view.break_minutes), (25, 5));
        assert!(view.pomodoros.is_empty());
    }

    #[test]
    fn pomodoros_render_as_repeated_icons() {
        let mut timer = Timer::new(SessionConfig::new(1, 1));
        timer.start(Instant::now());
        for _ in 0..(61 + 61 + 61) {
            timer.tick();
        }
        let view = timer_view(&timer);
        assert_eq!(timer.completed_pomodoros(), 2);
        assert_eq!(view.pomodoros, "🍅🍅");
        assert_eq!(view.control, "⏸");
    }

    #[test]
    fn empty_list_projects_placeholder() {
        assert_eq!(
            task_view(&TaskList::new(), ThemeMode::Light, None),
            TaskListView::Placeholder(EMPTY_TASKS)
        );
    }

    #[test]
    fn rows_are_idempotent_and_follow_theme() {
        let mut tasks = TaskList::new();
        let a = tasks.add("a").unwrap();
        tasks.add("b");
        tasks.toggle(a);

        let first = task_view(&tasks, ThemeMode::Dark, Some(1));
        assert_eq!(first, task_view(&tasks, ThemeMode::Dark, Some(1)));

        let TaskListView::Rows(rows) = first else { panic!("expected rows") };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].checkbox(), "[x]");
        assert_eq!(rows[1].checkbox(), "[ ]");
        assert!(rows.iter().all(|r| r.dark));
        assert!(!rows[0].selected && rows[1].selected);

        let TaskListView::Rows(light) = task_view(&tasks, ThemeMode::Light, Some(1)) else {
            panic!("expected rows")
        };
        assert!(light.iter().all(|r| !r.dark));
    }
}
