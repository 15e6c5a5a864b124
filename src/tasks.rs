use std::fmt;

/// Creation timestamp in milliseconds, bumped when two tasks share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    last_id: Option<TaskId>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        self.add_at(text, chrono::Utc::now().timestamp_millis())
    }

    fn add_at(&mut self, text: &str, now_ms: i64) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let id = match self.last_id {
            Some(TaskId(last)) if now_ms <= last => TaskId(last + 1),
            _ => TaskId(now_ms),
        };
        self.last_id = Some(id);
        self.tasks.push(Task { id, text: text.into(), completed: false });
        tracing::debug!(%id, "task added");
        Some(id)
    }

    pub fn toggle(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                tracing::debug!(%id, completed = task.completed, "task toggled");
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        self.tasks.remove(idx);
        tracing::debug!(%id, remaining = self.tasks.len(), "task deleted");
        true
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
