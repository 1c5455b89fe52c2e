use tracing::warn;

use crate::models::{Todo, TodoId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Validation,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    RefreshStarted,
    RefreshSucceeded(Vec<Todo>),
    RefreshFailed(String),
    Created(Todo),
    Replaced { id: TodoId, todo: Todo },
    Removed(TodoId),
    Notify(Notice),
    DismissNotice,
}

#[derive(Debug, Clone)]
pub struct ListState {
    todos: Vec<Todo>,
    status: ViewStatus,
    notice: Option<Notice>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            status: ViewStatus::Loading,
            notice: None,
        }
    }
}

impl ListState {
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::RefreshStarted => {
                self.status = ViewStatus::Loading;
            }
            Action::RefreshSucceeded(todos) => {
                self.todos = todos;
                self.status = ViewStatus::Ready;
            }
            Action::RefreshFailed(message) => {
                self.status = ViewStatus::Failed(message);
            }
            Action::Created(todo) => {
                self.todos.retain(|t| t.id != todo.id);
                self.todos.insert(0, todo);
            }
            Action::Replaced { id, todo } => {
                if !self.todos.iter().any(|t| t.id == id) {
                    return;
                }
                if todo.id != id {
                    warn!("Update of {} came back as {}", id, todo.id);
                    self.todos.retain(|t| t.id != todo.id);
                }
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == id) {
                    *slot = todo;
                }
            }
            Action::Removed(id) => {
                self.todos.retain(|t| t.id != id);
            }
            Action::Notify(notice) => {
                self.notice = Some(notice);
            }
            Action::DismissNotice => {
                self.notice = None;
            }
        }
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn find(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| &t.id == id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status.clone(),
            todos: self.todos.clone(),
            notice: self.notice.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub status: ViewStatus,
    pub todos: Vec<Todo>,
    pub notice: Option<Notice>,
}

impl Snapshot {
    /// The collection, but only while it is authoritative.
    pub fn visible(&self) -> Option<&[Todo]> {
        match self.status {
            ViewStatus::Ready => Some(self.todos.as_slice()),
            _ => None,
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|t| !t.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|t| t.completed)
    }

    pub fn ordered(&self) -> impl Iterator<Item = &Todo> {
        self.pending().chain(self.completed())
    }

    pub fn stats(&self) -> Stats {
        let completed = self.completed().count();
        Stats {
            total: self.todos.len(),
            pending: self.todos.len() - completed,
            completed,
        }
    }
}
