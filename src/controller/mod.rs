pub mod state;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{Todo, TodoDraft, TodoId};
use crate::remote::TodoApi;

pub use state::{Action, ListState, Notice, NoticeKind, Snapshot, Stats, ViewStatus};

pub const LOAD_FAILED: &str = "Failed to load the todo list.";
pub const ADD_FAILED: &str = "Failed to add the todo.";
pub const UPDATE_FAILED: &str = "Failed to update the todo.";
pub const DELETE_FAILED: &str = "Failed to delete the todo.";
pub const TITLE_REQUIRED: &str = "Please enter a title.";
pub const BUSY: &str = "That todo is still being saved.";
pub const UNKNOWN_TODO: &str = "That todo is not in the list.";
pub const NOT_LOADED: &str = "Reload the list before changing a todo.";

#[derive(Default)]
struct Inner {
    state: ListState,
    in_flight: HashSet<TodoId>,
}

pub struct ListController {
    api: Arc<dyn TodoApi>,
    inner: Mutex<Inner>,
    events: watch::Sender<Snapshot>,
}

impl ListController {
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        let inner = Inner::default();
        let (events, _) = watch::channel(inner.state.snapshot());
        Self {
            api,
            inner: Mutex::new(inner),
            events,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.events.subscribe()
    }

    /// `None` unless the list is loaded.
    pub fn find(&self, id: &TodoId) -> Option<Todo> {
        let inner = self.lock();
        match inner.state.status() {
            ViewStatus::Ready => inner.state.find(id).cloned(),
            _ => None,
        }
    }

    /// Like [`find`](Self::find), but records a notice when there is nothing
    /// usable to start from.
    pub fn current(&self, id: &TodoId) -> Result<Todo, AppError> {
        let (loaded, found) = {
            let inner = self.lock();
            let loaded = *inner.state.status() == ViewStatus::Ready;
            (loaded, inner.state.find(id).cloned())
        };

        match (loaded, found) {
            (true, Some(todo)) => Ok(todo),
            (false, _) => {
                warn!("Rejected change to {}: the list is not loaded", id);
                self.dispatch(Action::Notify(Notice::failure(NOT_LOADED)));
                Err(AppError::NotLoaded)
            }
            (true, None) => {
                self.dispatch(Action::Notify(Notice::failure(UNKNOWN_TODO)));
                Err(AppError::UnknownTodo(id.clone()))
            }
        }
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.dispatch(Action::RefreshStarted);

        match self.api.list().await {
            Ok(todos) => {
                info!("Loaded {} todos", todos.len());
                self.dispatch(Action::RefreshSucceeded(todos));
                Ok(())
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                self.dispatch(Action::RefreshFailed(LOAD_FAILED.to_string()));
                Err(e)
            }
        }
    }

    pub async fn add(&self, draft: TodoDraft) -> Result<Todo, AppError> {
        if !draft.has_title() {
            return Err(self.reject_blank_title());
        }

        match self.api.create(&draft).await {
            Ok(todo) => {
                info!("Created todo {}", todo.id);
                self.dispatch(Action::Created(todo.clone()));
                Ok(todo)
            }
            Err(e) => Err(self.fail(ADD_FAILED, e)),
        }
    }

    pub async fn quick_add(&self, title: &str) -> Result<Todo, AppError> {
        self.add(TodoDraft::new(title.trim())).await
    }

    pub async fn edit(&self, id: &TodoId, draft: TodoDraft) -> Result<Todo, AppError> {
        if !draft.has_title() {
            return Err(self.reject_blank_title());
        }
        let claim = self.claim(id)?;
        let result = self.api.update(id, &draft).await;
        drop(claim);

        match result {
            Ok(todo) => {
                info!("Updated todo {}", id);
                self.dispatch(Action::Replaced {
                    id: id.clone(),
                    todo: todo.clone(),
                });
                Ok(todo)
            }
            Err(e) => Err(self.fail(UPDATE_FAILED, e)),
        }
    }

    pub async fn toggle_complete(&self, id: &TodoId) -> Result<Todo, AppError> {
        let current = self.current(id)?;

        let mut draft = current.to_draft();
        draft.completed = !draft.completed;
        self.edit(id, draft).await
    }

    pub async fn remove(&self, id: &TodoId) -> Result<(), AppError> {
        let claim = self.claim(id)?;
        let result = self.api.delete(id).await;
        drop(claim);

        match result {
            Ok(()) => {
                info!("Deleted todo {}", id);
                self.dispatch(Action::Removed(id.clone()));
                Ok(())
            }
            Err(e) => Err(self.fail(DELETE_FAILED, e)),
        }
    }

    pub fn dismiss_notice(&self) {
        self.dispatch(Action::DismissNotice);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, action: Action) {
        let snapshot = {
            let mut inner = self.lock();
            inner.state.reduce(action);
            inner.state.snapshot()
        };
        self.events.send_replace(snapshot);
    }

    fn claim(&self, id: &TodoId) -> Result<Claim<'_>, AppError> {
        let claimed = self.lock().in_flight.insert(id.clone());
        if claimed {
            return Ok(Claim {
                controller: self,
                id: id.clone(),
            });
        }

        warn!("Rejected change to {}: another change is in flight", id);
        self.dispatch(Action::Notify(Notice::failure(BUSY)));
        Err(AppError::Busy(id.clone()))
    }

    fn reject_blank_title(&self) -> AppError {
        self.dispatch(Action::Notify(Notice::validation(TITLE_REQUIRED)));
        AppError::Validation(TITLE_REQUIRED.to_string())
    }

    fn fail(&self, message: &str, err: AppError) -> AppError {
        warn!("{} ({})", message, err);
        self.dispatch(Action::Notify(Notice::failure(message)));
        err
    }
}

/// Marks an id as in flight until dropped, including when the calling future
/// is cancelled mid-request.
struct Claim<'a> {
    controller: &'a ListController,
    id: TodoId,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.controller.lock().in_flight.remove(&self.id);
    }
}
