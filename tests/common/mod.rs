#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use questlog::error::AppError;
use questlog::models::{Priority, Todo, TodoDraft, TodoId};
use questlog::remote::TodoApi;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{Notify, RwLock};

pub fn todo(id: &str, title: &str, completed: bool) -> Todo {
    Todo {
        id: TodoId::from(id),
        title: title.to_string(),
        description: String::new(),
        due_date: None,
        priority: Priority::Medium,
        completed,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

/// In-memory stand-in for the todo server, with failure injection.
#[derive(Default)]
pub struct FakeApi {
    store: Mutex<Vec<Todo>>,
    next_id: AtomicUsize,
    calls: Mutex<Vec<Op>>,
    failing: Mutex<Vec<Op>>,
    update_override: Mutex<Option<Todo>>,
    hold_updates: AtomicBool,
    gate: Notify,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let api = Self::default();
        *api.store.lock().unwrap() = todos;
        api
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().push(op);
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn respond_to_next_update_with(&self, todo: Todo) {
        *self.update_override.lock().unwrap() = Some(todo);
    }

    /// Park every update until `release_update` is called.
    pub fn hold_updates(&self) {
        self.hold_updates.store(true, Ordering::SeqCst);
    }

    pub fn release_update(&self) {
        self.hold_updates.store(false, Ordering::SeqCst);
        self.gate.notify_one();
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<Todo> {
        self.store.lock().unwrap().clone()
    }

    fn record(&self, op: Op) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(AppError::Transport {
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn from_draft(id: TodoId, draft: &TodoDraft) -> Todo {
    Todo {
        id,
        title: draft.title.clone(),
        description: draft.description.clone(),
        due_date: draft.due_date,
        priority: draft.priority,
        completed: draft.completed,
    }
}

fn not_found() -> AppError {
    AppError::Transport {
        status: 404,
        body: "not found".to_string(),
    }
}

#[async_trait]
impl TodoApi for FakeApi {
    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        self.record(Op::List)?;
        Ok(self.stored())
    }

    async fn create(&self, draft: &TodoDraft) -> Result<Todo, AppError> {
        self.record(Op::Create)?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let todo = from_draft(TodoId::new(format!("t{}", n)), draft);
        self.store.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &TodoId, draft: &TodoDraft) -> Result<Todo, AppError> {
        if self.hold_updates.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        self.record(Op::Update)?;

        let replacement = self
            .update_override
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| from_draft(id.clone(), draft));

        let mut store = self.store.lock().unwrap();
        let slot = store.iter_mut().find(|t| &t.id == id).ok_or_else(not_found)?;
        *slot = replacement.clone();
        Ok(replacement)
    }

    async fn delete(&self, id: &TodoId) -> Result<(), AppError> {
        self.record(Op::Delete)?;
        let mut store = self.store.lock().unwrap();
        let before = store.len();
        store.retain(|t| &t.id != id);
        if store.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

pub type Db = Arc<RwLock<Vec<Value>>>;

/// A document-store shaped todo server: records carry `_id`, updates replace
/// the whole document, delete answers with a small JSON message.
pub fn server_app(db: Db) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(db)
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Value>> {
    Json(db.read().await.clone())
}

async fn create_todo(State(db): State<Db>, Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut docs = db.write().await;
    body["_id"] = json!(format!("{:024x}", docs.len() + 1));
    docs.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut docs = db.write().await;
    let doc = docs
        .iter_mut()
        .find(|d| d["_id"] == id.as_str())
        .ok_or(StatusCode::NOT_FOUND)?;
    body["_id"] = json!(id);
    *doc = body.clone();
    Ok(Json(body))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut docs = db.write().await;
    let before = docs.len();
    docs.retain(|d| d["_id"] != id.as_str());
    if docs.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "Todo deleted" })))
}

/// Serve `app` on an ephemeral port and return its address.
pub async fn spawn(app: Router) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
