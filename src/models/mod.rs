pub mod todo;

pub use todo::{Priority, Todo, TodoDraft, TodoId};
