pub mod shell;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::controller::ListController;
use crate::error::AppError;
use crate::models::{Priority, TodoDraft, TodoId};
use crate::view;

#[derive(Debug, Parser)]
#[command(name = "questlog")]
#[command(about = "Keep a remote todo list in order from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the todo collection (overrides QUESTLOG_API_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every todo, pending first
    List,

    /// Add a todo
    Add(AddArgs),

    /// Add a todo by title only
    Quick {
        #[arg(value_name = "TITLE", required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Change fields of an existing todo
    Edit(EditArgs),

    /// Flip a todo between pending and completed
    Toggle {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete a todo
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Interactive session against one live list
    Shell,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(value_name = "TITLE")]
    pub title: String,

    #[arg(short, long, default_value = "")]
    pub description: String,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub due: Option<NaiveDate>,

    #[arg(short, long, default_value = "medium")]
    pub priority: Priority,

    #[arg(long)]
    pub completed: bool,
}

impl AddArgs {
    pub fn into_draft(self) -> TodoDraft {
        TodoDraft {
            title: self.title,
            description: self.description,
            due_date: self.due,
            priority: self.priority,
            completed: self.completed,
        }
    }
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,

    #[arg(short, long)]
    pub priority: Option<Priority>,

    #[arg(long, value_name = "BOOL")]
    pub completed: Option<bool>,
}

impl EditArgs {
    /// Overlay the given flags on a draft pre-filled from the current record.
    pub fn apply(&self, draft: &mut TodoDraft) {
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if self.clear_due {
            draft.due_date = None;
        } else if let Some(due) = self.due {
            draft.due_date = Some(due);
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(completed) = self.completed {
            draft.completed = completed;
        }
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn print_snapshot(controller: &ListController) {
    print!("{}", view::render(&controller.snapshot(), today()));
}

/// Load the list, run one intent, print the resulting list.
pub async fn run(command: Command, controller: &ListController) -> Result<(), AppError> {
    if let Command::Shell = command {
        return shell::run(controller).await;
    }

    if let Err(e) = controller.refresh().await {
        print_snapshot(controller);
        return Err(e);
    }

    let result = match command {
        Command::List | Command::Shell => Ok(()),
        Command::Add(args) => controller.add(args.into_draft()).await.map(|_| ()),
        Command::Quick { words } => controller.quick_add(&words.join(" ")).await.map(|_| ()),
        Command::Edit(args) => edit(controller, &args).await,
        Command::Toggle { id } => controller
            .toggle_complete(&TodoId::from(id))
            .await
            .map(|_| ()),
        Command::Remove { id } => controller.remove(&TodoId::from(id)).await,
    };

    print_snapshot(controller);
    result
}

async fn edit(controller: &ListController, args: &EditArgs) -> Result<(), AppError> {
    let id = TodoId::from(args.id.as_str());
    let current = controller.current(&id)?;

    let mut draft = current.to_draft();
    args.apply(&mut draft);
    controller.edit(&id, draft).await.map(|_| ())
}
