//! Line-oriented interactive session. One controller lives for the whole
//! session, so a failed load can be retried in place.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::print_snapshot;
use crate::controller::{ListController, ViewStatus};
use crate::error::AppError;
use crate::models::TodoId;

const HELP: &str = "\
commands:
  list                 show the list
  add <title>          add a todo
  toggle <id>          mark done / not done
  rename <id> <title>  change a title
  rm <id>              delete a todo
  retry | refresh      reload from the server
  dismiss              clear the last message
  help                 this text
  quit                 leave
";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    List,
    Add(String),
    Toggle(TodoId),
    Rename(TodoId, String),
    Remove(TodoId),
    Refresh,
    Dismiss,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse(line: &str) -> ShellCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match (head, rest) {
        ("", _) => ShellCommand::Empty,
        ("list" | "ls", _) => ShellCommand::List,
        ("add", title) => ShellCommand::Add(title.to_string()),
        ("toggle" | "done", id) if !id.is_empty() => ShellCommand::Toggle(TodoId::from(id)),
        ("rm" | "remove" | "delete", id) if !id.is_empty() => {
            ShellCommand::Remove(TodoId::from(id))
        }
        ("rename", args) => match args.split_once(char::is_whitespace) {
            Some((id, title)) => ShellCommand::Rename(TodoId::from(id), title.trim().to_string()),
            None => ShellCommand::Unknown(line.to_string()),
        },
        ("retry" | "refresh", _) => ShellCommand::Refresh,
        ("dismiss", _) => ShellCommand::Dismiss,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

pub async fn run(controller: &ListController) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let _ = controller.refresh().await;
    show(controller);

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = parse(&line);
        debug!("shell command: {:?}", command);

        // Failures are already recorded as a notice or a failed status, and
        // get rendered below.
        let _ = match command {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                print!("{}", HELP);
                continue;
            }
            ShellCommand::Unknown(input) => {
                println!("unknown command: {} (try `help`)", input);
                continue;
            }
            ShellCommand::List => Ok(()),
            ShellCommand::Refresh => controller.refresh().await,
            ShellCommand::Dismiss => {
                controller.dismiss_notice();
                Ok(())
            }
            ShellCommand::Add(title) => controller.quick_add(&title).await.map(|_| ()),
            ShellCommand::Toggle(id) => controller.toggle_complete(&id).await.map(|_| ()),
            ShellCommand::Remove(id) => controller.remove(&id).await,
            ShellCommand::Rename(id, title) => rename(controller, &id, title).await,
        };

        show(controller);
    }

    Ok(())
}

async fn rename(controller: &ListController, id: &TodoId, title: String) -> Result<(), AppError> {
    let current = controller.current(id)?;

    let mut draft = current.to_draft();
    draft.title = title;
    controller.edit(id, draft).await.map(|_| ())
}

fn show(controller: &ListController) {
    print_snapshot(controller);
    if let ViewStatus::Failed(_) = controller.snapshot().status {
        println!("Type `retry` to load the list again.");
    }
}
