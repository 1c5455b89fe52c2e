use std::fmt::Write;

use chrono::NaiveDate;

use crate::controller::{Notice, NoticeKind, Snapshot, ViewStatus};
use crate::models::Todo;

pub fn render(snapshot: &Snapshot, today: NaiveDate) -> String {
    let mut out = String::new();

    match &snapshot.status {
        ViewStatus::Loading => {
            out.push_str("Loading todos...\n");
        }
        ViewStatus::Failed(message) => {
            let _ = writeln!(out, "Error: {}", message);
        }
        ViewStatus::Ready => render_list(&mut out, snapshot, today),
    }

    if let Some(notice) = &snapshot.notice {
        out.push_str(&render_notice(notice));
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let label = match notice.kind {
        NoticeKind::Validation => "!",
        NoticeKind::Failure => "x",
    };
    format!("[{}] {}\n", label, notice.message)
}

fn render_list(out: &mut String, snapshot: &Snapshot, today: NaiveDate) {
    let stats = snapshot.stats();
    let _ = writeln!(
        out,
        "Total {} | Pending {} | Done {}",
        stats.total, stats.pending, stats.completed
    );

    if stats.total == 0 {
        out.push_str("No todos yet. Add one to get started.\n");
        return;
    }

    for todo in snapshot.ordered() {
        render_todo(out, todo, today);
    }
}

fn render_todo(out: &mut String, todo: &Todo, today: NaiveDate) {
    let check = if todo.completed { "x" } else { " " };
    let _ = write!(
        out,
        "[{}] {}  {} ({})",
        check,
        todo.id,
        todo.title,
        todo.priority
    );

    if let Some(due) = todo.due_date {
        let _ = write!(out, "  due {}", due.format("%Y-%m-%d"));
        if todo.is_overdue(today) {
            out.push_str(" OVERDUE");
        }
    }
    out.push('\n');

    if !todo.description.is_empty() {
        for line in todo.description.lines() {
            let _ = writeln!(out, "      {}", line);
        }
    }
}
