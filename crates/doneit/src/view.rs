//! Plain-text rendering of the board for the terminal.

use std::io::{self, Write};

use doneit_core::{BoardView, TaskRecord};

/// Print the visible tasks as a table, or the empty placeholder.
pub fn render_board(view: &BoardView, out: &mut dyn Write) -> io::Result<()> {
    if view.tasks.is_empty() {
        return writeln!(out, "{}", view.empty_message);
    }

    writeln!(out, "ID | Priority | Title | Due | Location")?;
    writeln!(out, "-- | -------- | ----- | --- | --------")?;
    for task in &view.tasks {
        let due = task
            .due_date
            .map_or_else(|| "-".to_owned(), |due| due.to_string());
        let location = task.location.as_deref().unwrap_or("-");
        writeln!(
            out,
            "{} | {} | {} | {} | {}",
            task.id, task.priority, task.title, due, location
        )?;
    }
    if view.show_completion_controls {
        writeln!(out, "\n{} open. Use `doneit done --task <ID>` to complete one.", view.tasks.len())?;
    }
    Ok(())
}

/// Print one task as pretty JSON.
pub fn render_task(task: &TaskRecord, out: &mut dyn Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(task).map_err(io::Error::other)?;
    writeln!(out, "{json}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use doneit_core::{DueDate, Partition, Priority};

    fn board(tasks: Vec<TaskRecord>, partition: Partition) -> BoardView {
        BoardView {
            partition,
            priority_filter: None,
            tasks,
            show_completion_controls: partition == Partition::Incomplete,
            empty_message: "No tasks found".into(),
            loaded: true,
        }
    }

    fn render(view: &BoardView) -> String {
        let mut out = Vec::new();
        render_board(view, &mut out).unwrap_or_else(|err| panic!("render failed: {err}"));
        String::from_utf8(out).unwrap_or_else(|err| panic!("render produced invalid utf-8: {err}"))
    }

    #[test]
    fn empty_board_prints_placeholder() {
        assert_eq!(render(&board(Vec::new(), Partition::Incomplete)), "No tasks found\n");
    }

    #[test]
    fn rows_show_priority_and_optional_fields() {
        let due = DueDate::parse("24-12-2025").unwrap_or_else(|err| panic!("{err}"));
        let tasks = vec![
            TaskRecord::new("Buy milk", Priority::High)
                .with_id("a")
                .with_due_date(due)
                .with_location("Shop"),
            TaskRecord::new("Read", Priority::Low).with_id("b"),
        ];
        let text = render(&board(tasks, Partition::Incomplete));

        assert!(text.contains("a | High | Buy milk | 24-12-2025 | Shop"));
        assert!(text.contains("b | Low | Read | - | -"));
        assert!(text.contains("2 open."));
    }

    #[test]
    fn completed_board_has_no_completion_hint() {
        let tasks = vec![TaskRecord::new("Done thing", Priority::Medium).with_id("c").with_completed(true)];
        let text = render(&board(tasks, Partition::Complete));
        assert!(text.contains("Done thing"));
        assert!(!text.contains("open."));
    }
}
