use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use doneit_app::{SessionProvider, TaskCoordinator, TaskStore, ViewConfig};
use doneit_core::{DueDate, Outcome, Partition, Priority, TaskId, TaskRecord};

use crate::view::{render_board, render_task};
use crate::{Command, LsFormat};

pub async fn run<S, A>(
    command: Command,
    coordinator: &TaskCoordinator<S, A>,
    view: &ViewConfig,
    out: &mut dyn Write,
) -> Result<()>
where
    S: TaskStore,
    A: SessionProvider,
{
    match command {
        Command::Ls {
            completed,
            priority,
            format,
        } => handle_ls(coordinator, view, completed, priority.as_deref(), format, out).await,
        Command::Add {
            title,
            priority,
            description,
            due,
            location,
        } => {
            let mut task = TaskRecord::new(title, Priority::parse(&priority));
            if let Some(description) = description {
                task = task.with_description(description);
            }
            if let Some(due) = due {
                task = task.with_due_date(DueDate::parse(&due)?);
            }
            if let Some(location) = location {
                task = task.with_location(location);
            }
            let created = settle(coordinator.add(task).await)?;
            writeln!(out, "Created task {}", created.id)?;
            Ok(())
        }
        Command::Edit {
            task,
            title,
            priority,
            description,
            due,
            location,
        } => {
            let current = settle(coordinator.fetch(&parse_task_id(&task)?).await)?;
            let edited = apply_edits(current, title, priority, description, due.as_deref(), location)?;
            let updated = settle(coordinator.update(&edited).await)?;
            writeln!(out, "Updated task {}", updated.id)?;
            Ok(())
        }
        Command::Done { task } => {
            let current = settle(coordinator.fetch(&parse_task_id(&task)?).await)?;
            let toggled = settle(coordinator.toggle_done(&current).await)?;
            let state = if toggled.completed { "completed" } else { "open" };
            writeln!(out, "Marked task {} as {state}", toggled.id)?;
            Ok(())
        }
        Command::Rm { task } => {
            let current = settle(coordinator.fetch(&parse_task_id(&task)?).await)?;
            let removed = settle(coordinator.delete(&current).await)?;
            writeln!(out, "Deleted task {}", removed.id)?;
            Ok(())
        }
        Command::Show { task } => {
            let current = settle(coordinator.fetch(&parse_task_id(&task)?).await)?;
            render_task(&current, out)?;
            Ok(())
        }
        Command::Import { file } => handle_import(coordinator, &file, out).await,
    }
}

async fn handle_ls<S, A>(
    coordinator: &TaskCoordinator<S, A>,
    view: &ViewConfig,
    completed: bool,
    priority: Option<&str>,
    format: LsFormat,
    out: &mut dyn Write,
) -> Result<()>
where
    S: TaskStore,
    A: SessionProvider,
{
    settle(coordinator.reload().await)?;

    let partition = if completed {
        Partition::Complete
    } else {
        view.partition
    };
    coordinator.select_partition(partition).await;
    if let Some(filter) = priority.map(Priority::parse).or_else(|| view.priority()) {
        coordinator.set_priority_filter(filter).await;
    }

    let board = coordinator.view().await;
    match format {
        LsFormat::Table => render_board(&board, out)?,
        LsFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&board.tasks)?)?,
    }
    Ok(())
}

async fn handle_import<S, A>(coordinator: &TaskCoordinator<S, A>, file: &Path, out: &mut dyn Write) -> Result<()>
where
    S: TaskStore,
    A: SessionProvider,
{
    let contents = fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let tasks: Vec<TaskRecord> =
        serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", file.display()))?;
    let requested = tasks.len();
    let stored = settle(coordinator.bulk_store(tasks).await)?;
    writeln!(out, "Stored {stored} of {requested} tasks")?;
    Ok(())
}

fn apply_edits(
    mut task: TaskRecord,
    title: Option<String>,
    priority: Option<String>,
    description: Option<String>,
    due: Option<&str>,
    location: Option<String>,
) -> Result<TaskRecord> {
    if let Some(title) = title {
        task.title = title;
    }
    if let Some(priority) = priority {
        task.priority = Priority::parse(&priority);
    }
    if let Some(description) = description {
        task = task.with_description(description);
    }
    if let Some(due) = due {
        task.due_date = if due.trim().is_empty() {
            None
        } else {
            Some(DueDate::parse(due)?)
        };
    }
    if let Some(location) = location {
        task = task.with_location(location);
    }
    Ok(task)
}

/// Turn a finished outcome into a CLI result.
fn settle<T>(outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Success(value) => Ok(value),
        Outcome::Failure(failure) => Err(anyhow!(failure.message)),
        Outcome::Loading => bail!("operation did not finish"),
    }
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    let id = TaskId::new(raw.trim());
    if id.is_empty() {
        bail!("Invalid task id: {raw:?}");
    }
    Ok(id)
}
