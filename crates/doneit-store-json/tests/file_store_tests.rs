#![allow(missing_docs)]

use doneit_core::{DueDate, OwnerId, Priority, TaskId, TaskPatch, TaskRecord};
use doneit_store_json::{JsonStore, JsonStoreError};
use std::error::Error;
use std::fs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn record(id: &str, owner: &str, priority: Priority) -> TaskRecord {
    TaskRecord::new(format!("task {id}"), priority)
        .with_id(id)
        .with_owner(OwnerId::new(owner))
}

#[test]
fn writes_survive_reopen() -> TestResult {
    let dir = TempDir::with_prefix("doneit-store-test-")?;
    let path = dir.path().join("nested").join("tasks.json");

    let store = JsonStore::open(&path)?;
    let due = DueDate::parse("24-12-2025")?;
    store.create(&record("a", "alice", Priority::High).with_due_date(due))?;
    store.create(&record("b", "alice", Priority::Low))?;
    store.update(&TaskId::from("b"), &TaskPatch::completion(true))?;
    store.delete(&TaskId::from("a"))?;
    drop(store);

    let reopened = JsonStore::open(&path)?;
    let tasks = reopened.query(&OwnerId::new("alice"))?;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId::from("b"));
    assert!(tasks[0].completed);
    Ok(())
}

#[test]
fn missing_file_opens_empty() -> TestResult {
    let dir = TempDir::with_prefix("doneit-store-test-")?;
    let store = JsonStore::open(dir.path().join("absent.json"))?;
    assert!(store.is_empty()?);
    assert!(!dir.path().join("absent.json").exists());
    Ok(())
}

#[test]
fn reads_records_written_by_other_clients() -> TestResult {
    let dir = TempDir::with_prefix("doneit-store-test-")?;
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[
  {"id": "x", "ownerId": "alice", "title": "Legacy", "description": "", "priority": "Someday", "dueDate": "", "location": "", "completed": false}
]"#,
    )?;

    let store = JsonStore::open(&path)?;
    let task = store.get(&TaskId::from("x"))?.ok_or("legacy task missing")?;
    assert_eq!(task.priority, Priority::Other("Someday".into()));
    assert_eq!(task.due_date, None);
    Ok(())
}

#[test]
fn unreadable_due_date_does_not_block_the_file() -> TestResult {
    let dir = TempDir::with_prefix("doneit-store-test-")?;
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[
  {"id": "x", "ownerId": "alice", "title": "Slashed", "priority": "High", "dueDate": "2025/12/24", "completed": false},
  {"id": "y", "ownerId": "alice", "title": "Dashed", "priority": "Low", "dueDate": "24-12-2025", "completed": false}
]"#,
    )?;

    let store = JsonStore::open(&path)?;
    assert_eq!(store.len()?, 2);
    let slashed = store.get(&TaskId::from("x"))?.ok_or("task x missing")?;
    assert_eq!(slashed.due_date, None);
    let dashed = store.get(&TaskId::from("y"))?.ok_or("task y missing")?;
    assert_eq!(dashed.due_date, Some(DueDate::parse("24-12-2025")?));
    Ok(())
}

#[test]
fn corrupt_file_is_reported() -> TestResult {
    let dir = TempDir::with_prefix("doneit-store-test-")?;
    let path = dir.path().join("tasks.json");
    fs::write(&path, "{ not json")?;

    assert!(matches!(JsonStore::open(&path), Err(JsonStoreError::Json(_))));
    Ok(())
}

#[test]
fn failed_batch_leaves_file_untouched() -> TestResult {
    let dir = TempDir::with_prefix("doneit-store-test-")?;
    let path = dir.path().join("tasks.json");
    let store = JsonStore::open(&path)?;
    store.create(&record("a", "alice", Priority::Medium))?;
    let before = fs::read_to_string(&path)?;

    let result = store.batch_write(&[record("b", "alice", Priority::Low), record("", "alice", Priority::Low)]);
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path)?, before);
    assert_eq!(store.len()?, 1);
    Ok(())
}
