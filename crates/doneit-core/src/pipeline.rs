//! Filter and order one partition for display.

use crate::TaskRecord;
use crate::priority::Priority;

/// Filter a partition by priority and order it `High`, `Medium`, `Low`, other.
///
/// With a filter set, only records whose priority equals it exactly are kept.
/// The sort is stable, so records of equal rank keep their input order and
/// re-rendering the same input never reshuffles the list. An empty result
/// means nothing matched.
#[must_use]
pub fn render<'a, I>(partition: I, priority_filter: Option<&Priority>) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let mut visible: Vec<&TaskRecord> = match priority_filter {
        Some(filter) => partition
            .into_iter()
            .filter(|task| task.priority == *filter)
            .collect(),
        None => partition.into_iter().collect(),
    };
    visible.sort_by_key(|task| task.priority.rank());
    visible
}

/// Placeholder text shown when [`render`] returns nothing.
#[must_use]
pub fn empty_message(priority_filter: Option<&Priority>) -> String {
    priority_filter.map_or_else(
        || "No tasks found".to_owned(),
        |priority| format!("No {priority} priority tasks"),
    )
}
