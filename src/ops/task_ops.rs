use chrono::{DateTime, Local};

use crate::model::task::{Task, TaskStatus};
use crate::ops::quadrant::apply_urgency;

/// Error type for task list operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("no task at position {0}")]
    InvalidPosition(usize),
}

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

/// Toggle done: done → pending, anything else → done
pub fn toggle_done(task: &mut Task) {
    task.status = if task.status == TaskStatus::Done {
        TaskStatus::Pending
    } else {
        TaskStatus::Done
    };
}

/// Toggle the task at `index` in the list
pub fn toggle_done_at(tasks: &mut [Task], index: usize) -> Result<(), TaskError> {
    let task = tasks.get_mut(index).ok_or(TaskError::InvalidPosition(index))?;
    toggle_done(task);
    Ok(())
}

// ---------------------------------------------------------------------------
// Structural edits
// ---------------------------------------------------------------------------

/// Remove the task at `index`, returning it
pub fn remove_at(tasks: &mut Vec<Task>, index: usize) -> Result<Task, TaskError> {
    if index >= tasks.len() {
        return Err(TaskError::InvalidPosition(index));
    }
    Ok(tasks.remove(index))
}

pub fn find_by_id_mut<'a>(
    tasks: &'a mut [Task],
    id: &str,
) -> Result<&'a mut Task, TaskError> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

/// Run urgency promotion over the whole list
pub fn promote_urgent(tasks: &mut [Task], now: DateTime<Local>) {
    for task in tasks.iter_mut() {
        if task.urgent || task.due_at.is_none() {
            continue;
        }
        *task = apply_urgency(task.clone(), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("First", true, true, now()),
            Task::new("Second", false, false, now()),
            Task::new("Third", true, false, now()),
        ]
    }

    #[test]
    fn toggle_done_round_trips_through_pending() {
        let mut tasks = sample();
        tasks[0].status = TaskStatus::Deferred;
        toggle_done_at(&mut tasks, 0).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Done);
        toggle_done_at(&mut tasks, 0).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn toggle_out_of_range() {
        let mut tasks = sample();
        assert!(matches!(
            toggle_done_at(&mut tasks, 9),
            Err(TaskError::InvalidPosition(9))
        ));
    }

    #[test]
    fn remove_keeps_order() {
        let mut tasks = sample();
        let removed = remove_at(&mut tasks, 1).unwrap();
        assert_eq!(removed.title, "Second");
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Third"]);
        assert!(remove_at(&mut tasks, 2).is_err());
    }

    #[test]
    fn find_by_id() {
        let mut tasks = sample();
        let id = tasks[2].id.clone();
        find_by_id_mut(&mut tasks, &id).unwrap().title = "Renamed".into();
        assert_eq!(tasks[2].title, "Renamed");
        assert!(matches!(
            find_by_id_mut(&mut tasks, "missing"),
            Err(TaskError::NotFound(_))
        ));
    }

    #[test]
    fn promote_only_touches_due_soon() {
        let mut tasks = sample();
        tasks[1].due_at = Some(now() + TimeDelta::hours(2));
        tasks[2].due_at = Some(now() + TimeDelta::days(3));
        promote_urgent(&mut tasks, now());
        assert!(tasks[1].urgent);
        assert!(!tasks[2].urgent);
    }
}
