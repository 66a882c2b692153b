use chrono::{DateTime, Local, TimeDelta};

use crate::model::task::Task;

/// Tasks due within this window are promoted to urgent.
pub const URGENCY_WINDOW_HOURS: i64 = 24;

/// One of the four Eisenhower categories, in board order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    ImportantImmediate,
    ImportantNotImmediate,
    NotImportantImmediate,
    NotImportantNotImmediate,
}

impl Quadrant {
    /// Board order: top-left, top-right, bottom-left, bottom-right
    pub const ALL: [Quadrant; 4] = [
        Quadrant::ImportantImmediate,
        Quadrant::ImportantNotImmediate,
        Quadrant::NotImportantImmediate,
        Quadrant::NotImportantNotImmediate,
    ];

    pub fn from_flags(important: bool, urgent: bool) -> Self {
        match (important, urgent) {
            (true, true) => Quadrant::ImportantImmediate,
            (true, false) => Quadrant::ImportantNotImmediate,
            (false, true) => Quadrant::NotImportantImmediate,
            (false, false) => Quadrant::NotImportantNotImmediate,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Quadrant::ImportantImmediate => 0,
            Quadrant::ImportantNotImmediate => 1,
            Quadrant::NotImportantImmediate => 2,
            Quadrant::NotImportantNotImmediate => 3,
        }
    }

    /// Inverse of `index`; values past 3 wrap.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            Quadrant::ImportantImmediate => "Important & Immediate",
            Quadrant::ImportantNotImmediate => "Important & Not Immediate",
            Quadrant::NotImportantImmediate => "Not Important & Immediate",
            Quadrant::NotImportantNotImmediate => "Not Important & Not Immediate",
        }
    }

    /// Short stable key used in JSON output
    pub fn key(self) -> &'static str {
        match self {
            Quadrant::ImportantImmediate => "do_now",
            Quadrant::ImportantNotImmediate => "plan",
            Quadrant::NotImportantImmediate => "delegate",
            Quadrant::NotImportantNotImmediate => "eliminate",
        }
    }
}

pub fn quadrant_of(task: &Task) -> Quadrant {
    Quadrant::from_flags(task.important, task.urgent)
}

pub fn quadrant_index(task: &Task) -> usize {
    quadrant_of(task).index()
}

/// Promote a task to urgent when its due time is at most 24h away.
/// Never clears the flag.
pub fn apply_urgency(mut task: Task, now: DateTime<Local>) -> Task {
    if let Some(due) = task.due_at
        && due - now <= TimeDelta::hours(URGENCY_WINDOW_HOURS)
    {
        task.urgent = true;
    }
    task
}

/// Indices into `tasks` of the tasks in `quadrant`, in list order
pub fn indices_in(tasks: &[Task], quadrant: Quadrant) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| quadrant_of(t) == quadrant)
        .map(|(i, _)| i)
        .collect()
}
