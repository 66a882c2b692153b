use chrono::{DateTime, Local};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::task::{Task, TaskStatus};
use crate::ops::quadrant::{Quadrant, indices_in};
use crate::tui::render::board::task_line;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub important: bool,
    pub urgent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub impact: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub next_action: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub effort_estimate: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delegate_to: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delete_reason: String,
}

/// Tasks per quadrant, serialized as an object keyed by quadrant in board order
pub struct BoardJson {
    pub quadrants: Vec<(Quadrant, Vec<TaskJson>)>,
}

impl Serialize for BoardJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.quadrants.len()))?;
        for (quadrant, tasks) in &self.quadrants {
            map.serialize_entry(quadrant.key(), tasks)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        status: task.status,
        important: task.important,
        urgent: task.urgent,
        due_at: task.due_at,
        planned_date: task.planned_date,
        impact: task.impact.clone(),
        next_action: task.next_action.clone(),
        effort_estimate: task.effort_estimate.clone(),
        delegate_to: task.delegate_to.clone(),
        delete_reason: task.delete_reason.clone(),
    }
}

pub fn board_to_json(tasks: &[Task]) -> BoardJson {
    BoardJson {
        quadrants: Quadrant::ALL
            .iter()
            .map(|&q| {
                let rows = indices_in(tasks, q)
                    .into_iter()
                    .map(|i| task_to_json(&tasks[i]))
                    .collect();
                (q, rows)
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Upper-cased quadrant headings, each followed by its task rows.
/// Quadrants are separated by a blank line.
pub fn format_board_listing(tasks: &[Task]) -> Vec<String> {
    let mut lines = Vec::new();
    for (n, &quadrant) in Quadrant::ALL.iter().enumerate() {
        if n > 0 {
            lines.push(String::new());
        }
        lines.push(quadrant.title().to_uppercase());
        let indices = indices_in(tasks, quadrant);
        if indices.is_empty() {
            lines.push("  (no tasks)".to_string());
        }
        for i in indices {
            lines.push(task_line(&tasks[i], false));
        }
    }
    lines
}
