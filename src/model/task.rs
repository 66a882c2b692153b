use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
    Deferred,
}

impl TaskStatus {
    /// Cycle order used by the form's status field
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::Done, TaskStatus::Deferred];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Done => "done",
            TaskStatus::Deferred => "deferred",
        }
    }

    /// The checkbox shown on the board
    pub fn checkbox(self) -> &'static str {
        match self {
            TaskStatus::Pending => "[ ]",
            TaskStatus::Done => "[x]",
            TaskStatus::Deferred => "[-]",
        }
    }

    /// Next status in cycle order, wrapping
    pub fn next(self) -> TaskStatus {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Empty or unrecognized values decode as `Pending`.
impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.trim() {
            "done" => TaskStatus::Done,
            "deferred" => TaskStatus::Deferred,
            _ => TaskStatus::Pending,
        }
    }
}

/// A null status decodes as `Pending`.
impl From<Option<String>> for TaskStatus {
    fn from(s: Option<String>) -> Self {
        s.map(TaskStatus::from).unwrap_or_default()
    }
}

/// A single task on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub impact: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub delegate_to: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub delete_reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub effort_estimate: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default = "unset_time", deserialize_with = "nullable_time")]
    pub created_at: DateTime<Local>,
}

impl Task {
    /// Create a pending task with a fresh id
    pub fn new(
        title: impl Into<String>,
        important: bool,
        urgent: bool,
        now: DateTime<Local>,
    ) -> Self {
        Task {
            id: new_id(),
            title: title.into(),
            description: String::new(),
            important,
            urgent,
            due_at: None,
            impact: String::new(),
            next_action: String::new(),
            planned_date: None,
            delegate_to: String::new(),
            delete_reason: String::new(),
            effort_estimate: String::new(),
            status: TaskStatus::Pending,
            created_at: now,
        }
    }

    /// Repair fields that older or hand-edited files leave unset.
    /// A zero-valued creation time (year 1 or earlier) becomes `now` and a
    /// missing id is replaced with a fresh one.
    pub fn normalize(&mut self, now: DateTime<Local>) {
        if self.id.is_empty() {
            self.id = new_id();
        }
        if self.created_at.year() <= 1 {
            self.created_at = now;
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 0001-01-01T00:00:00Z, the zero time older files write
const ZERO_TIMESTAMP: i64 = -62_135_596_800;

/// Creation time for records that have none; `normalize` replaces it
fn unset_time() -> DateTime<Local> {
    DateTime::from_timestamp(ZERO_TIMESTAMP, 0)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .with_timezone(&Local)
}

fn nullable_time<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Local>, D::Error> {
    Ok(Option::<DateTime<Local>>::deserialize(d)?.unwrap_or_else(unset_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn status_decodes_unknown_as_pending() {
        let json = r#"{"id":"a","title":"t","status":"bogus","created_at":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        let json = r#"{"id":"a","title":"t","status":"","created_at":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn status_serializes_lowercase() {
        let mut task = Task::new("x", true, false, now());
        task.status = TaskStatus::Deferred;
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains(r#""status":"deferred""#));
    }

    #[test]
    fn empty_optionals_are_omitted() {
        let task = Task::new("x", true, false, now());
        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("due_at"));
        assert!(!json.contains("impact"));
        assert!(json.contains(r#""description":"""#));
    }

    #[test]
    fn zero_created_at_normalizes_to_now() {
        let json = r#"{"id":"a","title":"t","status":"done","created_at":"0001-01-01T00:00:00Z"}"#;
        let mut task: Task = serde_json::from_str(json).unwrap();
        task.normalize(now());
        assert_eq!(task.created_at, now());
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn null_and_missing_fields_decode_as_unset() {
        let json = r#"{"status":null,"created_at":null}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.id.is_empty());
        assert!(task.title.is_empty());
        assert!(task.created_at.year() <= 1);

        let task: Task = serde_json::from_str("{}").unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.created_at.year() <= 1);
    }

    #[test]
    fn normalize_fills_missing_id_and_time() {
        let mut task: Task = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        task.normalize(now());
        assert_eq!(task.created_at, now());
        assert_eq!(task.id.len(), 32);
    }

    #[test]
    fn status_cycle_wraps() {
        assert_eq!(TaskStatus::Pending.next(), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.next(), TaskStatus::Deferred);
        assert_eq!(TaskStatus::Deferred.next(), TaskStatus::Pending);
    }

    #[test]
    fn new_ids_are_unique() {
        let a = Task::new("a", false, false, now());
        let b = Task::new("b", false, false, now());
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }
}
