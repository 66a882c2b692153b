//! Add/Edit form: the active field set, focus, text entry and date pickers.

use chrono::{DateTime, Local, Months, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::{Task, TaskStatus};
use crate::ops::task_ops::find_by_id_mut;
use crate::util::unicode;

/// Maximum graphemes in a text field
pub const TEXT_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit,
}

/// Every field the form can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Status,
    Title,
    Important,
    Urgent,
    Due,
    Impact,
    NextAction,
    Planned,
    Effort,
    Delegate,
    DeleteReason,
}

/// Which text buffer a text field edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    Title,
    Impact,
    NextAction,
    Effort,
    Delegate,
    DeleteReason,
}

/// Which boolean a toggle field flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Important,
    Urgent,
}

/// Which date picker a date field drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSlot {
    Due,
    Planned,
}

/// How a field behaves under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Status,
    Text(TextSlot),
    Toggle(Flag),
    Date(DateSlot),
}

impl FormField {
    pub fn kind(self) -> FieldKind {
        match self {
            FormField::Status => FieldKind::Status,
            FormField::Title => FieldKind::Text(TextSlot::Title),
            FormField::Important => FieldKind::Toggle(Flag::Important),
            FormField::Urgent => FieldKind::Toggle(Flag::Urgent),
            FormField::Due => FieldKind::Date(DateSlot::Due),
            FormField::Impact => FieldKind::Text(TextSlot::Impact),
            FormField::NextAction => FieldKind::Text(TextSlot::NextAction),
            FormField::Planned => FieldKind::Date(DateSlot::Planned),
            FormField::Effort => FieldKind::Text(TextSlot::Effort),
            FormField::Delegate => FieldKind::Text(TextSlot::Delegate),
            FormField::DeleteReason => FieldKind::Text(TextSlot::DeleteReason),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Status => "Status",
            FormField::Title => "Title",
            FormField::Important => "Important",
            FormField::Urgent => "Urgent",
            FormField::Due => "Due/SLA",
            FormField::Impact => "Impact",
            FormField::NextAction => "Next Action",
            FormField::Planned => "Planned Date",
            FormField::Effort => "Effort",
            FormField::Delegate => "Delegate To",
            FormField::DeleteReason => "Delete Reason",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self.kind(), FieldKind::Text(_))
    }
}

const DO_NOW_FIELDS: [FormField; 7] = [
    FormField::Status,
    FormField::Title,
    FormField::Important,
    FormField::Urgent,
    FormField::Due,
    FormField::Impact,
    FormField::NextAction,
];

const PLAN_FIELDS: [FormField; 6] = [
    FormField::Status,
    FormField::Title,
    FormField::Important,
    FormField::Urgent,
    FormField::Planned,
    FormField::Effort,
];

const DELEGATE_FIELDS: [FormField; 6] = [
    FormField::Status,
    FormField::Title,
    FormField::Important,
    FormField::Urgent,
    FormField::Due,
    FormField::Delegate,
];

const ELIMINATE_FIELDS: [FormField; 4] = [
    FormField::Title,
    FormField::Important,
    FormField::Urgent,
    FormField::DeleteReason,
];

/// The ordered fields shown for an (important, urgent) combination
pub fn active_fields(important: bool, urgent: bool) -> &'static [FormField] {
    match (important, urgent) {
        (true, true) => &DO_NOW_FIELDS,
        (true, false) => &PLAN_FIELDS,
        (false, true) => &DELEGATE_FIELDS,
        (false, false) => &ELIMINATE_FIELDS,
    }
}

/// Validation failures that keep the form open
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Date out of range")]
    DateOutOfRange,
    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(String),
}

// ---------------------------------------------------------------------------
// Text input
// ---------------------------------------------------------------------------

/// Single-line text buffer with a grapheme-aware cursor (byte offset)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new(value: &str) -> Self {
        TextInput {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn trimmed(&self) -> String {
        self.value.trim().to_string()
    }

    /// Apply an editing key. Returns false for keys the input does not use.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.value.len(),
            KeyCode::Char('u') if ctrl => {
                self.value.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char('w') if ctrl => {
                let start = unicode::word_boundary_left(&self.value, self.cursor);
                self.value.drain(start..self.cursor);
                self.cursor = start;
            }
            KeyCode::Char(c) if !ctrl => self.insert(c),
            KeyCode::Backspace => {
                if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
                    self.value.drain(prev..self.cursor);
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
                    self.value.drain(self.cursor..next);
                }
            }
            KeyCode::Left if ctrl => {
                self.cursor = unicode::word_boundary_left(&self.value, self.cursor);
            }
            KeyCode::Right if ctrl => {
                self.cursor = unicode::word_boundary_right(&self.value, self.cursor);
            }
            KeyCode::Left => {
                if let Some(prev) = unicode::prev_grapheme_boundary(&self.value, self.cursor) {
                    self.cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(next) = unicode::next_grapheme_boundary(&self.value, self.cursor) {
                    self.cursor = next;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => return false,
        }
        true
    }

    fn insert(&mut self, c: char) {
        if c.is_control() || unicode::grapheme_count(&self.value) >= TEXT_LIMIT {
            return;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }
}

// ---------------------------------------------------------------------------
// Date picker
// ---------------------------------------------------------------------------

/// The date/time part a picker adjusts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateSegment {
    #[default]
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

impl DateSegment {
    const ORDER: [DateSegment; 5] = [
        DateSegment::Year,
        DateSegment::Month,
        DateSegment::Day,
        DateSegment::Hour,
        DateSegment::Minute,
    ];

    pub fn index(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % 5]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + 4) % 5]
    }
}

/// Result of offering a key to a date picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Ignored,
    Handled,
    Rejected(FormError),
}

/// Date/time picker. The timestamp is local wall-clock time at minute precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    pub enabled: bool,
    pub at: NaiveDateTime,
    pub segment: DateSegment,
}

/// Drop seconds and below
pub fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

impl DatePicker {
    /// Seeded from an existing timestamp, or disabled at the current minute
    pub fn new(value: Option<DateTime<Local>>, now: DateTime<Local>) -> Self {
        DatePicker {
            enabled: value.is_some(),
            at: truncate_to_minute(value.unwrap_or(now).naive_local()),
            segment: DateSegment::Year,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Local>) -> PickerOutcome {
        match key.code {
            KeyCode::Char('x') => self.enabled = false,
            KeyCode::Char('t') => {
                self.enabled = true;
                self.at = truncate_to_minute(now.naive_local());
            }
            KeyCode::Left | KeyCode::Char('h') => self.segment = self.segment.prev(),
            KeyCode::Right | KeyCode::Char('l') => self.segment = self.segment.next(),
            KeyCode::Char('+') | KeyCode::Char('=') => return self.step(1),
            KeyCode::Char('-') => return self.step(-1),
            _ => return PickerOutcome::Ignored,
        }
        PickerOutcome::Handled
    }

    fn step(&mut self, delta: i32) -> PickerOutcome {
        self.enabled = true;
        match self.adjust(delta) {
            Ok(()) => PickerOutcome::Handled,
            Err(e) => PickerOutcome::Rejected(e),
        }
    }

    /// Move the highlighted segment by `delta` using calendar arithmetic.
    /// Months and years clamp to the last day of a shorter month.
    pub fn adjust(&mut self, delta: i32) -> Result<(), FormError> {
        let months = |n: u32| {
            if delta >= 0 {
                self.at.checked_add_months(Months::new(n))
            } else {
                self.at.checked_sub_months(Months::new(n))
            }
        };
        let steps = delta.unsigned_abs();
        let moved = match self.segment {
            DateSegment::Year => steps.checked_mul(12).and_then(months),
            DateSegment::Month => months(steps),
            DateSegment::Day => self.at.checked_add_signed(TimeDelta::days(i64::from(delta))),
            DateSegment::Hour => self.at.checked_add_signed(TimeDelta::hours(i64::from(delta))),
            DateSegment::Minute => self
                .at
                .checked_add_signed(TimeDelta::minutes(i64::from(delta))),
        };
        self.at = moved.ok_or(FormError::DateOutOfRange)?;
        Ok(())
    }

    /// The picked time, or None when disabled
    pub fn value(&self) -> Result<Option<DateTime<Local>>, FormError> {
        if !self.enabled {
            return Ok(None);
        }
        Local
            .from_local_datetime(&self.at)
            .earliest()
            .map(Some)
            .ok_or_else(|| {
                FormError::NonexistentLocalTime(self.at.format("%Y-%m-%d %H:%M").to_string())
            })
    }

    /// Display parts: year, month, day, hour, minute
    pub fn parts(&self) -> [String; 5] {
        [
            self.at.format("%Y").to_string(),
            self.at.format("%m").to_string(),
            self.at.format("%d").to_string(),
            self.at.format("%H").to_string(),
            self.at.format("%M").to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Whether keys move between fields or edit the focused text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Navigating,
    Editing,
}

/// What the controller should do after a form key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Stay,
    Cancel,
    Submit,
    Invalid(FormError),
}

/// Working copy of a task while the form is open
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub kind: FormKind,
    /// Id of the task being edited; empty for Add
    pub edit_id: String,
    pub important: bool,
    pub urgent: bool,
    pub status: TaskStatus,
    pub title: TextInput,
    pub impact: TextInput,
    pub next_action: TextInput,
    pub effort: TextInput,
    pub delegate: TextInput,
    pub delete_reason: TextInput,
    pub due: DatePicker,
    pub planned: DatePicker,
    pub focus: usize,
    pub phase: FormPhase,
}

impl FormState {
    /// Blank Add form. New tasks start important and urgent.
    pub fn for_add(now: DateTime<Local>) -> Self {
        let mut form = FormState::seeded(FormKind::Add, &blank_task(now), now);
        form.important = true;
        form.urgent = true;
        form.status = TaskStatus::Pending;
        form.focus_field(FormField::Title);
        form
    }

    /// Edit form seeded from every field of `task`
    pub fn for_edit(task: &Task, now: DateTime<Local>) -> Self {
        let mut form = FormState::seeded(FormKind::Edit, task, now);
        form.focus_field(FormField::Title);
        form
    }

    fn seeded(kind: FormKind, task: &Task, now: DateTime<Local>) -> Self {
        FormState {
            kind,
            edit_id: task.id.clone(),
            important: task.important,
            urgent: task.urgent,
            status: task.status,
            title: TextInput::new(&task.title),
            impact: TextInput::new(&task.impact),
            next_action: TextInput::new(&task.next_action),
            effort: TextInput::new(&task.effort_estimate),
            delegate: TextInput::new(&task.delegate_to),
            delete_reason: TextInput::new(&task.delete_reason),
            due: DatePicker::new(task.due_at, now),
            planned: DatePicker::new(task.planned_date, now),
            focus: 0,
            phase: FormPhase::Navigating,
        }
    }

    pub fn fields(&self) -> &'static [FormField] {
        active_fields(self.important, self.urgent)
    }

    /// The focused field; an out-of-range focus reads as the first field
    pub fn current_field(&self) -> FormField {
        let fields = self.fields();
        fields.get(self.focus).copied().unwrap_or(fields[0])
    }

    fn focus_field(&mut self, field: FormField) {
        self.focus = self.fields().iter().position(|f| *f == field).unwrap_or(0);
    }

    pub fn text(&self, slot: TextSlot) -> &TextInput {
        match slot {
            TextSlot::Title => &self.title,
            TextSlot::Impact => &self.impact,
            TextSlot::NextAction => &self.next_action,
            TextSlot::Effort => &self.effort,
            TextSlot::Delegate => &self.delegate,
            TextSlot::DeleteReason => &self.delete_reason,
        }
    }

    fn text_mut(&mut self, slot: TextSlot) -> &mut TextInput {
        match slot {
            TextSlot::Title => &mut self.title,
            TextSlot::Impact => &mut self.impact,
            TextSlot::NextAction => &mut self.next_action,
            TextSlot::Effort => &mut self.effort,
            TextSlot::Delegate => &mut self.delegate,
            TextSlot::DeleteReason => &mut self.delete_reason,
        }
    }

    pub fn picker(&self, slot: DateSlot) -> &DatePicker {
        match slot {
            DateSlot::Due => &self.due,
            DateSlot::Planned => &self.planned,
        }
    }

    fn picker_mut(&mut self, slot: DateSlot) -> &mut DatePicker {
        match slot {
            DateSlot::Due => &mut self.due,
            DateSlot::Planned => &mut self.planned,
        }
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Important => self.important,
            Flag::Urgent => self.urgent,
        }
    }

    /// Flip a flag and re-derive focus against the new field set
    fn toggle(&mut self, flag: Flag) {
        let focused = self.current_field();
        match flag {
            Flag::Important => self.important = !self.important,
            Flag::Urgent => self.urgent = !self.urgent,
        }
        self.focus_field(focused);
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.fields().len();
        let focus = self.focus.min(len - 1);
        self.focus = if forward {
            (focus + 1) % len
        } else {
            (focus + len - 1) % len
        };
    }

    /// Handle one key in either phase
    pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Local>) -> FormOutcome {
        if self.focus >= self.fields().len() {
            self.focus = 0;
        }
        let current = self.current_field();

        if self.phase == FormPhase::Editing {
            if key.code == KeyCode::Esc {
                self.phase = FormPhase::Navigating;
            } else if let FieldKind::Text(slot) = current.kind() {
                self.text_mut(slot).handle_key(key);
            }
            return FormOutcome::Stay;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Char('c') if ctrl => return FormOutcome::Cancel,
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.move_focus(false);
                return FormOutcome::Stay;
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.move_focus(true);
                return FormOutcome::Stay;
            }
            KeyCode::Enter => {
                if self.focus + 1 >= self.fields().len() {
                    return FormOutcome::Submit;
                }
                self.focus += 1;
                return FormOutcome::Stay;
            }
            KeyCode::Char('i') if current.is_text() => {
                self.phase = FormPhase::Editing;
                return FormOutcome::Stay;
            }
            KeyCode::Char(' ') => match current.kind() {
                FieldKind::Toggle(flag) => {
                    self.toggle(flag);
                    return FormOutcome::Stay;
                }
                FieldKind::Status => {
                    self.status = self.status.next();
                    return FormOutcome::Stay;
                }
                _ => {}
            },
            _ => {}
        }

        if let FieldKind::Date(slot) = current.kind()
            && let PickerOutcome::Rejected(e) = self.picker_mut(slot).handle_key(key, now)
        {
            return FormOutcome::Invalid(e);
        }
        FormOutcome::Stay
    }

    /// Validate and write the form into `tasks`: append for Add, update in place for Edit.
    ///
    /// Text fields hidden by the current flag combination are not written:
    /// Add leaves them empty, Edit keeps the stored value. Dates always come
    /// from the pickers.
    pub fn apply(&self, tasks: &mut Vec<Task>, now: DateTime<Local>) -> Result<(), FormError> {
        let title = self.title.trimmed();
        if title.is_empty() {
            return Err(FormError::TitleRequired);
        }
        let due = self.due.value()?;
        let planned = self.planned.value()?;

        let mut task = match self.kind {
            FormKind::Add => Task::new(title.clone(), self.important, self.urgent, now),
            FormKind::Edit => match find_by_id_mut(tasks, &self.edit_id) {
                Ok(existing) => existing.clone(),
                // the task vanished while the form was open; nothing to update
                Err(_) => return Ok(()),
            },
        };

        task.title = title;
        task.important = self.important;
        task.urgent = self.urgent;
        task.due_at = due;
        task.planned_date = planned;
        for field in self.fields() {
            match field.kind() {
                FieldKind::Status => task.status = self.status,
                FieldKind::Text(slot) => {
                    let value = self.text(slot).trimmed();
                    match slot {
                        TextSlot::Title => {}
                        TextSlot::Impact => task.impact = value,
                        TextSlot::NextAction => task.next_action = value,
                        TextSlot::Effort => task.effort_estimate = value,
                        TextSlot::Delegate => task.delegate_to = value,
                        TextSlot::DeleteReason => task.delete_reason = value,
                    }
                }
                FieldKind::Toggle(_) | FieldKind::Date(_) => {}
            }
        }

        match self.kind {
            FormKind::Add => tasks.push(task),
            FormKind::Edit => {
                if let Ok(slot) = find_by_id_mut(tasks, &self.edit_id) {
                    *slot = task;
                }
            }
        }
        Ok(())
    }
}

fn blank_task(now: DateTime<Local>) -> Task {
    Task {
        id: String::new(),
        ..Task::new("", false, false, now)
    }
}
