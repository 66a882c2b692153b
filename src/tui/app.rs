use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::io::store::{FileStore, StoreError, TaskStore, encode_tasks};
use crate::model::config::UiConfig;
use crate::model::task::Task;
use crate::ops::quadrant::{Quadrant, indices_in};
use crate::ops::task_ops::promote_urgent;

use super::form::FormState;
use super::help;
use super::input;
use super::render;
use super::theme::Theme;

/// Screen size assumed until the terminal reports one
pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 24;

/// Top-level interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Form,
    Help,
}

/// Input delivered to [`update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Side effect requested by [`update`], executed by the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    /// Write the whole task list to the store
    Persist,
    Quit,
}

/// Main application state
#[derive(Debug, Clone)]
pub struct App {
    pub tasks: Vec<Task>,
    pub mode: Mode,
    /// Mode to return to when Help closes
    pub prev_mode: Option<Mode>,
    /// Selected quadrant, index in board order
    pub quadrant: usize,
    /// Row within the selected quadrant's tasks
    pub selected: usize,
    pub form: Option<FormState>,
    pub help_offset: usize,
    /// Error shown in the footer until the next List key
    pub status: Option<String>,
    /// Terminal size; 0 until the first resize
    pub width: usize,
    pub height: usize,
    pub config: UiConfig,
    pub theme: Theme,
    pub last_saved: Option<DateTime<Local>>,
    pub should_quit: bool,
}

impl App {
    pub fn new(tasks: Vec<Task>, config: UiConfig) -> Self {
        App {
            tasks,
            mode: Mode::List,
            prev_mode: None,
            quadrant: 0,
            selected: 0,
            form: None,
            help_offset: 0,
            status: None,
            width: 0,
            height: 0,
            config,
            theme: Theme::default(),
            last_saved: None,
            should_quit: false,
        }
    }

    /// Effective (width, height); falls back to 80x24 before the first resize
    pub fn screen_size(&self) -> (usize, usize) {
        if self.width == 0 || self.height == 0 {
            (DEFAULT_WIDTH, DEFAULT_HEIGHT)
        } else {
            (self.width, self.height)
        }
    }

    pub fn current_quadrant(&self) -> Quadrant {
        Quadrant::from_index(self.quadrant)
    }

    /// Indices into `tasks` shown in the selected quadrant
    pub fn visible_indices(&self) -> Vec<usize> {
        indices_in(&self.tasks, self.current_quadrant())
    }

    /// Index into `tasks` of the highlighted row, if the quadrant has any
    pub fn selected_index(&self) -> Option<usize> {
        self.visible_indices().get(self.selected).copied()
    }

    /// Keep `selected` inside the current quadrant's rows
    pub fn clamp_selection(&mut self) {
        let len = self.visible_indices().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(text.into());
    }

    pub fn clamp_help_offset(&mut self) {
        let (w, h) = self.screen_size();
        self.help_offset = help::clamp_offset(self.help_offset, w, h);
    }
}

/// Process one event: promote urgency, then dispatch by mode.
///
/// The returned [`Command`] tells the caller whether the list must be saved.
pub fn update(mut app: App, event: AppEvent, now: DateTime<Local>) -> (App, Command) {
    promote_urgent(&mut app.tasks, now);
    app.clamp_selection();

    let command = match event {
        AppEvent::Resize(w, h) => {
            app.width = usize::from(w);
            app.height = usize::from(h);
            if app.mode == Mode::Help {
                app.clamp_help_offset();
            }
            Command::None
        }
        AppEvent::Key(key) => input::handle_key(&mut app, key, now),
    };
    if command == Command::Quit {
        app.should_quit = true;
    }
    (app, command)
}

/// Save the task list, reporting failures through the status line.
///
/// When `log_dir` is set, the data that could not be written is kept in the
/// recovery log there.
pub fn persist(app: &mut App, store: &dyn TaskStore, log_dir: Option<&Path>, now: DateTime<Local>) {
    let data = match encode_tasks(&app.tasks) {
        Ok(data) => data,
        Err(e) => {
            app.set_error("Failed to encode tasks");
            if let Some(dir) = log_dir {
                log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Write, "encode failed")
                        .field("error", e.to_string()),
                );
            }
            return;
        }
    };
    match store.save(&data) {
        Ok(()) => app.last_saved = Some(now),
        Err(e) => {
            app.set_error("Failed to save tasks");
            if let Some(dir) = log_dir {
                let mut entry = RecoveryEntry::new(RecoveryCategory::Write, "save failed")
                    .field("error", e.to_string())
                    .body(String::from_utf8_lossy(&data));
                if let StoreError::Write { path, .. } = &e {
                    entry = entry.field("path", path.display().to_string());
                }
                log_recovery(dir, entry);
            }
        }
    }
}

/// Everything the board needs from startup
pub struct Session {
    pub tasks: Vec<Task>,
    pub config: UiConfig,
    pub data_dir: PathBuf,
    pub store: FileStore,
    /// One-time warning shown in the footer
    pub warning: Option<String>,
}

/// Take over the terminal and run the board until the user quits
pub fn run(session: Session) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(session.tasks, session.config);
    if let Some(warning) = session.warning {
        app.set_error(warning);
    }
    let (w, h) = crossterm::terminal::size()?;
    app.width = usize::from(w);
    app.height = usize::from(h);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, app, &session.store, &session.data_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    store: &dyn TaskStore,
    data_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, &app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let event = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Event::Resize(w, h) => AppEvent::Resize(w, h),
            _ => continue,
        };

        let now = Local::now();
        let (next, command) = update(app, event, now);
        app = next;
        match command {
            Command::None => {}
            Command::Persist => persist(&mut app, store, Some(data_dir), now),
            Command::Quit => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn default_screen_size() {
        let mut app = App::new(Vec::new(), UiConfig::default());
        assert_eq!(app.screen_size(), (80, 24));
        app.width = 100;
        assert_eq!(app.screen_size(), (80, 24));
        app.height = 30;
        assert_eq!(app.screen_size(), (100, 30));
    }

    #[test]
    fn resize_records_size() {
        let app = App::new(Vec::new(), UiConfig::default());
        let (app, cmd) = update(app, AppEvent::Resize(120, 40), now());
        assert_eq!(cmd, Command::None);
        assert_eq!(app.screen_size(), (120, 40));
    }

    #[test]
    fn selection_clamps_to_quadrant() {
        let tasks = vec![
            Task::new("a", true, true, now()),
            Task::new("b", true, true, now()),
        ];
        let mut app = App::new(tasks, UiConfig::default());
        app.selected = 7;
        app.clamp_selection();
        assert_eq!(app.selected, 1);
        app.quadrant = 3;
        app.clamp_selection();
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_index(), None);
    }

    #[test]
    fn update_promotes_due_tasks() {
        let mut task = Task::new("soon", true, false, now());
        task.due_at = Some(now() + chrono::TimeDelta::hours(1));
        let app = App::new(vec![task], UiConfig::default());
        let (app, _) = update(app, AppEvent::Resize(80, 24), now());
        assert!(app.tasks[0].urgent);
    }
}
