//! Application state and update logic.
//!
//! [`App`] owns the row list, the chart settings, the rendered chart and
//! the on-disk store. Key events arrive as [`Action`]s from the event
//! pump; [`App::handle_action`] routes them by mode and mutates state.
//! Rendering reads the state back out in `screens`.

use std::path::{Path, PathBuf};

use gantty_core::{
    parse_document, push_update, serialize_document, ChartSettings, DataStore, FileStore,
    MonthYear, RowField, RowStore, StorageError, PALETTES,
};

use crate::event::Action;
use crate::ui::widgets::{RangeBarChart, TextInputState};

/// How many ticks a notification stays visible (~3s at the 250ms tick rate).
const NOTICE_TICKS: usize = 12;

/// Date inserted by the month stepper when the cell holds no parseable date.
const STEP_FALLBACK_DATE: &str = "01.2024";

/// Which screen owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The row form next to the chart pane.
    Form,
    /// The chart settings panel.
    Settings,
    /// Prompt for a file path to import.
    ImportPrompt,
    /// Prompt for a file path to export.
    ExportPrompt,
    /// "Really clear everything?" confirmation.
    ConfirmClear,
    /// "Quit with unsaved changes?" confirmation.
    ConfirmQuit,
}

/// Focusable fields on the settings panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Title,
    Height,
    Width,
    Palette,
    Labels,
}

impl SettingsField {
    pub const ALL: [SettingsField; 5] = [
        SettingsField::Title,
        SettingsField::Height,
        SettingsField::Width,
        SettingsField::Palette,
        SettingsField::Labels,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Title => "Title",
            SettingsField::Height => "Height (px)",
            SettingsField::Width => "Width (px)",
            SettingsField::Palette => "Palette",
            SettingsField::Labels => "Bar labels",
        }
    }

    /// True for fields edited as free text rather than cycled or toggled.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            SettingsField::Title | SettingsField::Height | SettingsField::Width
        )
    }
}

/// A transient status-bar message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub error: bool,
}

/// Top-level application state.
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub mode: Mode,
    pub rows: RowStore,
    pub settings: ChartSettings,
    pub chart: RangeBarChart,
    pub store: DataStore<FileStore>,
    /// Focused row index in the form grid.
    pub row_focus: usize,
    /// Focused column in the form grid.
    pub field_focus: RowField,
    pub settings_focus: SettingsField,
    /// True while a cell, settings field or prompt is being typed into.
    pub editing: bool,
    pub input: TextInputState,
    /// Unsaved changes since the last save, reload or clear.
    pub dirty: bool,
    pub tick: usize,
    pub notice: Option<Notice>,
    notice_ttl: usize,
    /// Import path handed to the runtime on the next loop iteration.
    pub pending_import: Option<PathBuf>,
    pub import_in_progress: bool,
}

impl App {
    /// Load persisted state from `data_dir` and build the initial chart.
    ///
    /// Unreadable stored data falls back to defaults with a notice rather
    /// than refusing to start.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = DataStore::new(FileStore::new(data_dir)?);

        let mut startup_notice = None;
        let settings = match store.load_settings() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("stored settings unreadable, using defaults: {err}");
                startup_notice = Some(format!("Stored settings unreadable: {err}"));
                ChartSettings::default()
            }
        };

        let mut rows = RowStore::new();
        match store.load_rows() {
            Ok(Some(stored)) => rows.replace_all(stored),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("stored rows unreadable, starting blank: {err}");
                startup_notice = Some(format!("Stored rows unreadable: {err}"));
            }
        }

        let mut chart = RangeBarChart::new();
        push_update(&mut chart, rows.rows(), &settings);

        let mut app = Self {
            should_quit: false,
            show_help: false,
            mode: Mode::Form,
            rows,
            settings,
            chart,
            store,
            row_focus: 0,
            field_focus: RowField::Name,
            settings_focus: SettingsField::Title,
            editing: false,
            input: TextInputState::new(),
            dirty: false,
            tick: 0,
            notice: None,
            notice_ttl: 0,
            pending_import: None,
            import_in_progress: false,
        };
        if let Some(text) = startup_notice {
            app.notify_error(text);
        }
        Ok(app)
    }

    /// Route an action to the active mode. Quit and help are handled
    /// globally; while the help overlay is open any other key closes it.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else if self.mode == Mode::ConfirmQuit || !self.dirty {
                    self.should_quit = true;
                } else {
                    self.mode = Mode::ConfirmQuit;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            Action::None => return,
            _ => {}
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        match self.mode {
            Mode::Form => self.handle_form_action(action),
            Mode::Settings => self.handle_settings_action(action),
            Mode::ImportPrompt | Mode::ExportPrompt => {
                if action == Action::Back {
                    self.cancel_prompt();
                }
            }
            Mode::ConfirmClear => match action {
                Action::Select => {
                    self.mode = Mode::Form;
                    self.clear_all();
                }
                Action::Back => self.mode = Mode::Form,
                _ => {}
            },
            Mode::ConfirmQuit => match action {
                Action::Select => self.should_quit = true,
                Action::Back => self.mode = Mode::Form,
                _ => {}
            },
        }
    }

    fn handle_form_action(&mut self, action: Action) {
        match action {
            Action::AddRow => {
                self.rows.add_row();
                self.row_focus = self.rows.len() - 1;
                self.field_focus = RowField::Name;
                self.dirty = true;
            }
            Action::RemoveRow => {
                if self.rows.len() > 1 {
                    self.rows.remove_last();
                    self.clamp_focus();
                    self.dirty = true;
                } else {
                    self.notify_error("The form keeps at least one row");
                }
            }
            Action::ClearAll => self.mode = Mode::ConfirmClear,
            Action::Generate => self.generate(),
            Action::Save => self.save(),
            Action::Reload => self.reload(),
            Action::Import => {
                if self.import_in_progress {
                    self.notify_error("An import is already running");
                } else {
                    self.input.clear();
                    self.mode = Mode::ImportPrompt;
                }
            }
            Action::Export => {
                self.input.clear();
                self.mode = Mode::ExportPrompt;
            }
            Action::Settings => self.mode = Mode::Settings,
            Action::Select => self.begin_edit(),
            Action::Back => {
                if self.dirty {
                    self.mode = Mode::ConfirmQuit;
                } else {
                    self.should_quit = true;
                }
            }
            Action::Up => self.row_focus = self.row_focus.saturating_sub(1),
            Action::Down => {
                if self.row_focus + 1 < self.rows.len() {
                    self.row_focus += 1;
                }
            }
            Action::Left => {
                let i = field_index(self.field_focus);
                if i > 0 {
                    self.field_focus = RowField::ALL[i - 1];
                }
            }
            Action::Right => {
                let i = field_index(self.field_focus);
                if i + 1 < RowField::ALL.len() {
                    self.field_focus = RowField::ALL[i + 1];
                }
            }
            Action::NextField => self.focus_next_field(),
            Action::PrevField => self.focus_prev_field(),
            Action::StepForward => self.step_month(true),
            Action::StepBack => self.step_month(false),
            Action::Quit | Action::Help | Action::None => {}
        }
    }

    fn handle_settings_action(&mut self, action: Action) {
        let focus = settings_index(self.settings_focus);
        match action {
            Action::Back | Action::Settings => self.mode = Mode::Form,
            Action::Up | Action::PrevField => {
                if focus > 0 {
                    self.settings_focus = SettingsField::ALL[focus - 1];
                }
            }
            Action::Down | Action::NextField => {
                if focus + 1 < SettingsField::ALL.len() {
                    self.settings_focus = SettingsField::ALL[focus + 1];
                }
            }
            Action::Select => match self.settings_focus {
                SettingsField::Palette => self.cycle_palette(true),
                SettingsField::Labels => self.toggle_labels(),
                _ => self.begin_edit(),
            },
            Action::Left | Action::StepBack => match self.settings_focus {
                SettingsField::Palette => self.cycle_palette(false),
                SettingsField::Labels => self.toggle_labels(),
                _ => {}
            },
            Action::Right | Action::StepForward => match self.settings_focus {
                SettingsField::Palette => self.cycle_palette(true),
                SettingsField::Labels => self.toggle_labels(),
                _ => {}
            },
            Action::Generate => self.generate(),
            Action::Save => self.save(),
            _ => {}
        }
    }

    /// Open the focused cell or settings field for editing.
    pub fn begin_edit(&mut self) {
        let value = match self.mode {
            Mode::Form => self.rows.field(self.row_focus, self.field_focus).to_string(),
            Mode::Settings => match self.settings_focus {
                SettingsField::Title => self.settings.title.clone(),
                SettingsField::Height => self.settings.height.clone(),
                SettingsField::Width => self.settings.width.clone(),
                SettingsField::Palette | SettingsField::Labels => return,
            },
            _ => return,
        };
        self.input.set(value);
        self.editing = true;
    }

    /// Write the edit buffer back to the focused field.
    pub fn commit_edit(&mut self) {
        let value = self.input.take();
        self.editing = false;
        match self.mode {
            Mode::Form => self.commit_cell(value),
            Mode::Settings => self.commit_setting(value),
            _ => {}
        }
    }

    pub fn cancel_edit(&mut self) {
        self.input.clear();
        self.editing = false;
    }

    fn commit_cell(&mut self, value: String) {
        let mut value = value;
        if self.field_focus.is_date() && !value.is_empty() {
            match MonthYear::parse(&value) {
                Ok(month) => value = month.to_string(),
                Err(_) => self.notify_error(format!(
                    "Row {}: correct date format is MM.YYYY",
                    self.row_focus + 1
                )),
            }
        }
        self.rows.set_field(self.row_focus, self.field_focus, value);
        self.dirty = true;
    }

    /// Settings edits go through [`ChartSettings::validate`]; an invalid
    /// value is rejected and the field keeps its previous content.
    fn commit_setting(&mut self, value: String) {
        let mut candidate = self.settings.clone();
        match self.settings_focus {
            SettingsField::Title => candidate.title = value,
            SettingsField::Height => candidate.height = value,
            SettingsField::Width => candidate.width = value,
            SettingsField::Palette | SettingsField::Labels => return,
        }
        match candidate.validate() {
            Ok(()) => {
                self.settings = candidate;
                self.dirty = true;
            }
            Err(err) => self.notify_error(err.to_string()),
        }
    }

    fn cycle_palette(&mut self, forward: bool) {
        let len = PALETTES.len();
        let current = PALETTES
            .iter()
            .position(|p| *p == self.settings.palette)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.settings.palette = PALETTES[next].to_string();
        self.dirty = true;
    }

    fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
        self.dirty = true;
    }

    /// Step the focused date cell one month forward or back. A cell
    /// without a parseable date gets a fixed starting date instead.
    pub fn step_month(&mut self, forward: bool) {
        if self.mode != Mode::Form || !self.field_focus.is_date() {
            return;
        }
        let current = self.rows.field(self.row_focus, self.field_focus).to_string();
        let value = match MonthYear::parse(&current) {
            Ok(month) => {
                if forward {
                    month.next().to_string()
                } else {
                    month.prev().to_string()
                }
            }
            Err(_) => STEP_FALLBACK_DATE.to_string(),
        };
        self.rows.set_field(self.row_focus, self.field_focus, value);
        self.dirty = true;
    }

    /// Validate the form and settings, then rebuild the chart from them.
    /// Generating does not persist anything.
    pub fn generate(&mut self) {
        if let Some(problem) = self.first_invalid_date() {
            self.notify_error(problem);
            return;
        }
        if let Err(err) = self.settings.validate() {
            self.notify_error(err.to_string());
            return;
        }
        push_update(&mut self.chart, self.rows.rows(), &self.settings);
        self.notify("Chart updated");
    }

    fn first_invalid_date(&self) -> Option<String> {
        for (i, row) in self.rows.rows().iter().enumerate() {
            for (value, which) in [(&row.start_time, "start"), (&row.end_time, "end")] {
                if !value.is_empty() && MonthYear::parse(value).is_err() {
                    return Some(format!(
                        "Row {}: {which} date must be MM.YYYY, got: {value}",
                        i + 1
                    ));
                }
            }
        }
        None
    }

    /// Persist rows and settings together.
    pub fn save(&mut self) {
        let result = self
            .store
            .save_rows(self.rows.rows())
            .and_then(|()| self.store.save_settings(&self.settings));
        match result {
            Ok(()) => {
                self.dirty = false;
                self.notify("Data saved");
            }
            Err(err) => self.notify_error(format!("Save failed: {err}")),
        }
    }

    /// Discard in-memory state in favor of whatever the store holds.
    pub fn reload(&mut self) {
        let settings = match self.store.load_settings() {
            Ok(settings) => settings,
            Err(err) => {
                self.notify_error(format!("Reload failed: {err}"));
                return;
            }
        };
        match self.store.load_rows() {
            Ok(Some(stored)) => self.rows.replace_all(stored),
            Ok(None) => self.rows.clear(),
            Err(err) => {
                self.notify_error(format!("Reload failed: {err}"));
                return;
            }
        }
        self.settings = settings;
        self.clamp_focus();
        self.dirty = false;
        push_update(&mut self.chart, self.rows.rows(), &self.settings);
        self.notify("Reloaded stored data");
    }

    /// Reset rows, settings, chart and the store to their initial state.
    pub fn clear_all(&mut self) {
        self.rows.clear();
        self.settings = ChartSettings::default();
        self.chart = RangeBarChart::new();
        self.row_focus = 0;
        self.field_focus = RowField::Name;
        self.dirty = false;
        match self.store.clear_all() {
            Ok(()) => self.notify("All data cleared"),
            Err(err) => self.notify_error(format!("Stored data not fully cleared: {err}")),
        }
    }

    /// Accept the path typed into the import or export prompt.
    pub fn confirm_prompt(&mut self) {
        let text = self.input.take();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.mode = Mode::Form;
            self.notify_error("A file path is required");
            return;
        }
        let path = PathBuf::from(trimmed);
        match self.mode {
            Mode::ImportPrompt => {
                self.pending_import = Some(path);
                self.import_in_progress = true;
            }
            Mode::ExportPrompt => self.export_to(&path),
            _ => {}
        }
        self.mode = Mode::Form;
    }

    pub fn cancel_prompt(&mut self) {
        self.input.clear();
        self.mode = Mode::Form;
    }

    /// Take the requested import path, if any. The run loop polls this
    /// after every action and spawns the file read on the runtime.
    pub fn take_pending_import(&mut self) -> Option<PathBuf> {
        self.pending_import.take()
    }

    /// Apply the result of an import file read.
    pub fn finish_import(&mut self, path: &Path, result: std::io::Result<String>) {
        self.import_in_progress = false;
        let text = match result {
            Ok(text) => text,
            Err(err) => {
                self.notify_error(format!("Import failed: {err}"));
                return;
            }
        };
        match parse_document(&text) {
            Ok(doc) => {
                doc.apply_to_settings(&mut self.settings);
                let count = doc.rows.len();
                self.rows.replace_all(doc.rows);
                self.clamp_focus();
                self.dirty = true;
                self.notify(format!("Imported {count} rows from {}", path.display()));
            }
            Err(err) => self.notify_error(err.to_string()),
        }
    }

    fn export_to(&mut self, path: &Path) {
        // Refuse to write a file that could not be imported back.
        if let Some(problem) = self.first_invalid_date() {
            self.notify_error(problem);
            return;
        }
        match serialize_document(&self.settings, self.rows.rows()) {
            Ok(text) => match std::fs::write(path, text) {
                Ok(()) => self.notify(format!("Exported to {}", path.display())),
                Err(err) => self.notify_error(format!("Export failed: {err}")),
            },
            Err(err) => self.notify_error(err.to_string()),
        }
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            error: false,
        });
        self.notice_ttl = NOTICE_TICKS;
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            error: true,
        });
        self.notice_ttl = NOTICE_TICKS;
    }

    /// Advance the tick counter and expire the notification.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.notice.is_some() {
            self.notice_ttl = self.notice_ttl.saturating_sub(1);
            if self.notice_ttl == 0 {
                self.notice = None;
            }
        }
    }

    /// Move focus one field right, wrapping to the next row (and from
    /// the last cell of the last row back to the first).
    pub fn focus_next_field(&mut self) {
        let i = field_index(self.field_focus);
        if i + 1 < RowField::ALL.len() {
            self.field_focus = RowField::ALL[i + 1];
        } else {
            self.field_focus = RowField::Name;
            self.row_focus = (self.row_focus + 1) % self.rows.len();
        }
    }

    /// Move focus one field left, wrapping to the previous row.
    pub fn focus_prev_field(&mut self) {
        let i = field_index(self.field_focus);
        if i > 0 {
            self.field_focus = RowField::ALL[i - 1];
        } else {
            self.field_focus = RowField::EndTime;
            self.row_focus = if self.row_focus == 0 {
                self.rows.len() - 1
            } else {
                self.row_focus - 1
            };
        }
    }

    fn clamp_focus(&mut self) {
        if self.row_focus >= self.rows.len() {
            self.row_focus = self.rows.len() - 1;
        }
    }
}

fn field_index(field: RowField) -> usize {
    RowField::ALL.iter().position(|f| *f == field).unwrap_or(0)
}

fn settings_index(field: SettingsField) -> usize {
    SettingsField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or(0)
}
