//! gantty-tui: Terminal UI for the gantty timeline chart builder
//!
//! This crate provides the TUI layer for gantty, including:
//! - The row editor with a live range-bar chart pane
//! - Chart settings (title, size, palette, labels)
//! - File import/export prompts and confirmation dialogs

mod app;
mod event;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

pub use app::{App, Mode};
pub use event::{Action, Event, EventHandler};
pub use gantty_core;

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};

/// Puts the terminal back in cooked mode on drop, error paths included.
struct TerminalRestore;

impl Drop for TerminalRestore {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
    }
}

/// Entry point for the interactive editor.
///
/// Loads persisted state from `data_dir`, takes over the terminal,
/// runs the event loop, and restores the terminal on the way out.
pub async fn run_tui(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Load state before touching the terminal so a storage error prints
    // as a plain message.
    let mut app = App::new(data_dir)?;

    enable_raw_mode()?;
    let _restore = TerminalRestore;

    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    // Ticks every 250ms; notices and the import spinner depend on that
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    // Import file-read task handles
    let mut import_handles: Vec<tokio::task::JoinHandle<(PathBuf, io::Result<String>)>> =
        Vec::new();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screens::draw(app, area, frame.buffer_mut());
        })?;

        // Reap finished import reads without blocking on the rest
        let mut i = 0;
        while i < import_handles.len() {
            if !import_handles[i].is_finished() {
                i += 1;
                continue;
            }
            if let Ok((path, result)) = import_handles.swap_remove(i).await {
                app.finish_import(&path, result);
            }
        }

        // Start a requested import file read
        if let Some(path) = app.take_pending_import() {
            let handle = tokio::spawn(async move {
                let result = tokio::fs::read_to_string(&path).await;
                (path, result)
            });
            import_handles.push(handle);
        }

        // Handle events; a closed pump means the input thread is gone
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                // Text input gets the key first while a cell or
                // prompt is open
                if handle_text_key(app, key) {
                    continue;
                }
                let action = event::key_to_action(key);
                app.handle_action(action);
            }
            Event::Mouse(mouse) => {
                use crossterm::event::MouseEventKind;
                match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        app.handle_action(Action::Up);
                    }
                    MouseEventKind::ScrollDown => {
                        app.handle_action(Action::Down);
                    }
                    _ => {}
                }
            }
            Event::Tick => {
                app.tick();
            }
            Event::Resize(_, _) => {
                // Nothing to do; the next draw picks up the new size
            }
        }

        if app.should_quit {
            // Abort any remaining reads
            for handle in import_handles {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Route a key to whichever text input is open, if any.
/// Returns true if the key was handled (should not become an action).
fn handle_text_key(app: &mut App, key: crossterm::event::KeyEvent) -> bool {
    match app.mode {
        Mode::ImportPrompt | Mode::ExportPrompt => handle_prompt_key(app, key),
        Mode::Form | Mode::Settings if app.editing => handle_edit_key(app, key),
        _ => false,
    }
}

/// Handle key input while a cell or settings field is being edited.
fn handle_edit_key(app: &mut App, key: crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false; // Let the action handler deal with Ctrl+C
    }

    match key.code {
        KeyCode::Enter => {
            app.commit_edit();
            true
        }
        KeyCode::Esc => {
            app.cancel_edit();
            true
        }
        // Commit, then let the action move focus
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.commit_edit();
            false
        }
        KeyCode::Char(c) => {
            app.input.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input.backspace();
            true
        }
        KeyCode::Delete => {
            app.input.delete();
            true
        }
        KeyCode::Left => {
            app.input.move_left();
            true
        }
        KeyCode::Right => {
            app.input.move_right();
            true
        }
        KeyCode::Home => {
            app.input.move_home();
            true
        }
        KeyCode::End => {
            app.input.move_end();
            true
        }
        _ => false,
    }
}

/// Handle key input for the import/export path prompts.
fn handle_prompt_key(app: &mut App, key: crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key.code {
        KeyCode::Enter => {
            app.confirm_prompt();
            true
        }
        KeyCode::Esc => {
            app.cancel_prompt();
            true
        }
        KeyCode::Char(c) => {
            app.input.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input.backspace();
            true
        }
        KeyCode::Delete => {
            app.input.delete();
            true
        }
        KeyCode::Left => {
            app.input.move_left();
            true
        }
        KeyCode::Right => {
            app.input.move_right();
            true
        }
        KeyCode::Home => {
            app.input.move_home();
            true
        }
        KeyCode::End => {
            app.input.move_end();
            true
        }
        _ => false,
    }
}

/// Crate version, baked in at compile time.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}


/// Rendering tests that assert on the drawn frame as text.
#[cfg(test)]
mod render_tests {
    use crate::app::Mode;
    use crate::event::Action;
    use crate::test_utils::{create_test_app, render_app_to_string};
    use gantty_core::RowField;

    #[test]
    fn test_render_initial_frame() {
        let (_dir, app) = create_test_app();
        let frame = render_app_to_string(&app);
        assert!(frame.contains("Rows (1)"));
        assert!(frame.contains("Timeline"));
        assert!(frame.contains("FORM"));
        // Empty date cells show the expected format
        assert!(frame.contains("MM.YYYY"));
    }

    #[test]
    fn test_render_generated_chart() {
        let (_dir, mut app) = create_test_app();
        app.rows.set_field(0, RowField::Name, "Design");
        app.rows.set_field(0, RowField::StartTime, "01.2024");
        app.rows.set_field(0, RowField::EndTime, "04.2024");
        app.generate();

        let frame = render_app_to_string(&app);
        assert!(frame.contains("Design"));
        assert!(frame.contains("\u{2588}"));
        assert!(frame.contains("Chart updated"));
    }

    #[test]
    fn test_render_settings_overlay() {
        let (_dir, mut app) = create_test_app();
        app.handle_action(Action::Settings);
        assert_eq!(app.mode, Mode::Settings);

        let frame = render_app_to_string(&app);
        assert!(frame.contains("Chart settings"));
        assert!(frame.contains("Palette"));
        assert!(frame.contains("palette1"));
        assert!(frame.contains("Bar labels"));
        assert!(frame.contains("off"));
    }

    #[test]
    fn test_render_help_overlay() {
        let (_dir, mut app) = create_test_app();
        app.handle_action(Action::Help);

        let frame = render_app_to_string(&app);
        assert!(frame.contains("Toggle this help"));
        assert!(frame.contains("Generate the chart"));
    }

    #[test]
    fn test_render_import_prompt() {
        let (_dir, mut app) = create_test_app();
        app.handle_action(Action::Import);

        let frame = render_app_to_string(&app);
        assert!(frame.contains("Import from file"));
        assert!(frame.contains("> _"));
        assert!(frame.contains("IMPORT"));
    }

    #[test]
    fn test_render_quit_confirmation() {
        let (_dir, mut app) = create_test_app();
        app.handle_action(Action::AddRow);
        app.handle_action(Action::Quit);

        let frame = render_app_to_string(&app);
        assert!(frame.contains("Quit without saving?"));
        assert!(frame.contains("Unsaved changes will be lost."));
    }

    #[test]
    fn test_render_notice_in_status_bar() {
        let (_dir, mut app) = create_test_app();
        app.notify("Data saved");

        let frame = render_app_to_string(&app);
        assert!(frame.contains("Data saved"));
    }

    #[test]
    fn test_render_editing_cell_shows_edit_chip() {
        let (_dir, mut app) = create_test_app();
        app.begin_edit();
        app.input.insert_str("Kick");

        let frame = render_app_to_string(&app);
        assert!(frame.contains("EDIT"));
        assert!(frame.contains("Kick"));
    }
}

/// Key-level flow tests that run events through the same path as the
/// run loop: text input first, then action dispatch.
#[cfg(test)]
mod key_flow_tests {
    use super::*;
    use crate::test_utils::create_test_app;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use gantty_core::RowField;

    fn press(app: &mut App, code: KeyCode) {
        press_mod(app, code, KeyModifiers::NONE);
    }

    fn press_mod(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        let key = KeyEvent::new(code, modifiers);
        if handle_text_key(app, key) {
            return;
        }
        app.handle_action(event::key_to_action(key));
    }

    #[test]
    fn test_typing_a_name_into_a_cell() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Enter);
        assert!(app.editing);
        for c in "Design".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(!app.editing);
        assert_eq!(app.rows.field(0, RowField::Name), "Design");
    }

    #[test]
    fn test_letters_are_text_while_editing_and_commands_otherwise() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.rows.len(), 2);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.rows.len(), 2);
        assert_eq!(app.input.content(), "a");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.rows.field(1, RowField::Name), "");
    }

    #[test]
    fn test_tab_commits_and_advances() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Enter);
        for c in "Build".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        assert!(!app.editing);
        assert_eq!(app.rows.field(0, RowField::Name), "Build");
        assert_eq!(app.field_focus, RowField::Comment);
    }

    #[test]
    fn test_ctrl_c_quits_even_while_editing() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Enter);
        press_mod(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_prompt_keys_type_a_path() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.mode, Mode::ImportPrompt);

        for c in "plan.txt".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Form);
        assert_eq!(
            app.take_pending_import(),
            Some(std::path::PathBuf::from("plan.txt"))
        );
    }

    #[test]
    fn test_plus_steps_the_focused_date() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.field_focus, RowField::StartTime);

        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.rows.field(0, RowField::StartTime), "01.2024");
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.rows.field(0, RowField::StartTime), "02.2024");
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.rows.field(0, RowField::StartTime), "01.2024");
    }

    #[test]
    fn test_settings_screen_keyboard_path() {
        let (_dir, mut app) = create_test_app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.mode, Mode::Settings);

        // Down to Height, edit it
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert!(app.editing);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        for c in "500".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.settings.height, "500");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Form);
    }
}
