//! Keyboard Input Handler
//!
//! Handles all keyboard input. The path prompt, when open, captures every
//! keystroke; otherwise keys map to workflow actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use facesort::model::results::Partition;
use facesort::model::ui::PromptKind;

use crate::App;

/// Handle keyboard input
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.model.should_quit = true;
        return;
    }

    if app.model.has_prompt() {
        handle_prompt_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.model.should_quit = true,

        // Selection
        KeyCode::Char('t') => app.model.open_prompt(PromptKind::Target),
        KeyCode::Char('i') => app.model.open_prompt(PromptKind::Images),
        KeyCode::Char('c') => app.clear_selection(),

        // Settings (ignored by the workflow while a job runs)
        KeyCode::Char('m') => {
            app.workflow.cycle_mode();
        }
        KeyCode::Char('d') => {
            app.workflow.cycle_detector();
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
            app.workflow.step_threshold(1);
        }
        KeyCode::Char('-') | KeyCode::Left => {
            app.workflow.step_threshold(-1);
        }

        // Job
        KeyCode::Enter | KeyCode::Char('s') => app.submit(),

        // Results
        KeyCode::Tab => {
            app.workflow.presenter_mut().toggle_tab();
            app.model.sixel_cleanup_frames = 1;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.workflow.select_next_preview();
            app.model.sixel_cleanup_frames = 1;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.workflow.presenter_mut().select_previous();
            app.model.sixel_cleanup_frames = 1;
        }
        KeyCode::Char('o') => app.open_selected_preview(),
        KeyCode::Char('M') => app.download(Partition::Matched),
        KeyCode::Char('N') => app.download(Partition::NotMatched),

        // Notification
        KeyCode::Char('x') | KeyCode::Esc => app.workflow.dismiss_notification(),

        _ => {}
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.model.cancel_prompt(),
        KeyCode::Enter => app.apply_prompt(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(prompt) = app.model.prompt.as_mut() {
                prompt.input.clear();
            }
        }
        KeyCode::Backspace => {
            if let Some(prompt) = app.model.prompt.as_mut() {
                prompt.input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = app.model.prompt.as_mut() {
                prompt.input.push(c);
            }
        }
        _ => {}
    }
}
