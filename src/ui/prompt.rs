//! Path Prompt UI
//!
//! Renders the input box for the target path or candidate patterns.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use facesort::model::ui::PromptState;

/// Render the prompt above the legend
pub fn render_prompt(f: &mut Frame, area: Rect, prompt: &PromptState) {
    let title = format!(" {} - Enter to apply, Esc to cancel ", prompt.kind.title());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(Color::Cyan));

    let cursor_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::SLOW_BLINK);

    // Keep the end of long input visible
    let visible_width = area.width.saturating_sub(5) as usize;
    let input = prompt.input.as_str();
    let skip = input.chars().count().saturating_sub(visible_width);
    let shown: String = input.chars().skip(skip).collect();

    let input_line = Line::from(vec![
        Span::raw("> "),
        Span::raw(shown),
        Span::styled("█", cursor_style),
    ]);

    f.render_widget(Paragraph::new(vec![input_line]).block(block), area);
}
