use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use facesort::api::Endpoint;
use facesort::workflow::JobState;

/// Service endpoint span; a missing endpoint is called out since nothing can be submitted
fn endpoint_spans(endpoint: Option<&Endpoint>) -> Vec<Span<'_>> {
    match endpoint {
        Some(endpoint) => vec![
            Span::styled("🟢 ", Style::default().fg(Color::Green)),
            Span::raw(endpoint.as_str()),
        ],
        None => vec![Span::styled(
            "🔴 No API URL (set api_url or FACESORT_API_URL)",
            Style::default().fg(Color::Red),
        )],
    }
}

fn state_span(state: &JobState) -> Span<'static> {
    let color = match state {
        JobState::Idle => Color::Gray,
        JobState::Submitting { .. } => Color::Yellow,
        JobState::Succeeded { .. } => Color::Green,
        JobState::Failed { .. } => Color::Red,
    };
    Span::styled(
        state.label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Render the top bar: app name, service endpoint, job state
pub fn render_system_bar(f: &mut Frame, area: Rect, endpoint: Option<&Endpoint>, state: &JobState) {
    let mut spans = vec![
        Span::styled(
            "Face Sorter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
    ];
    spans.extend(endpoint_spans(endpoint));
    spans.push(Span::raw(" | "));
    spans.push(state_span(state));

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
