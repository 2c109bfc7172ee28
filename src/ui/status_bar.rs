use std::path::Path;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use facesort::workflow::JobState;

fn status_message(state: &JobState, staged: usize) -> String {
    match state {
        JobState::Idle if staged == 0 => "Nothing staged".to_string(),
        JobState::Idle => format!("{} file(s) staged", staged),
        JobState::Submitting { job } => format!("Job #{} uploading + sorting", job),
        JobState::Succeeded { result } => format!(
            "Matched {} of {} scanned",
            result.matched_count, result.total_scanned
        ),
        JobState::Failed { message } => message.clone(),
    }
}

/// Render the bottom status bar: job status and where archives are saved
pub fn render_status_bar(f: &mut Frame, area: Rect, state: &JobState, staged: usize, download_dir: &Path) {
    let color = match state {
        JobState::Failed { .. } => Color::Red,
        _ => Color::Gray,
    };

    let line = Line::from(vec![
        Span::styled(format!(" {}", status_message(state, staged)), Style::default().fg(color)),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Downloads: {}", download_dir.display()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use facesort::api::JobResult;

    #[test]
    fn test_status_message_per_state() {
        assert_eq!(status_message(&JobState::Idle, 0), "Nothing staged");
        assert_eq!(status_message(&JobState::Idle, 3), "3 file(s) staged");
        assert_eq!(
            status_message(&JobState::Submitting { job: 7 }, 3),
            "Job #7 uploading + sorting"
        );

        let result = JobResult {
            matched_count: 2,
            total_scanned: 5,
            ..JobResult::default()
        };
        assert_eq!(
            status_message(&JobState::Succeeded { result }, 3),
            "Matched 2 of 5 scanned"
        );
    }
}
