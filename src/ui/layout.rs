use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout information for rendering
pub struct LayoutInfo {
    /// Top bar: service endpoint and job state
    pub system_area: Rect,
    /// Left pane: staged selection and settings
    pub selection_area: Rect,
    /// Right pane: results summary and gallery
    pub results_area: Rect,
    /// Progress gauge
    pub progress_area: Rect,
    /// Path prompt (if open)
    pub prompt_area: Option<Rect>,
    /// Hotkey legend area (full width)
    pub legend_area: Rect,
    /// Bottom status bar area
    pub status_area: Rect,
}

/// Calculate the screen layout for all UI components
pub fn calculate_layout(terminal_size: Rect, legend_height: u16, prompt_visible: bool) -> LayoutInfo {
    let prompt_height = if prompt_visible { 3 } else { 0 };

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // System bar
            Constraint::Min(8),                // Selection + results
            Constraint::Length(3),             // Progress gauge
            Constraint::Length(prompt_height), // Prompt (3 lines when open, 0 when hidden)
            Constraint::Length(legend_height), // Legend (exact fit for wrapped content)
            Constraint::Length(1),             // Status bar
        ])
        .split(terminal_size);

    // Results get the larger share; that is where images are drawn
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[1]);

    LayoutInfo {
        system_area: main_chunks[0],
        selection_area: content_chunks[0],
        results_area: content_chunks[1],
        progress_area: main_chunks[2],
        prompt_area: prompt_visible.then_some(main_chunks[3]),
        legend_area: main_chunks[4],
        status_area: main_chunks[5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_area_only_when_visible() {
        let area = Rect::new(0, 0, 100, 40);
        assert!(calculate_layout(area, 3, false).prompt_area.is_none());

        let layout = calculate_layout(area, 3, true);
        assert_eq!(layout.prompt_area.unwrap().height, 3);
    }

    #[test]
    fn test_results_pane_is_wider() {
        let layout = calculate_layout(Rect::new(0, 0, 100, 40), 3, false);
        assert!(layout.results_area.width > layout.selection_area.width);
        assert_eq!(layout.status_area.y, 39);
    }
}
