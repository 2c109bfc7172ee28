use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What the legend needs to know to show only keys that currently do something
#[derive(Clone, Copy, Debug, Default)]
pub struct LegendContext {
    pub prompt_open: bool,
    pub submitting: bool,
    pub can_submit: bool,
    pub has_result: bool,
    pub has_downloads: bool,
}

fn key(k: &'static str) -> Span<'static> {
    Span::styled(k, Style::default().fg(Color::Yellow))
}

/// Build hotkey spans (extracted for testability)
fn build_hotkey_spans(ctx: LegendContext) -> Vec<Span<'static>> {
    if ctx.prompt_open {
        return vec![
            key("Enter"),
            Span::raw(":Apply  "),
            key("Esc"),
            Span::raw(":Cancel  "),
            key("^U"),
            Span::raw(":Clear input"),
        ];
    }

    let mut hotkey_spans = vec![
        key("t"),
        Span::raw(":Target  "),
        key("i"),
        Span::raw(":Images  "),
        key("c"),
        Span::raw(":Clear  "),
    ];

    // Settings are locked while a job runs
    if !ctx.submitting {
        hotkey_spans.extend(vec![
            key("m"),
            Span::raw(":Mode  "),
            key("d"),
            Span::raw(":Detector  "),
            key("←/→"),
            Span::raw(":Threshold  "),
        ]);
    }

    if ctx.can_submit {
        hotkey_spans.extend(vec![key("Enter"), Span::raw(":Sort  ")]);
    }

    if ctx.has_result {
        hotkey_spans.extend(vec![
            key("Tab"),
            Span::raw(":Matched/Not  "),
            key("↑/↓"),
            Span::raw(":Preview  "),
            key("o"),
            Span::raw(":Open  "),
        ]);
    }

    if ctx.has_downloads {
        hotkey_spans.extend(vec![
            key("M"),
            Span::raw(":Get matched  "),
            key("N"),
            Span::raw(":Get not matched  "),
        ]);
    }

    hotkey_spans.extend(vec![key("x"), Span::raw(":Dismiss  "), key("q"), Span::raw(":Quit")]);

    hotkey_spans
}

/// Build the legend paragraph
pub fn build_legend_paragraph(ctx: LegendContext) -> Paragraph<'static> {
    let hotkey_line = Line::from(build_hotkey_spans(ctx));

    Paragraph::new(vec![hotkey_line])
        .block(Block::default().borders(Borders::ALL).title("Hotkeys"))
        .style(Style::default().fg(Color::Gray))
        .wrap(ratatui::widgets::Wrap { trim: false })
}

/// Render the hotkey legend
pub fn render_legend(f: &mut Frame, area: Rect, ctx: LegendContext) {
    f.render_widget(build_legend_paragraph(ctx), area);
}

/// Calculate required height for legend based on terminal width and content
pub fn calculate_legend_height(terminal_width: u16, ctx: LegendContext) -> u16 {
    // Count lines WITHOUT block borders (line_count() does not account for them)
    let paragraph_for_counting = Paragraph::new(vec![Line::from(build_hotkey_spans(ctx))])
        .wrap(ratatui::widgets::Wrap { trim: false });

    let available_width = terminal_width.saturating_sub(2);
    let line_count = paragraph_for_counting.line_count(available_width);

    // Add top + bottom borders, ensure minimum of 3
    (line_count as u16).saturating_add(2).max(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_to_text(spans: &[Span]) -> String {
        spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_prompt_legend_only_shows_prompt_keys() {
        let text = spans_to_text(&build_hotkey_spans(LegendContext {
            prompt_open: true,
            can_submit: true,
            ..LegendContext::default()
        }));
        assert!(text.contains("Apply"));
        assert!(!text.contains("Sort"));
    }

    #[test]
    fn test_settings_hidden_while_submitting() {
        let idle = spans_to_text(&build_hotkey_spans(LegendContext::default()));
        assert!(idle.contains("Threshold"));

        let busy = spans_to_text(&build_hotkey_spans(LegendContext {
            submitting: true,
            ..LegendContext::default()
        }));
        assert!(!busy.contains("Threshold"));
        assert!(!busy.contains("Sort"));
    }

    #[test]
    fn test_download_keys_only_with_archives() {
        let ctx = LegendContext {
            has_result: true,
            ..LegendContext::default()
        };
        assert!(!spans_to_text(&build_hotkey_spans(ctx)).contains("Get matched"));

        let ctx = LegendContext {
            has_result: true,
            has_downloads: true,
            ..LegendContext::default()
        };
        assert!(spans_to_text(&build_hotkey_spans(ctx)).contains("Get matched"));
    }

    #[test]
    fn test_legend_height_grows_when_narrow() {
        let ctx = LegendContext {
            has_result: true,
            has_downloads: true,
            can_submit: true,
            ..LegendContext::default()
        };
        assert_eq!(calculate_legend_height(400, ctx), 3);
        assert!(calculate_legend_height(40, ctx) > 3);
    }
}
