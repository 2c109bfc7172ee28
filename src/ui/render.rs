use crate::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use facesort::logic::formatting::format_progress;
use facesort::workflow::JobState;

use super::{
    layout,
    legend::{self, LegendContext},
    prompt, results, selection, status_bar, system_bar, toast,
};

fn legend_context(app: &App) -> LegendContext {
    LegendContext {
        prompt_open: app.model.has_prompt(),
        submitting: app.workflow.is_submitting(),
        can_submit: app.workflow.can_submit(),
        has_result: app.workflow.result().is_some(),
        has_downloads: !app.workflow.download_links().is_empty(),
    }
}

fn render_progress(f: &mut Frame, area: Rect, value: u8, state: &JobState) {
    let color = match state {
        JobState::Failed { .. } => Color::Red,
        JobState::Succeeded { .. } => Color::Green,
        _ => Color::Cyan,
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(value.min(100)))
        .label(format_progress(value));
    f.render_widget(gauge, area);
}

/// Main render function - orchestrates all UI rendering
pub fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let ctx = legend_context(app);
    let legend_height = legend::calculate_legend_height(size.width, ctx);
    let layout_info = layout::calculate_layout(size, legend_height, app.model.has_prompt());

    system_bar::render_system_bar(
        f,
        layout_info.system_area,
        app.workflow.endpoint(),
        app.workflow.state(),
    );

    selection::render_selection(
        f,
        layout_info.selection_area,
        app.workflow.staging(),
        app.workflow.settings(),
        app.workflow.is_submitting(),
        &mut app.image_state_map,
    );

    results::render_results(f, layout_info.results_area, &app.workflow, &mut app.image_state_map);

    render_progress(f, layout_info.progress_area, app.workflow.progress(), app.workflow.state());

    if let (Some(area), Some(state)) = (layout_info.prompt_area, app.model.prompt.as_ref()) {
        prompt::render_prompt(f, area, state);
    }

    legend::render_legend(f, layout_info.legend_area, ctx);

    status_bar::render_status_bar(
        f,
        layout_info.status_area,
        app.workflow.state(),
        app.workflow.staging().staged_count(),
        app.download_dir(),
    );

    // Toast goes last so it draws over everything else
    if let Some(notification) = app.workflow.notifications().current() {
        toast::render_toast(f, size, notification);
    }
}
