//! Results pane: run summary, matched/not-matched gallery and archive links

use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};
use ratatui_image::StatefulImage;

use facesort::api::JobResult;
use facesort::logic::formatting::format_score;
use facesort::logic::preview::more_label;
use facesort::model::results::{DownloadLink, PreviewSource, ResultPresenter, ResultTab};
use facesort::workflow::{JobState, SortWorkflow};

use crate::{ImagePreviewState, PreviewKey};

pub fn render_results(
    f: &mut Frame,
    area: Rect,
    workflow: &SortWorkflow,
    image_state_map: &mut HashMap<PreviewKey, ImagePreviewState>,
) {
    let block = Block::default().borders(Borders::ALL).title(" Results ");

    let result = match workflow.state() {
        JobState::Succeeded { result } => result,
        JobState::Submitting { .. } => {
            let text = Paragraph::new("Sorting... the service is scanning the batch.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            f.render_widget(text, area);
            return;
        }
        JobState::Failed { message } => {
            let text = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block)
                .wrap(Wrap { trim: true });
            f.render_widget(text, area);
            return;
        }
        JobState::Idle => {
            let text = Paragraph::new("Stage a target face and some images, then press Enter to sort.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .wrap(Wrap { trim: true });
            f.render_widget(text, area);
            return;
        }
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let downloads = workflow.download_links();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                  // Summary
            Constraint::Length(1),                                  // Tabs
            Constraint::Min(3),                                     // Gallery
            Constraint::Length(downloads.len().max(1) as u16 + 2), // Archives
        ])
        .split(inner);

    render_summary(f, chunks[0], result);
    render_tabs(f, chunks[1], workflow.presenter(), result);
    render_gallery(f, chunks[2], workflow.presenter(), result, image_state_map);
    render_downloads(f, chunks[3], &downloads);
}

fn render_summary(f: &mut Frame, area: Rect, result: &JobResult) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled("Target: ", label),
            Span::styled(result.target_label.clone(), value),
            Span::styled("  Score: ", label),
            Span::styled(format_score(result.target_score), value),
        ]),
        Line::from(vec![
            Span::styled("Scanned: ", label),
            Span::styled(result.total_scanned.to_string(), value),
            Span::styled("  Matched: ", label),
            Span::styled(
                result.matched_count.to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Not matched: ", label),
            Span::styled(result.not_matched_count.to_string(), value),
        ]),
        Line::from(Span::styled(
            format!("Run {}", result.run_id),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Paragraph::new(lines), area);
}

fn render_tabs(f: &mut Frame, area: Rect, presenter: &ResultPresenter, result: &JobResult) {
    let titles = [ResultTab::Matched, ResultTab::NotMatched].map(|tab| {
        let count = tab.partition().previews(result).len();
        format!("{} ({})", tab.label(), count)
    });
    let selected = match presenter.active_tab() {
        ResultTab::Matched => 0,
        ResultTab::NotMatched => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn preview_name(url: &str) -> &str {
    url.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or(url)
}

fn render_gallery(
    f: &mut Frame,
    area: Rect,
    presenter: &ResultPresenter,
    result: &JobResult,
    image_state_map: &mut HashMap<PreviewKey, ImagePreviewState>,
) {
    let previews = presenter.active_previews(result);
    let title = format!(" {} ", presenter.title());

    if previews.is_empty() {
        let empty = Paragraph::new("No previews in this group.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let mut items: Vec<ListItem> = previews
        .iter()
        .map(|url| {
            let style = match presenter.preview_source(url) {
                PreviewSource::Remote(_) => Style::default(),
                PreviewSource::Placeholder => Style::default().fg(Color::DarkGray),
            };
            ListItem::new(Span::styled(preview_name(url).to_string(), style))
        })
        .collect();
    if let Some(more) = more_label(presenter.hidden_preview_count(result)) {
        items.push(ListItem::new(Span::styled(
            format!("{} (in archive)", more),
            Style::default().fg(Color::Yellow),
        )));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(presenter.selected_index()));
    f.render_stateful_widget(list, panes[0], &mut list_state);

    let image_block = Block::default().borders(Borders::ALL).title(" Preview ");
    let image_area = image_block.inner(panes[1]);
    f.render_widget(image_block, panes[1]);

    let Some(selected) = presenter.selected_preview(result) else {
        return;
    };
    let placeholder = Paragraph::new("preview unavailable")
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });

    match presenter.preview_source(selected) {
        PreviewSource::Placeholder => f.render_widget(placeholder, image_area),
        PreviewSource::Remote(url) => match image_state_map.get_mut(&PreviewKey::Remote(url.to_string())) {
            Some(ImagePreviewState::Ready { protocol, .. }) => {
                f.render_stateful_widget(StatefulImage::default(), image_area, protocol);
            }
            Some(ImagePreviewState::Failed { .. }) => f.render_widget(placeholder, image_area),
            Some(ImagePreviewState::Loading) | None => {
                f.render_widget(
                    Paragraph::new("Loading preview...").style(Style::default().fg(Color::Gray)),
                    image_area,
                );
            }
        },
    }
}

fn render_downloads(f: &mut Frame, area: Rect, downloads: &[DownloadLink]) {
    let lines: Vec<Line> = if downloads.is_empty() {
        vec![Line::from(Span::styled(
            "No archives for this run",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        downloads
            .iter()
            .map(|link| {
                Line::from(vec![
                    Span::styled(
                        format!("{} zip ", link.partition.label()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(link.url.as_str()),
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Archives "));
    f.render_widget(paragraph, area);
}
