//! Selection pane: target face, job settings and the candidate batch

use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use ratatui_image::StatefulImage;

use facesort::logic::formatting::{format_batch, format_size};
use facesort::logic::preview::more_label;
use facesort::model::settings::{Settings, Threshold};
use facesort::model::staging::FileStagingStore;

use crate::{ImagePreviewState, PreviewKey};

pub fn render_selection(
    f: &mut Frame,
    area: Rect,
    staging: &FileStagingStore,
    settings: Settings,
    locked: bool,
    image_state_map: &mut HashMap<PreviewKey, ImagePreviewState>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Target
            Constraint::Length(5),      // Settings
            Constraint::Min(3),         // Candidates
        ])
        .split(area);

    render_target(f, chunks[0], staging, image_state_map);
    render_settings(f, chunks[1], settings, locked);
    render_inputs(f, chunks[2], staging);
}

fn render_target(
    f: &mut Frame,
    area: Rect,
    staging: &FileStagingStore,
    image_state_map: &mut HashMap<PreviewKey, ImagePreviewState>,
) {
    let Some(target) = staging.target() else {
        let hint = Paragraph::new("No target selected. Press t to choose one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Target face "))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    };

    let title = format!(" Target: {} ({}) ", target.file.name, format_size(target.file.size));
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let key = PreviewKey::Staged(target.binding().id());
    match image_state_map.get_mut(&key) {
        Some(ImagePreviewState::Ready { protocol, .. }) => {
            f.render_stateful_widget(StatefulImage::default(), inner, protocol);
        }
        Some(ImagePreviewState::Loading) => {
            f.render_widget(Paragraph::new("Loading preview..."), inner);
        }
        Some(ImagePreviewState::Failed { reason }) => {
            f.render_widget(
                Paragraph::new(format!("Preview unavailable: {}", reason))
                    .style(Style::default().fg(Color::DarkGray))
                    .wrap(Wrap { trim: true }),
                inner,
            );
        }
        None => {
            f.render_widget(
                Paragraph::new(target.file.path.display().to_string())
                    .style(Style::default().fg(Color::Gray))
                    .wrap(Wrap { trim: true }),
                inner,
            );
        }
    }
}

fn render_settings(f: &mut Frame, area: Rect, settings: Settings, locked: bool) {
    let value_style = if locked {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Mode:      "),
            Span::styled(settings.mode.label(), value_style),
        ]),
        Line::from(vec![
            Span::raw("Detector:  "),
            Span::styled(settings.detector.label(), value_style),
        ]),
        Line::from(vec![
            Span::raw("Threshold: "),
            Span::styled(settings.threshold.to_string(), value_style),
            Span::styled(
                format!(
                    "  ({}-{})",
                    Threshold::from_hundredths(Threshold::MIN.into()),
                    Threshold::from_hundredths(Threshold::MAX.into())
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let title = if locked { " Settings (locked) " } else { " Settings " };
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

fn render_inputs(f: &mut Frame, area: Rect, staging: &FileStagingStore) {
    let total_bytes: u64 = staging.inputs().iter().map(|s| s.file.size).sum();
    let title = format!(" Images to scan: {} ", format_batch(staging.input_count(), total_bytes));

    if staging.input_count() == 0 {
        let hint = Paragraph::new("No images selected. Press i to add paths or globs.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    }

    let mut items: Vec<ListItem> = staging
        .visible_inputs()
        .iter()
        .map(|staged| {
            ListItem::new(Line::from(vec![
                Span::raw(staged.file.name.clone()),
                Span::styled(
                    format!("  {}", format_size(staged.file.size)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    if let Some(more) = more_label(staging.hidden_input_count()) {
        items.push(ListItem::new(Span::styled(
            more,
            Style::default().fg(Color::Yellow),
        )));
    }

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}
