use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        Wrap,
    },
};

use super::app::App;
use super::models::ProcessingStatus;
use crate::rename_engine::RenamePlanEntry;

pub fn ui(f: &mut Frame, app: &App) {
    render_main_screen(f, f.area(), app);

    if app.show_help {
        render_help_popup(f, app);
    }
}

pub fn render_main_screen(f: &mut Frame, area: Rect, app: &App) {
    let chunks = if app.show_preview {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    render_header(f, left_chunks[0], app);
    render_file_list(f, left_chunks[1], app);
    render_status_bar(f, left_chunks[2], app);

    if app.show_preview && chunks.len() > 1 {
        render_preview_panel(f, chunks[1], app);
    }
}

pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let state = if app.finished {
        " - Completed!"
    } else if app.is_processing() {
        " - Renaming..."
    } else {
        ""
    };
    let title = format!("{} ({}){}", app.title, app.directory.display(), state);

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

pub fn render_file_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let (icon, color) = match file.status {
                ProcessingStatus::Pending => ("[PENDING]", Color::Yellow),
                ProcessingStatus::Success => ("[RENAMED]", Color::Green),
                ProcessingStatus::Error => ("[ERROR]", Color::Red),
                ProcessingStatus::Skipped => ("[SKIPPED]", Color::Gray),
            };

            let name_style = if app.current_processing == Some(i) {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", icon), Style::default().fg(color)),
                Span::styled(file.entry.original_name.clone(), name_style),
                Span::styled(RenamePlanEntry::SEPARATOR, Style::default().fg(Color::DarkGray)),
                Span::styled(file.display_new_name().to_string(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let files_list = List::new(items)
        .block(
            Block::default()
                .title("Rename Plan")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(files_list, area, &mut app.list_state.clone());

    if app.files.len() > area.height.saturating_sub(2) as usize {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app.scroll_state.clone(),
        );
    }
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let label = if let Some(message) = &app.status_message {
        message.clone()
    } else if app.is_processing() {
        format!("Renaming... {}/{}", app.stats.processed + 1, app.stats.total)
    } else if app.files.is_empty() {
        "Nothing to rename".to_string()
    } else {
        format!("Ready to rename {} files", app.stats.total)
    };

    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(app.processing_progress.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(progress, chunks[0]);

    let controls_text = if app.finished {
        "h help, q quit"
    } else if app.is_processing() {
        "Esc stop"
    } else {
        "ENTER rename, h help, q cancel"
    };
    let controls = Paragraph::new(controls_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(controls, chunks[1]);
}

pub fn render_preview_panel(f: &mut Frame, area: Rect, app: &App) {
    let Some(file) = app.list_state.selected().and_then(|i| app.files.get(i)) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let before = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            file.entry.original_name.clone(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(format!("Episode: {:02}", file.entry.episode_number)),
        Line::from(format!("Title: {}", file.entry.episode_title)),
    ]))
    .block(
        Block::default()
            .title("Before")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(before, chunks[0]);

    let new_style = match file.status {
        ProcessingStatus::Success => Style::default().fg(Color::Green),
        ProcessingStatus::Error => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Yellow),
    };
    let mut lines = vec![Line::from(Span::styled(
        file.display_new_name().to_string(),
        new_style,
    ))];
    if let Some(error) = &file.error_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    let after = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("After")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(after, chunks[1]);
}

pub fn render_help_popup(f: &mut Frame, _app: &App) {
    let popup_area = centered_rect(60, 50, f.area());

    let help_text = vec![
        Line::from(Span::styled(
            "Rename Preview - Help",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Up/k    - Move up"),
        Line::from("  Down/j  - Move down"),
        Line::from("  Enter   - Rename all listed files"),
        Line::from("  Esc     - Stop renaming"),
        Line::from("  p       - Toggle before/after panel"),
        Line::from("  h       - Toggle this help"),
        Line::from("  q       - Quit"),
        Line::from(""),
        Line::from("Files are paired with episodes in the order shown."),
        Line::from("Existing targets are kept; new names get a _1, _2 suffix."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or h to close",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
