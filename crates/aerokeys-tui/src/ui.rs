use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use aerokeys_core::model::{Category, KeyBinding, Mode};

use crate::app::App;

/// One category block: its title plus the bindings under it.
pub type Group<'a> = (Category, Vec<&'a KeyBinding>);

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title bar (1 content + bottom border)
            Constraint::Min(3),
            Constraint::Length(1), // help bar
        ])
        .split(f.area());

    let mode = app.shown_mode();
    render_title_bar(f, app, mode.as_ref(), chunks[0]);
    match &mode {
        Some(mode) => render_sheet(f, mode, app.columns, chunks[1]),
        None => render_placeholder(f, "Main mode hidden. Press Tab to browse.", chunks[1]),
    }
    render_help_bar(f, app, chunks[2]);
}

fn render_title_bar(f: &mut Frame, app: &App, mode: Option<&Mode>, area: Rect) {
    let name = mode.map(|m| m.name.as_str()).unwrap_or("Main");
    let mut spans = vec![
        Span::styled(
            " aerokeys ",
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if app.pinned.is_some() {
        spans.push(Span::styled(
            format!("  (active: {})", app.current),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !app.connected {
        spans.push(Span::styled(
            "  disconnected, retrying",
            Style::default().fg(Color::Red),
        ));
    }
    let title = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, area);
}

fn render_sheet(f: &mut Frame, mode: &Mode, columns: u16, area: Rect) {
    if mode.bindings.is_empty() {
        render_placeholder(f, "(no bindings)", area);
        return;
    }
    let split = split_columns(mode.grouped(), columns as usize);
    let n = split.len() as u32;
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(split.iter().map(|_| Constraint::Ratio(1, n)))
        .split(area);

    for (groups, col_area) in split.iter().zip(areas.iter()) {
        f.render_widget(Paragraph::new(column_lines(groups)), *col_area);
    }
}

fn column_lines<'a>(groups: &[Group<'a>]) -> Vec<Line<'a>> {
    let header_style = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::Gray);

    let width = groups
        .iter()
        .flat_map(|(_, bindings)| bindings.iter())
        .map(|b| b.display_key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (category, bindings) in groups {
        lines.push(Line::from(Span::styled(format!(" {}", category.title()), header_style)));
        for b in bindings {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{:<width$}", b.display_key), key_style),
                Span::raw("  "),
                Span::styled(b.display_label.as_str(), label_style),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn render_placeholder(f: &mut Frame, text: &str, area: Rect) {
    let p = Paragraph::new(Span::styled(text.to_string(), Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    f.render_widget(p, area);
}

fn render_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status_message {
        Some((msg, _)) => Line::from(Span::styled(format!(" {msg}"), Style::default().fg(Color::Green))),
        None => {
            let key = Style::default().fg(Color::Yellow);
            Line::from(vec![
                Span::styled(" Tab/S-Tab", key),
                Span::raw(" modes  "),
                Span::styled("r", key),
                Span::raw(" reload  "),
                Span::styled("q", key),
                Span::raw(" quit"),
            ])
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Rows a group takes on screen: header, bindings, spacer.
fn group_height(group: &Group) -> usize {
    group.1.len() + 2
}

/// Split category groups into at most `columns` columns of similar height.
/// Groups are never broken up and keep their order.
pub fn split_columns(groups: Vec<Group<'_>>, columns: usize) -> Vec<Vec<Group<'_>>> {
    let columns = columns.max(1);
    let total: usize = groups.iter().map(group_height).sum();
    let target = total.div_ceil(columns);

    let mut out: Vec<Vec<Group>> = Vec::new();
    let mut current: Vec<Group> = Vec::new();
    let mut height = 0;
    for group in groups {
        let h = group_height(&group);
        if !current.is_empty() && height + h > target && out.len() + 1 < columns {
            out.push(std::mem::take(&mut current));
            height = 0;
        }
        height += h;
        current.push(group);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
