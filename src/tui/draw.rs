use super::app::{App, Focus, StatusKind};
use super::field::TextField;
use ratatui::prelude::*;
use ratatui::widgets::*;

pub fn draw(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // filename
            Constraint::Min(0),    // rows
            Constraint::Length(1), // status
            Constraint::Length(1), // keybindings
        ])
        .split(f.area());

    draw_header(f, outer[0], app);
    draw_rows(f, outer[1], app);
    draw_status(f, outer[2], app);
    draw_help(f, outer[3]);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let error = app.filename_error();
    let border_color = if error.is_some() {
        Color::Red
    } else {
        Color::DarkGray
    };

    let mut title = vec![Span::styled(
        " configurator ",
        Style::default().fg(Color::Cyan).bold(),
    )];
    if let Some(err) = &error {
        title.push(Span::styled(
            format!(" {err} "),
            Style::default().fg(Color::Red),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(title));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let label = " Save to: ";
    let focused = app.focus() == Focus::Filename;
    let line = Line::from(vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::styled(app.filename().text(), cell_style(focused)),
    ]);
    f.render_widget(Paragraph::new(line), inner);

    if focused {
        let x = inner.x + label.chars().count() as u16;
        place_cursor(f, app.filename(), x, inner.y, inner.right().saturating_sub(x));
    }
}

fn draw_rows(f: &mut Frame, area: Rect, app: &App) {
    let rows = app.editable_rows();
    if rows.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                " No entries. Press Ctrl-N to add one.",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }

    let key_width = (area.width / 4).max(1);
    let separator = " │ ";
    let value_x = area.x + key_width + separator.chars().count() as u16;
    let value_width = area.right().saturating_sub(value_x);

    let focused_row = match app.focus() {
        Focus::Filename => None,
        Focus::Key(i) | Focus::Value(i) => Some(i),
    };

    // Scroll just enough to keep the focused row visible
    let height = area.height as usize;
    let first = focused_row
        .map(|i| (i + 1).saturating_sub(height))
        .unwrap_or(0);

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(first)
        .take(height)
        .map(|(i, row)| {
            let key_focused = app.focus() == Focus::Key(i);
            let value_focused = app.focus() == Focus::Value(i);
            Line::from(vec![
                Span::styled(
                    fit(row.key.text(), key_width as usize),
                    cell_style(key_focused).fg(Color::Yellow),
                ),
                Span::styled(separator, Style::default().fg(Color::DarkGray)),
                Span::styled(
                    fit(row.value.text(), value_width as usize),
                    cell_style(value_focused),
                ),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);

    if let Some(i) = focused_row {
        let y = area.y + (i - first) as u16;
        match app.focus() {
            Focus::Key(_) => place_cursor(f, &rows[i].key, area.x, y, key_width),
            Focus::Value(_) => place_cursor(f, &rows[i].value, value_x, y, value_width),
            Focus::Filename => {}
        }
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let Some(status) = app.status() else {
        return;
    };

    let color = match status.kind {
        StatusKind::Success => Color::Green,
        StatusKind::Error => Color::Red,
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {}: ", status.title),
            Style::default().fg(color).bold(),
        ),
        Span::raw(status.message.as_str()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let keys = " \u{2191}\u{2193}/Tab: move  Ctrl-S: save  Ctrl-N: add row  Ctrl-D: delete row  Esc/Ctrl-Q: save & quit";
    f.render_widget(
        Paragraph::new(Span::styled(keys, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn cell_style(focused: bool) -> Style {
    if focused {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

/// Pad or cut `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let mut cell: String = text.chars().take(width).collect();
    let len = cell.chars().count();
    cell.extend(std::iter::repeat(' ').take(width - len));
    cell
}

fn place_cursor(f: &mut Frame, field: &TextField, x: u16, y: u16, width: u16) {
    if width == 0 {
        return;
    }
    let column = (field.cursor_column() as u16).min(width - 1);
    f.set_cursor_position((x + column, y));
}
