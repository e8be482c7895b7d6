use crate::theme::{focused_border, highlight_text, label_text, normal_text, popup_bg};
use checkit_core::TextField;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

/// Clears a centered area, draws a titled frame and returns the inner area.
pub fn render_popup_with_block(
    frame: &mut Frame,
    title: &str,
    width_percent: u16,
    height_percent: u16,
) -> Rect {
    let area = centered_rect(width_percent, height_percent, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focused_border())
        .style(popup_bg());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    inner
}

/// Labelled form fields stacked vertically, the focused one showing the cursor.
pub fn render_form_fields(
    frame: &mut Frame,
    area: Rect,
    fields: &[(&str, &TextField, bool)],
    hint: &str,
) {
    let mut constraints: Vec<Constraint> = fields
        .iter()
        .flat_map(|_| [Constraint::Length(1), Constraint::Length(3)])
        .collect();
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(area);

    for (index, (label, field, focused)) in fields.iter().enumerate() {
        let label_area = chunks[index * 2];
        let input_area = chunks[index * 2 + 1];

        let mut label_spans = vec![Span::styled(*label, highlight_text())];
        if field.is_locked() {
            label_spans.push(Span::styled(" (locked)", label_text()));
        }
        frame.render_widget(Paragraph::new(Line::from(label_spans)), label_area);

        let border = if *focused { focused_border() } else { label_text() };
        let input = Paragraph::new(field.value())
            .style(if field.is_locked() { label_text() } else { normal_text() })
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(input, input_area);

        if *focused && !field.is_locked() {
            let cursor_x = input_area.x + field.cursor_pos() as u16 + 1;
            frame.set_cursor_position((cursor_x, input_area.y + 1));
        }
    }

    if let Some(hint_area) = chunks.last() {
        frame.render_widget(Paragraph::new(hint).style(label_text()), *hint_area);
    }
}
