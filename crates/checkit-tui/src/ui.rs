use crate::components::*;
use crate::controller::{Mode, PanelController, PanelState, Row};
use crate::theme::*;
use checkit_domain::{CategoryView, ItemView, PanelView, TabView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render(controller: &PanelController, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_tabs(controller, frame, chunks[0]);
    render_main(controller, frame, chunks[1]);
    render_footer(controller, frame, chunks[2]);

    match &controller.mode {
        Mode::Export(form) => {
            let inner = render_popup_with_block(frame, "Export checklist", 60, 70);
            render_form_fields(
                frame,
                inner,
                &form.fields(),
                "TAB: next field | ENTER: save CSV | ESC: cancel",
            );
        }
        Mode::Options(form) => {
            let inner = render_popup_with_block(frame, "Options", 60, 50);
            render_form_fields(frame, inner, &form.fields(), "TAB: switch field | ENTER: save | ESC: cancel");
        }
        Mode::Help => render_help_popup(frame),
        Mode::Normal | Mode::Search => {}
    }

    if let Some(banner) = &controller.banner {
        banner.render(frame, frame.area());
    }
}

fn render_tabs(controller: &PanelController, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title("checkit")
        .borders(Borders::ALL)
        .border_style(unfocused_border());

    let Some(view) = controller.view() else {
        frame.render_widget(block, area);
        return;
    };

    let visible: Vec<(usize, &TabView)> = view
        .tabs
        .iter()
        .enumerate()
        .filter(|(_, tab)| tab.visible)
        .collect();
    let selected = view
        .active_index()
        .and_then(|active| visible.iter().position(|(index, _)| *index == active));

    let titles: Vec<Line> = visible
        .iter()
        .map(|(_, tab)| Line::from(tab.title.as_str()))
        .collect();

    let tabs = Tabs::new(titles)
        .block(block)
        .style(label_text())
        .highlight_style(active_tab())
        .select(selected);
    frame.render_widget(tabs, area);
}

fn render_main(controller: &PanelController, frame: &mut Frame, area: Rect) {
    let focused = matches!(controller.mode, Mode::Normal | Mode::Search);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { focused_border() } else { unfocused_border() });

    let message = match &controller.state {
        PanelState::Idle | PanelState::Loading => {
            vec![Line::from(Span::styled("Loading...", label_text()))]
        }
        PanelState::NotConfigured => vec![
            Line::from(Span::styled(
                "Deployment ID is missing. Please configure your settings.",
                warning_text(),
            )),
            Line::from(""),
            Line::from(Span::styled("Press o to open the options.", label_text())),
        ],
        PanelState::Failed(message) => vec![
            Line::from(Span::styled(message.as_str(), error_text())),
            Line::from(""),
            Line::from(Span::styled("Press r to try again.", label_text())),
        ],
        PanelState::Ready(view) => {
            render_checklist(controller, view, frame, area, block);
            return;
        }
    };

    let paragraph = Paragraph::new(message)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_checklist(
    controller: &PanelController,
    view: &PanelView,
    frame: &mut Frame,
    area: Rect,
    block: Block,
) {
    let Some(tab) = view.active_tab().filter(|tab| tab.visible) else {
        let text = if view.query().is_empty() {
            "This checklist has no items."
        } else {
            "No items match your search."
        };
        frame.render_widget(Paragraph::new(Span::styled(text, label_text())).block(block), area);
        return;
    };

    let rows = controller.rows();
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let selected = index == controller.cursor;
            let item = match *row {
                Row::Category(ci) => {
                    let category = tab.categories.get(ci)?;
                    category_row(category, controller.is_open(&tab.title, &category.name))
                }
                Row::Item(ci, ii) => item_row(tab.categories.get(ci)?.items.get(ii)?),
            };
            Some(item.style(selected_item(selected)))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(controller.cursor));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn category_row(category: &CategoryView, open: bool) -> ListItem<'_> {
    let marker = if open { "▾ " } else { "▸ " };
    let count = category.visible_items().count();
    ListItem::new(Line::from(vec![
        Span::styled(marker, label_text()),
        Span::styled(category.name.as_str(), category_text()),
        Span::styled(format!(" ({count})"), label_text()),
    ]))
}

fn item_row(item: &ItemView) -> ListItem<'_> {
    let text_style = if item.checked { checked_text() } else { normal_text() };
    let checkbox = if item.checked { "  [x] " } else { "  [ ] " };

    let mut lines = Vec::with_capacity(item.lines.len().max(1));
    for (index, line) in item.lines.iter().enumerate() {
        let lead = if index == 0 { checkbox } else { "      " };
        let mut spans = vec![
            Span::styled(lead, normal_text()),
            Span::styled(line.as_str(), text_style),
        ];
        if index == 0 {
            for badge in &item.badges {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(format!("[{}]", badge.label()), badge_style(badge)));
            }
        }
        lines.push(Line::from(spans));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(checkbox, normal_text())));
    }
    ListItem::new(lines)
}

fn render_footer(controller: &PanelController, frame: &mut Frame, area: Rect) {
    if matches!(controller.mode, Mode::Search) {
        let search_text = format!("/{}", controller.search.value());
        let help_text = "ESC: clear | ENTER: keep filter";

        let available_width = area.width.saturating_sub(4);
        let help_len = help_text.len() as u16;
        let search_len = search_text.chars().count() as u16;

        let padding = if available_width > search_len + help_len + 1 {
            available_width
                .saturating_sub(search_len)
                .saturating_sub(help_len)
        } else {
            1
        };

        let footer_line = Line::from(vec![
            Span::styled(search_text, highlight_text()),
            Span::styled(format!("{:width$}", "", width = padding as usize), label_text()),
            Span::styled(help_text, label_text()),
        ]);

        let footer = Paragraph::new(footer_line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);

        let cursor_x = area.x + 2 + controller.search.cursor_pos() as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
        return;
    }

    let status = if controller.is_loading() {
        Span::styled("Loading... ", label_text())
    } else if controller.search_pending() {
        Span::styled("Filtering... ", label_text())
    } else if controller.view().is_some() {
        Span::styled("Ready ", success_text())
    } else {
        Span::raw("")
    };

    let filter = controller
        .view()
        .map(PanelView::query)
        .filter(|query| !query.is_empty())
        .map(|query| Span::styled(format!("[/{query}] "), highlight_text()));

    let refresh_hint = if controller.refresh_enabled() { "r: refresh | " } else { "" };
    let hints = format!(
        "q: quit | j/k: move | ENTER: open/check | J/K: reorder | /: search | e: export | {refresh_hint}o: options | ?: help"
    );

    let mut spans = vec![status];
    spans.extend(filter);
    spans.push(Span::styled(hints, label_text()));

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_help_popup(frame: &mut Frame) {
    let inner = render_popup_with_block(frame, "Help", 60, 70);

    let bindings = [
        ("j / k, Up / Down", "Move the selection"),
        ("h / l, Tab", "Switch checklist tab"),
        ("Enter / Space", "Open a category or toggle an item"),
        ("J / K, Shift+Up / Down", "Move the item within its category"),
        ("/", "Search content and keywords"),
        ("e", "Export the active tab as CSV"),
        ("r", "Reload the checklist"),
        ("o", "Deployment and name settings"),
        ("q", "Quit"),
    ];

    let lines: Vec<Line> = bindings
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<24}"), highlight_text()),
                Span::styled(*action, normal_text()),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
    frame.render_widget(help, inner);
}
