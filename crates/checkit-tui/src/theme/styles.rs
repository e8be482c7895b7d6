use super::colors::*;
use checkit_domain::Badge;
use ratatui::style::{Modifier, Style};

pub fn focused_border() -> Style {
    Style::default().fg(FOCUSED_BORDER)
}

pub fn unfocused_border() -> Style {
    Style::default().fg(UNFOCUSED_BORDER)
}

pub fn selected_item(focused: bool) -> Style {
    if focused {
        Style::default().bg(SELECTED_BG)
    } else {
        Style::default()
    }
}

pub fn checked_text() -> Style {
    Style::default()
        .fg(CHECKED_TEXT)
        .add_modifier(Modifier::CROSSED_OUT)
}

pub fn normal_text() -> Style {
    Style::default().fg(NORMAL_TEXT)
}

pub fn label_text() -> Style {
    Style::default().fg(LABEL_TEXT)
}

pub fn highlight_text() -> Style {
    Style::default().fg(HIGHLIGHT_TEXT)
}

pub fn category_text() -> Style {
    Style::default()
        .fg(CATEGORY_TEXT)
        .add_modifier(Modifier::BOLD)
}

pub fn active_tab() -> Style {
    Style::default()
        .fg(HIGHLIGHT_TEXT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn badge_style(badge: &Badge) -> Style {
    let color = match badge {
        Badge::New => BADGE_NEW,
        Badge::Status(_) => BADGE_STATUS,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn warning_text() -> Style {
    Style::default().fg(WARNING_COLOR)
}

pub fn error_text() -> Style {
    Style::default().fg(ERROR_COLOR).add_modifier(Modifier::BOLD)
}

pub fn success_text() -> Style {
    Style::default().fg(SUCCESS_COLOR)
}

pub fn popup_bg() -> Style {
    Style::default().bg(POPUP_BG)
}
