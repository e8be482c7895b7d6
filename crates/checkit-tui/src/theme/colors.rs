use ratatui::style::Color;

pub const FOCUSED_BORDER: Color = Color::Cyan;
pub const UNFOCUSED_BORDER: Color = Color::White;
pub const SELECTED_BG: Color = Color::Blue;

pub const CHECKED_TEXT: Color = Color::DarkGray;
pub const NORMAL_TEXT: Color = Color::White;
pub const LABEL_TEXT: Color = Color::DarkGray;
pub const HIGHLIGHT_TEXT: Color = Color::Yellow;
pub const CATEGORY_TEXT: Color = Color::LightCyan;

pub const BADGE_NEW: Color = Color::Green;
pub const BADGE_STATUS: Color = Color::LightRed;

pub const WARNING_COLOR: Color = Color::Yellow;
pub const ERROR_COLOR: Color = Color::Red;
pub const SUCCESS_COLOR: Color = Color::Green;

pub const POPUP_BG: Color = Color::Black;
