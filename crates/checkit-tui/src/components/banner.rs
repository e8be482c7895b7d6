use crate::theme::colors::{ERROR_COLOR, SUCCESS_COLOR};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerVariant {
    Error,
    Success,
}

impl BannerVariant {
    fn color(self) -> Color {
        match self {
            BannerVariant::Error => ERROR_COLOR,
            BannerVariant::Success => SUCCESS_COLOR,
        }
    }
}

/// Transient alert shown over the top of the panel.
#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub variant: BannerVariant,
    pub created_at: Instant,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, BannerVariant::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, BannerVariant::Success)
    }

    fn new(message: impl Into<String>, variant: BannerVariant) -> Self {
        Self {
            message: message.into(),
            variant,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = self.variant.color();

        // border plus one cell of padding on each side
        let box_width = (self.message.chars().count() + 4).min(area.width as usize) as u16;
        let banner_area = Rect {
            x: area.x + area.width.saturating_sub(box_width) / 2,
            y: area.y,
            width: box_width,
            height: 3.min(area.height),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let widget = Paragraph::new(self.message.as_str())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(block);

        frame.render_widget(Clear, banner_area);
        frame.render_widget(widget, banner_area);
    }
}
