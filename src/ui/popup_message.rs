use super::button::Button;
use super::constants::UiStyle;
use super::ui_callback::UiCallback;
use super::ui_frame::UiFrame;
use super::widgets::{default_block, popup_rect};
use crate::types::{SystemTimeTick, Tick};
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::widgets::{Clear, Paragraph, Wrap};
use strum_macros::Display;

const OK_POPUP_LIFETIME_MILLIS: Tick = 3_000;

#[derive(Debug, Display, Clone, PartialEq)]
pub enum PopupMessage {
    Error { message: String },
    Ok { message: String, tick: Tick },
}

impl PopupMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::Ok {
            message: message.into(),
            tick: Tick::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Error { message } | Self::Ok { message, .. } => message,
        }
    }

    /// Info popups close on their own, errors wait for the user.
    pub fn is_expired(&self, now: Tick) -> bool {
        match self {
            Self::Error { .. } => false,
            Self::Ok { tick, .. } => now.saturating_sub(*tick) > OK_POPUP_LIFETIME_MILLIS,
        }
    }

    pub fn render(&self, frame: &mut UiFrame, area: Rect) {
        let rect = popup_rect(area);
        let (title, border_style) = match self {
            Self::Error { .. } => (" Error ", UiStyle::ERROR),
            Self::Ok { .. } => (" Message ", UiStyle::OK),
        };

        frame.render_widget(Clear, rect);
        frame.render_widget(
            default_block().title(title).border_style(border_style),
            rect,
        );

        let split = Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).split(
            rect.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
        );

        frame.render_widget(
            Paragraph::new(self.message().to_string())
                .centered()
                .wrap(Wrap { trim: true }),
            split[0],
        );

        let button = Button::new("Close", UiCallback::CloseUiPopup)
            .set_hover_text("Close the popup")
            .set_layer(1);
        frame.render_interactive(
            button,
            split[1].inner(Margin {
                vertical: 0,
                horizontal: 14,
            }),
        );
    }
}
