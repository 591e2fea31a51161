use super::ui_callback::CallbackRegistry;
use ratatui::{layout::Rect, text::Text, widgets::Widget};

pub trait InteractiveWidget: Widget {
    fn layer(&self) -> usize;
    fn before_rendering(&mut self, area: Rect, callback_registry: &mut CallbackRegistry);
    fn hover_text(&self) -> Text<'_>;
}
