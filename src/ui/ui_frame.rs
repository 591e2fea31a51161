use super::traits::InteractiveWidget;
use super::ui_callback::{CallbackRegistry, UiCallback};
use crossterm::event::{KeyCode, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::widgets::{Clear, Paragraph, Widget};
use ratatui::Frame;

/// One draw pass. Widgets register their callbacks here and the registry is
/// handed back to [`super::ui::Ui`] once the pass is over.
pub struct UiFrame<'a, 'b> {
    frame: &'a mut Frame<'b>,
    hover_row: Rect,
    registry: CallbackRegistry,
}

impl<'a, 'b> UiFrame<'a, 'b> {
    /// `pointer` is the last mouse position, `active_layer` the only layer
    /// whose widgets react to input during this pass.
    pub fn new(
        frame: &'a mut Frame<'b>,
        hover_row: Rect,
        pointer: (u16, u16),
        active_layer: usize,
    ) -> Self {
        let mut registry = CallbackRegistry::new();
        registry.set_hovering(pointer);
        registry.set_max_layer(active_layer);
        Self {
            frame,
            hover_row,
            registry,
        }
    }

    pub fn active_layer(&self) -> usize {
        self.registry.get_max_layer()
    }

    pub fn register_mouse_callback(
        &mut self,
        event_kind: MouseEventKind,
        rect: Option<Rect>,
        callback: UiCallback,
    ) {
        if self.active_layer() == 0 {
            self.registry
                .register_mouse_callback(event_kind, rect, callback);
        }
    }

    pub fn register_keyboard_callback(&mut self, key_code: KeyCode, callback: UiCallback) {
        if self.active_layer() == 0 {
            self.registry.register_keyboard_callback(key_code, callback);
        }
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.frame.render_widget(widget, area);
    }

    /// Renders `widget` and, when the pointer rests on it, its hover text.
    pub fn render_interactive<W: InteractiveWidget>(&mut self, mut widget: W, area: Rect) {
        widget.before_rendering(area, &mut self.registry);
        let pointed_at =
            widget.layer() == self.active_layer() && self.registry.is_hovering(area);
        if pointed_at {
            self.frame.render_widget(Clear, self.hover_row);
            self.frame
                .render_widget(Paragraph::new(widget.hover_text()).centered(), self.hover_row);
        }
        self.frame.render_widget(widget, area);
    }

    pub fn into_registry(self) -> CallbackRegistry {
        self.registry
    }
}
