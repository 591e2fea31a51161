use super::{
    constants::UiStyle,
    traits::InteractiveWidget,
    ui_callback::{CallbackRegistry, UiCallback},
    widgets::default_block,
};
use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Margin, Rect},
    style::{Style, Styled, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Widget},
};

#[derive(Debug, Default, Clone)]
pub struct Button<'a> {
    text: Text<'a>,
    hotkey: Option<KeyCode>,
    on_click: UiCallback,
    disabled: bool,
    selected: bool,
    is_hovered: bool,
    disabled_text: Option<Text<'a>>,
    style: Style,
    hover_style: Style,
    block: Option<Block<'a>>,
    hover_text: Option<Text<'a>>,
    layer: usize,
}

impl<'a> Button<'a> {
    pub fn new(text: impl Into<Text<'a>>, on_click: UiCallback) -> Self {
        Self {
            text: text.into(),
            on_click,
            hover_style: UiStyle::HIGHLIGHT,
            block: Some(default_block()),
            ..Default::default()
        }
    }

    pub fn disabled(mut self, text: Option<impl Into<Text<'a>>>) -> Self {
        self.disabled = true;
        self.disabled_text = text.map(|t| t.into());
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn set_hover_text(mut self, text: impl Into<Text<'a>>) -> Self {
        self.hover_text = Some(text.into());
        self
    }

    pub fn set_hotkey(mut self, k: KeyCode) -> Self {
        self.hotkey = Some(k);
        self
    }

    pub fn set_layer(mut self, layer: usize) -> Self {
        self.layer = layer;
        self
    }

    fn inner_area(area: Rect) -> Rect {
        if area.height >= 3 {
            area.inner(Margin {
                horizontal: 1,
                vertical: 1,
            })
        } else {
            area
        }
    }
}

impl<'a> Styled for Button<'a> {
    type Item = Button<'a>;

    fn style(&self) -> Style {
        self.style
    }
    fn set_style<S: Into<Style>>(self, style: S) -> Self::Item {
        Self {
            style: style.into(),
            ..self
        }
    }
}

impl<'a> Widget for Button<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let paragraph = Paragraph::new(self.text.clone()).centered();

        let paragraph_style = if self.disabled {
            UiStyle::UNSELECTABLE
        } else if self.selected {
            UiStyle::SELECTED_BUTTON
        } else if self.is_hovered {
            self.hover_style
        } else {
            self.style
        };

        match self.block {
            Some(mut block) if area.height >= 3 => {
                block = if self.disabled {
                    block
                        .border_style(UiStyle::UNSELECTABLE)
                        .border_set(border::Set::default())
                } else if self.selected {
                    block.border_set(border::THICK)
                } else {
                    block
                };

                paragraph
                    .set_style(paragraph_style)
                    .block(block)
                    .render(area, buf);
            }
            _ => paragraph.set_style(paragraph_style).render(area, buf),
        }
    }
}

impl InteractiveWidget for Button<'_> {
    fn layer(&self) -> usize {
        self.layer
    }

    fn before_rendering(&mut self, area: Rect, callback_registry: &mut CallbackRegistry) {
        let inner = Self::inner_area(area);
        self.is_hovered = callback_registry.is_hovering(inner)
            && callback_registry.get_max_layer() == self.layer();

        if self.disabled || callback_registry.get_max_layer() != self.layer() {
            return;
        }

        callback_registry.register_mouse_callback(
            MouseEventKind::Down(MouseButton::Left),
            Some(area),
            self.on_click.clone(),
        );

        if let Some(key) = self.hotkey {
            callback_registry.register_keyboard_callback(key, self.on_click.clone());
        }
    }

    fn hover_text(&self) -> Text<'_> {
        let mut spans = vec![];
        if let Some(hover_text) = self.hover_text.as_ref() {
            spans.push(Span::raw(hover_text.to_string()));
        }

        if self.disabled {
            if let Some(disabled_text) = self.disabled_text.as_ref() {
                spans.push(Span::styled(
                    format!("  Disabled: {disabled_text}"),
                    UiStyle::ERROR,
                ));
            }
        } else if let Some(key) = self.hotkey {
            spans.push(Span::raw(format!("  [{key}]")).italic());
        }
        Line::from(spans).into()
    }
}
