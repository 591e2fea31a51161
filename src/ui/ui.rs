use super::constants::UiKey;
use super::player_panel::{PlayerPanel, PlayerSnapshot};
use super::popup_message::PopupMessage;
use super::ui_callback::{CallbackRegistry, UiCallback};
use super::ui_frame::UiFrame;
use super::widgets::screen_layout;
use crate::types::{Millis, Tick};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::Frame;

const MAX_POPUP_MESSAGES: usize = 4;

#[derive(Debug)]
pub struct Ui {
    player_panel: PlayerPanel,
    popup_messages: Vec<PopupMessage>,
    inner_registry: CallbackRegistry,
}

impl Ui {
    pub fn new(seek_step_ms: Millis) -> Self {
        Self {
            player_panel: PlayerPanel::new(seek_step_ms),
            popup_messages: vec![],
            inner_registry: CallbackRegistry::new(),
        }
    }

    pub fn push_popup(&mut self, popup_message: PopupMessage) {
        // Avoid pushing twice the same popup
        if let Some(last_popup) = self.popup_messages.last() {
            if last_popup.message() == popup_message.message() {
                return;
            }
        }

        self.popup_messages.push(popup_message);
        if self.popup_messages.len() > MAX_POPUP_MESSAGES {
            self.popup_messages.remove(0);
        }
    }

    pub fn close_popup(&mut self) {
        if !self.popup_messages.is_empty() {
            self.popup_messages.remove(0);
        }
    }

    pub fn has_popup(&self) -> bool {
        !self.popup_messages.is_empty()
    }

    pub fn update(&mut self, now: Tick) {
        self.popup_messages.retain(|popup| !popup.is_expired(now));
    }

    pub fn handle_key_events(&mut self, key_event: crossterm::event::KeyEvent) -> Option<UiCallback> {
        match key_event.code {
            // Exit application on `Ctrl-C`
            KeyCode::Char('c') | KeyCode::Char('C')
                if key_event.modifiers == KeyModifiers::CONTROL =>
            {
                Some(UiCallback::Quit)
            }
            _ if self.has_popup() => Some(UiCallback::CloseUiPopup),
            UiKey::ESC | UiKey::QUIT => Some(UiCallback::Quit),
            UiKey::RELOAD => Some(UiCallback::Reload),
            code => self.inner_registry.handle_keyboard_event(&code),
        }
    }

    pub fn handle_mouse_events(
        &mut self,
        mouse_event: crossterm::event::MouseEvent,
    ) -> Option<UiCallback> {
        self.inner_registry
            .set_hovering((mouse_event.column, mouse_event.row));
        self.inner_registry.handle_mouse_event(&mouse_event)
    }

    /// Draws the player, and the front popup on top of it.
    pub fn render(&mut self, frame: &mut Frame, snapshot: &PlayerSnapshot) {
        let [body, hover_row] = screen_layout(frame.area());
        let active_layer = usize::from(self.has_popup());
        let mut ui_frame =
            UiFrame::new(frame, hover_row, self.inner_registry.hovering(), active_layer);

        self.player_panel.render(&mut ui_frame, snapshot, body);
        if let Some(popup) = self.popup_messages.first() {
            popup.render(&mut ui_frame, body);
        }

        self.inner_registry = ui_frame.into_registry();
    }
}
