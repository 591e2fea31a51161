use crate::app::App;
use crate::audio::AudioEngine;
use crate::types::AppResult;
use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};
use log::info;
use ratatui::layout::Rect;
use std::collections::HashMap;

/// User intents emitted by the presentation layer.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum UiCallback {
    #[default]
    None,
    TogglePlayback,
    Stop,
    Seek {
        fraction: f64,
    },
    Reload,
    CloseUiPopup,
    Quit,
}

impl UiCallback {
    pub async fn call<E: AudioEngine>(&self, app: &mut App<E>) -> AppResult<Option<String>> {
        match self {
            UiCallback::None => Ok(None),
            UiCallback::TogglePlayback => {
                app.player.toggle().await?;
                Ok(None)
            }
            UiCallback::Stop => {
                app.player.stop().await?;
                Ok(None)
            }
            UiCallback::Seek { fraction } => {
                app.player.seek(*fraction).await?;
                Ok(None)
            }
            UiCallback::Reload => {
                info!("Reloading {}", app.player.source().display());
                app.player.initialize().await?;
                Ok(Some("Track reloaded".to_string()))
            }
            UiCallback::CloseUiPopup => {
                app.ui.close_popup();
                Ok(None)
            }
            UiCallback::Quit => {
                app.quit();
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CallbackRegistry {
    mouse_callbacks: HashMap<MouseEventKind, HashMap<Option<Rect>, UiCallback>>,
    keyboard_callbacks: HashMap<KeyCode, UiCallback>,
    hovering: (u16, u16),
    max_layer: usize,
}

impl CallbackRegistry {
    fn contains(rect: &Rect, x: u16, y: u16) -> bool {
        rect.x <= x && x < rect.x + rect.width && rect.y <= y && y < rect.y + rect.height
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max_layer(&mut self, layer: usize) {
        self.max_layer = layer;
    }

    pub fn get_max_layer(&self) -> usize {
        self.max_layer
    }

    pub fn register_mouse_callback(
        &mut self,
        event_kind: MouseEventKind,
        rect: Option<Rect>,
        callback: UiCallback,
    ) {
        self.mouse_callbacks
            .entry(event_kind)
            .or_default()
            .insert(rect, callback);
    }

    pub fn register_keyboard_callback(&mut self, key_code: KeyCode, callback: UiCallback) {
        self.keyboard_callbacks.insert(key_code, callback);
    }

    pub fn is_hovering(&self, rect: Rect) -> bool {
        Self::contains(&rect, self.hovering.0, self.hovering.1)
    }

    pub fn hovering(&self) -> (u16, u16) {
        self.hovering
    }

    pub fn set_hovering(&mut self, position: (u16, u16)) {
        self.hovering = position;
    }

    pub fn handle_mouse_event(&self, event: &MouseEvent) -> Option<UiCallback> {
        let mouse_callbacks = self.mouse_callbacks.get(&event.kind)?;
        for (rect, callback) in mouse_callbacks.iter() {
            if let Some(r) = rect {
                if Self::contains(r, event.column, event.row) {
                    return Some(callback.clone());
                }
            } else {
                // Callbacks with no rect are global callbacks.
                return Some(callback.clone());
            }
        }
        None
    }

    pub fn handle_keyboard_event(&self, key_code: &KeyCode) -> Option<UiCallback> {
        self.keyboard_callbacks.get(key_code).cloned()
    }
}
