mod button;
pub mod constants;
pub mod player_panel;
pub mod popup_message;
pub(crate) mod traits;
pub mod ui;
pub mod ui_callback;
pub mod ui_frame;
mod widgets;

