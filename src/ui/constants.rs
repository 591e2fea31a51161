use crossterm::event::KeyCode;
use ratatui::style::{Color, Style};

pub const UI_SCREEN_SIZE: (u16, u16) = (64, 14);

pub const BUTTON_WIDTH: u16 = 14;
pub const TIME_LABEL_WIDTH: u16 = 7;

#[derive(Debug, Clone, Copy)]
pub struct UiKey;

impl UiKey {
    pub const ESC: KeyCode = KeyCode::Esc;
    pub const QUIT: KeyCode = KeyCode::Char('q');
    pub const TOGGLE_PLAYBACK: KeyCode = KeyCode::Char(' ');
    pub const STOP: KeyCode = KeyCode::Char('s');
    pub const SEEK_BACK: KeyCode = KeyCode::Left;
    pub const SEEK_FORWARD: KeyCode = KeyCode::Right;
    pub const RELOAD: KeyCode = KeyCode::Char('r');
}

const DEFAULT_STYLE: Style = Style::new().fg(Color::White);

#[derive(Debug, Clone, Copy)]
pub struct UiStyle;

impl UiStyle {
    pub const DEFAULT: Style = DEFAULT_STYLE;
    pub const SELECTED_BUTTON: Style = DEFAULT_STYLE.fg(Color::Rgb(118, 213, 192));
    pub const UNSELECTABLE: Style = DEFAULT_STYLE.fg(Color::DarkGray);
    pub const ERROR: Style = DEFAULT_STYLE.fg(Color::Red);
    pub const HEADER: Style = DEFAULT_STYLE.fg(Color::LightBlue);
    pub const HIGHLIGHT: Style = DEFAULT_STYLE.fg(Color::Rgb(118, 213, 192));
    pub const OK: Style = DEFAULT_STYLE.fg(Color::Green);
    pub const WARNING: Style = DEFAULT_STYLE.fg(Color::Yellow);
    pub const PROGRESS: Style = DEFAULT_STYLE.fg(Color::Rgb(0, 122, 255));
    pub const PROGRESS_TRACK: Style = DEFAULT_STYLE.fg(Color::DarkGray);
}
