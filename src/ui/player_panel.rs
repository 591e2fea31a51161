use super::button::Button;
use super::constants::{UiKey, UiStyle, BUTTON_WIDTH, TIME_LABEL_WIDTH};
use super::ui_callback::UiCallback;
use super::ui_frame::UiFrame;
use super::widgets::default_block;
use crate::audio::controller::{PlaybackController, PlaybackViewState};
use crate::audio::{AudioEngine, PlayerPhase};
use crate::types::{format_time, Millis};
use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use itertools::Itertools;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const PROGRESS_FILLED: &str = "━";
const PROGRESS_EMPTY: &str = "─";

/// Everything the panel needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub view: PlaybackViewState,
    pub phase: PlayerPhase,
    pub track_name: String,
}

impl PlayerSnapshot {
    pub fn new<E: AudioEngine>(player: &PlaybackController<E>) -> Self {
        let track_name = player
            .source()
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| player.source().display().to_string());

        Self {
            view: player.view_state(),
            phase: player.phase(),
            track_name,
        }
    }

    pub fn transport_enabled(&self) -> bool {
        matches!(
            self.phase,
            PlayerPhase::Ready | PlayerPhase::Playing | PlayerPhase::Paused
        )
    }
}

/// Seek request `step_ms` away from the current position, kept inside the track.
pub fn relative_seek(view: &PlaybackViewState, step_ms: Millis, forward: bool) -> UiCallback {
    if view.duration_ms == 0 {
        return UiCallback::None;
    }
    let target = if forward {
        view.position_ms.saturating_add(step_ms)
    } else {
        view.position_ms.saturating_sub(step_ms)
    };
    UiCallback::Seek {
        fraction: target.min(view.duration_ms) as f64 / view.duration_ms as f64,
    }
}

pub fn progress_bar_line(progress: f64, width: u16) -> Line<'static> {
    let filled = (progress.clamp(0.0, 1.0) * width as f64).round() as usize;
    let empty = (width as usize).saturating_sub(filled);
    Line::from(vec![
        Span::styled(PROGRESS_FILLED.repeat(filled), UiStyle::PROGRESS),
        Span::styled(PROGRESS_EMPTY.repeat(empty), UiStyle::PROGRESS_TRACK),
    ])
}

#[derive(Debug)]
pub struct PlayerPanel {
    seek_step_ms: Millis,
}

impl PlayerPanel {
    pub fn new(seek_step_ms: Millis) -> Self {
        Self { seek_step_ms }
    }

    fn render_controls(&self, frame: &mut UiFrame, snapshot: &PlayerSnapshot, area: Rect) {
        let [play_area, stop_area] =
            Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 2])
                .flex(Flex::Center)
                .spacing(2)
                .areas(area);

        let (label, hover) = if snapshot.view.is_playing {
            ("⏸ Pause", "Pause playback")
        } else {
            ("▶ Play", "Start playback")
        };
        let mut play_button = Button::new(label, UiCallback::TogglePlayback)
            .set_hotkey(UiKey::TOGGLE_PLAYBACK)
            .set_hover_text(hover);
        let mut stop_button = Button::new("■ Stop", UiCallback::Stop)
            .set_hotkey(UiKey::STOP)
            .set_hover_text("Stop and rewind");

        if snapshot.transport_enabled() {
            if snapshot.view.is_playing {
                play_button = play_button.selected();
            }
        } else {
            let reason = match snapshot.phase {
                PlayerPhase::Loading => "Loading audio",
                _ => "No audio loaded",
            };
            play_button = play_button.disabled(Some(reason));
            stop_button = stop_button.disabled(Some(reason));
        }

        frame.render_interactive(play_button, play_area);
        frame.render_interactive(stop_button, stop_area);
    }

    fn render_progress(&self, frame: &mut UiFrame, snapshot: &PlayerSnapshot, area: Rect) {
        let [elapsed_area, bar_area, total_area] = Layout::horizontal([
            Constraint::Length(TIME_LABEL_WIDTH),
            Constraint::Min(1),
            Constraint::Length(TIME_LABEL_WIDTH),
        ])
        .areas(area);

        let view = &snapshot.view;
        frame.render_widget(
            Paragraph::new(format_time(view.position_ms)).centered(),
            elapsed_area,
        );
        frame.render_widget(progress_bar_line(view.progress(), bar_area.width), bar_area);
        frame.render_widget(
            Paragraph::new(format_time(view.duration_ms)).centered(),
            total_area,
        );

        if !snapshot.transport_enabled() || view.duration_ms == 0 {
            return;
        }

        let last_column = bar_area.width.saturating_sub(1).max(1) as f64;
        for column in 0..bar_area.width {
            frame.register_mouse_callback(
                MouseEventKind::Down(MouseButton::Left),
                Some(Rect::new(bar_area.x + column, bar_area.y, 1, 1)),
                UiCallback::Seek {
                    fraction: column as f64 / last_column,
                },
            );
        }

        for digit in 0..10u8 {
            frame.register_keyboard_callback(
                KeyCode::Char((b'0' + digit) as char),
                UiCallback::Seek {
                    fraction: digit as f64 / 10.0,
                },
            );
        }

        frame.register_keyboard_callback(
            UiKey::SEEK_BACK,
            relative_seek(view, self.seek_step_ms, false),
        );
        frame.register_keyboard_callback(
            UiKey::SEEK_FORWARD,
            relative_seek(view, self.seek_step_ms, true),
        );
    }

    fn status_line(snapshot: &PlayerSnapshot) -> Line<'static> {
        if snapshot.view.is_buffering {
            return Line::styled("Buffering...", UiStyle::WARNING);
        }
        match snapshot.phase {
            PlayerPhase::Unloaded | PlayerPhase::Released => {
                Line::styled("Audio unavailable", UiStyle::ERROR)
            }
            phase => Line::styled(phase.to_string(), UiStyle::UNSELECTABLE),
        }
    }

    fn footer_line(&self) -> Line<'static> {
        let hints = [
            ("space", "Play/Pause"),
            ("s", "Stop"),
            ("←→", "Seek"),
            ("r", "Reload"),
            ("q", "Quit"),
        ];
        let styles = [Style::default().reversed(), UiStyle::UNSELECTABLE];
        Line::from(
            hints
                .iter()
                .flat_map(|(key, action)| [format!(" {key} "), format!(" {action} ")])
                .enumerate()
                .map(|(idx, content)| Span::styled(content, styles[idx % 2]))
                .collect_vec(),
        )
        .centered()
    }

    pub fn render(&self, frame: &mut UiFrame, snapshot: &PlayerSnapshot, area: Rect) {
        frame.render_widget(
            default_block()
                .title(" Media Player ")
                .title_style(UiStyle::HEADER),
            area,
        );

        let split = Layout::vertical([
            Constraint::Length(1), // track name
            Constraint::Length(3), // buttons
            Constraint::Length(1), // spacer
            Constraint::Length(1), // progress
            Constraint::Length(1), // buffering/status
            Constraint::Min(0),
            Constraint::Length(1), // footer
        ])
        .split(area.inner(Margin {
            horizontal: 1,
            vertical: 1,
        }));

        frame.render_widget(
            Paragraph::new(snapshot.track_name.clone()).centered().bold(),
            split[0],
        );
        self.render_controls(frame, snapshot, split[1]);
        self.render_progress(
            frame,
            snapshot,
            split[3].inner(Margin {
                horizontal: 1,
                vertical: 0,
            }),
        );
        frame.render_widget(Paragraph::new(Self::status_line(snapshot)).centered(), split[4]);
        frame.render_widget(self.footer_line(), split[6]);
    }
}
