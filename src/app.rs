use crate::audio::controller::PlaybackController;
use crate::audio::{AudioEngine, StatusNotification};
use crate::crossterm_event_handler::start_event_handler;
use crate::store::PlayerConfig;
use crate::tick_event_handler::start_tick_event_loop;
use crate::tui::{TerminalEvent, Tui};
use crate::types::{AppResult, Millis, Tick, MILLIS_PER_SECOND};
use crate::ui::player_panel::PlayerSnapshot;
use crate::ui::popup_message::PopupMessage;
use crate::ui::ui::Ui;
use crate::ui::ui_callback::UiCallback;
use log::{error, info};
use ratatui::backend::Backend;
use tokio::select;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    Tick(Tick),
    TerminalEvent(TerminalEvent),
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Started,
    Quitting,
}

enum LoopEvent {
    App(AppEvent),
    Status(StatusNotification),
}

#[derive(Debug)]
pub struct App<E: AudioEngine> {
    pub player: PlaybackController<E>,
    pub ui: Ui,
    state: AppState,
    target_fps: u8,
    pending_start_at: Option<Millis>,
    status_receiver: mpsc::UnboundedReceiver<StatusNotification>,
}

impl<E: AudioEngine> App<E> {
    pub fn new(engine: E, config: PlayerConfig) -> Self {
        let (status_sender, status_receiver) = mpsc::unbounded_channel();
        Self {
            player: PlaybackController::new(engine, config.source, status_sender),
            // Config files bypass the CLI range check.
            ui: Ui::new(config.seek_step_seconds.saturating_mul(MILLIS_PER_SECOND)),
            state: AppState::Started,
            target_fps: config.target_fps,
            pending_start_at: None,
            status_receiver,
        }
    }

    /// Loads the configured track. Failures end up in a popup, the app keeps running.
    pub async fn initialize_player(&mut self, start_at: Option<Millis>) {
        self.pending_start_at = start_at;
        if let Err(e) = self.player.initialize().await {
            self.ui.push_popup(PopupMessage::error(e.to_string()));
            return;
        }
        self.update_player().await;
    }

    pub fn drain_status_notifications(&mut self) {
        while let Ok(notification) = self.status_receiver.try_recv() {
            self.player.on_status_notification(notification);
        }
    }

    /// Applies queued notifications and the start offset once the duration is known.
    pub async fn update_player(&mut self) {
        self.drain_status_notifications();

        let duration_ms = self.player.view_state().duration_ms;
        if duration_ms == 0 || !self.player.has_handle() {
            return;
        }
        if let Some(start_at) = self.pending_start_at.take() {
            info!("Starting at {start_at}ms");
            let fraction = (start_at as f64 / duration_ms as f64).clamp(0.0, 1.0);
            self.handle_callback(UiCallback::Seek { fraction }).await;
        }
    }

    pub fn is_quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    pub fn quit(&mut self) {
        self.player.teardown();
        self.state = AppState::Quitting;
    }

    async fn handle_callback(&mut self, callback: UiCallback) {
        match callback.call(self).await {
            Ok(Some(text)) => self.ui.push_popup(PopupMessage::ok(text)),
            Ok(None) => {}
            Err(e) => {
                error!("{e}");
                self.ui.push_popup(PopupMessage::error(e.to_string()));
            }
        }
    }

    pub fn handle_tick_events(&mut self, current_tick: Tick) {
        self.ui.update(current_tick);
    }

    pub async fn handle_key_events(&mut self, key_event: crossterm::event::KeyEvent) {
        if let Some(callback) = self.ui.handle_key_events(key_event) {
            self.handle_callback(callback).await;
        }
    }

    pub async fn handle_mouse_events(&mut self, mouse_event: crossterm::event::MouseEvent) {
        if let Some(callback) = self.ui.handle_mouse_events(mouse_event) {
            self.handle_callback(callback).await;
        }
    }

    fn draw<B: Backend>(&mut self, tui: &mut Tui<B>) {
        let snapshot = PlayerSnapshot::new(&self.player);
        if let Err(e) = tui.draw(&mut self.ui, &snapshot) {
            error!("Drawing error: {e}");
        }
    }

    pub async fn run<B: Backend>(&mut self, mut tui: Tui<B>) -> AppResult<()> {
        let cancellation_token = CancellationToken::new();
        let (event_sender, mut event_receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        start_event_handler(event_sender.clone(), cancellation_token.clone());
        start_tick_event_loop(self.target_fps, event_sender, cancellation_token.clone());

        self.draw(&mut tui);
        while !self.is_quitting() {
            let event = select! {
                Some(notification) = self.status_receiver.recv() => LoopEvent::Status(notification),
                Some(app_event) = event_receiver.recv() => LoopEvent::App(app_event),
                else => break,
            };

            match event {
                LoopEvent::Status(notification) => {
                    self.player.on_status_notification(notification);
                    self.update_player().await;
                }
                LoopEvent::App(AppEvent::Tick(tick)) => {
                    self.handle_tick_events(tick);
                    self.draw(&mut tui);
                }
                LoopEvent::App(AppEvent::TerminalEvent(terminal_event)) => match terminal_event {
                    TerminalEvent::Key(key_event) => {
                        self.handle_key_events(key_event).await;
                        self.draw(&mut tui);
                    }
                    TerminalEvent::Mouse(mouse_event) => {
                        self.handle_mouse_events(mouse_event).await;
                        self.draw(&mut tui);
                    }
                    TerminalEvent::Resize(w, h) => tui.resize((w, h))?,
                },
            }
        }

        info!("Player loop closed");
        cancellation_token.cancel();
        tui.exit()?;
        Ok(())
    }
}
