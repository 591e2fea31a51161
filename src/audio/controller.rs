use super::{
    AudioEngine, LoadOptions, PlayerHandle, PlayerPhase, PlayerResult, StatusCallback,
    StatusNotification,
};
use crate::types::{HandleId, Millis};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

/// UI-facing projection of the engine state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackViewState {
    pub is_playing: bool,
    pub is_buffering: bool,
    pub position_ms: Millis,
    pub duration_ms: Millis,
}

impl PlaybackViewState {
    /// Fill fraction of the progress bar. Zero while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct PlaybackController<E: AudioEngine> {
    engine: E,
    source: PathBuf,
    handle: Option<E::Handle>,
    handle_id: HandleId,
    phase: PlayerPhase,
    view: PlaybackViewState,
    notifications: mpsc::UnboundedSender<StatusNotification>,
}

impl<E: AudioEngine> PlaybackController<E> {
    pub fn new(
        engine: E,
        source: impl Into<PathBuf>,
        notifications: mpsc::UnboundedSender<StatusNotification>,
    ) -> Self {
        Self {
            engine,
            source: source.into(),
            handle: None,
            handle_id: 0,
            phase: PlayerPhase::Unloaded,
            view: PlaybackViewState::default(),
            notifications,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn view_state(&self) -> PlaybackViewState {
        self.view
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Loads the source without autoplay, replacing any handle already open.
    pub async fn initialize(&mut self) -> PlayerResult<()> {
        self.teardown();

        self.handle_id += 1;
        let handle_id = self.handle_id;
        self.phase = PlayerPhase::Loading;
        self.view = PlaybackViewState::default();

        let sender = self.notifications.clone();
        let notify: StatusCallback = Arc::new(move |status| {
            // The receiver is gone only when the app is shutting down.
            let _ = sender.send(StatusNotification { handle_id, status });
        });

        info!("Loading audio source {}", self.source.display());
        match self
            .engine
            .load(&self.source, LoadOptions { autoplay: false }, notify)
            .await
        {
            Ok(handle) => {
                self.handle = Some(handle);
                self.phase = PlayerPhase::Ready;
                info!("Audio source loaded (handle {handle_id})");
                Ok(())
            }
            Err(e) => {
                self.phase = PlayerPhase::Unloaded;
                error!("{e}");
                Err(e)
            }
        }
    }

    pub async fn play(&mut self) -> PlayerResult<()> {
        let Some(handle) = self.handle.as_mut() else {
            debug!("Play ignored: no audio loaded");
            return Ok(());
        };

        handle.play().await.inspect_err(|e| error!("Play failed: {e}"))?;
        self.view.is_playing = true;
        self.phase = PlayerPhase::Playing;
        Ok(())
    }

    pub async fn pause(&mut self) -> PlayerResult<()> {
        let Some(handle) = self.handle.as_mut() else {
            debug!("Pause ignored: no audio loaded");
            return Ok(());
        };

        handle.pause().await.inspect_err(|e| error!("Pause failed: {e}"))?;
        self.view.is_playing = false;
        self.phase = PlayerPhase::Paused;
        Ok(())
    }

    pub async fn toggle(&mut self) -> PlayerResult<()> {
        if self.view.is_playing {
            self.pause().await
        } else {
            self.play().await
        }
    }

    /// Stops and rewinds. The position is reset locally so the view does not
    /// show the old offset until the next notification arrives.
    pub async fn stop(&mut self) -> PlayerResult<()> {
        let Some(handle) = self.handle.as_mut() else {
            debug!("Stop ignored: no audio loaded");
            return Ok(());
        };

        handle.stop().await.inspect_err(|e| error!("Stop failed: {e}"))?;
        handle
            .seek_to(0)
            .await
            .inspect_err(|e| error!("Rewind after stop failed: {e}"))?;
        self.view.is_playing = false;
        self.view.position_ms = 0;
        self.phase = PlayerPhase::Ready;
        Ok(())
    }

    /// Seeks to `fraction` of the track. Callers keep `fraction` in `[0, 1]`.
    pub async fn seek(&mut self, fraction: f64) -> PlayerResult<()> {
        let Some(handle) = self.handle.as_mut() else {
            debug!("Seek ignored: no audio loaded");
            return Ok(());
        };
        if self.view.duration_ms == 0 {
            debug!("Seek ignored: duration unknown");
            return Ok(());
        }

        let target = (fraction * self.view.duration_ms as f64).round() as Millis;
        handle
            .seek_to(target)
            .await
            .inspect_err(|e| error!("Seek to {target}ms failed: {e}"))
    }

    pub fn on_status_notification(&mut self, notification: StatusNotification) {
        if self.handle.is_none() || notification.handle_id != self.handle_id {
            debug!(
                "Dropping status from stale handle {}",
                notification.handle_id
            );
            return;
        }

        let status = notification.status;
        self.view.is_buffering = status.is_buffering;
        self.view.duration_ms = status.duration_ms;
        self.view.position_ms = if status.duration_ms > 0 {
            status.position_ms.min(status.duration_ms)
        } else {
            status.position_ms
        };

        if status.did_just_finish {
            info!("Track finished");
            self.view.is_playing = false;
            self.phase = PlayerPhase::Ready;
        }
    }

    /// Releases the current handle. Safe to call any number of times.
    pub fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
            info!("Audio handle {} released", self.handle_id);
            self.phase = PlayerPhase::Released;
        } else if self.phase == PlayerPhase::Loading {
            warn!("Teardown while loading, nothing to release");
            self.phase = PlayerPhase::Unloaded;
        }
        self.view.is_playing = false;
    }
}

impl<E: AudioEngine> Drop for PlaybackController<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::{PlaybackController, PlaybackViewState};
    use crate::audio::{
        AudioEngine, LoadOptions, PlaybackStatus, PlayerError, PlayerHandle, PlayerPhase,
        PlayerResult, StatusCallback, StatusNotification,
    };
    use crate::types::Millis;
    use std::future::Future;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Call {
        Load { autoplay: bool },
        Play,
        Pause,
        Stop,
        SeekTo(Millis),
        Release,
    }

    /// In-memory engine recording every call it receives.
    #[derive(Default, Clone)]
    pub struct ScriptedEngine {
        pub calls: Arc<Mutex<Vec<Call>>>,
        pub notify: Arc<Mutex<Option<StatusCallback>>>,
        pub fail_load: bool,
        pub reject: Option<Call>,
    }

    impl ScriptedEngine {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        /// Pushes a status the way the engine thread would.
        pub fn emit(&self, status: PlaybackStatus) {
            if let Some(notify) = self.notify.lock().unwrap().as_ref() {
                notify(status);
            }
        }
    }

    impl std::fmt::Debug for ScriptedEngine {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ScriptedEngine")
                .field("calls", &self.calls())
                .finish()
        }
    }

    #[derive(Debug)]
    pub struct ScriptedHandle {
        calls: Arc<Mutex<Vec<Call>>>,
        reject: Option<Call>,
        released: bool,
    }

    impl ScriptedHandle {
        fn record(&self, call: Call) -> PlayerResult<()> {
            self.calls.lock().unwrap().push(call);
            let rejected = match (self.reject, call) {
                (Some(Call::SeekTo(_)), Call::SeekTo(_)) => true,
                (Some(r), c) => r == c,
                (None, _) => false,
            };
            if rejected {
                Err(PlayerError::Engine(format!("{call:?} rejected")))
            } else {
                Ok(())
            }
        }
    }

    impl PlayerHandle for ScriptedHandle {
        fn play(&mut self) -> impl Future<Output = PlayerResult<()>> + Send {
            let result = self.record(Call::Play);
            async move { result }
        }

        fn pause(&mut self) -> impl Future<Output = PlayerResult<()>> + Send {
            let result = self.record(Call::Pause);
            async move { result }
        }

        fn stop(&mut self) -> impl Future<Output = PlayerResult<()>> + Send {
            let result = self.record(Call::Stop);
            async move { result }
        }

        fn seek_to(&mut self, position_ms: Millis) -> impl Future<Output = PlayerResult<()>> + Send {
            let result = self.record(Call::SeekTo(position_ms));
            async move { result }
        }

        fn release(&mut self) {
            if !self.released {
                self.released = true;
                self.calls.lock().unwrap().push(Call::Release);
            }
        }
    }

    impl AudioEngine for ScriptedEngine {
        type Handle = ScriptedHandle;

        fn load(
            &mut self,
            _source: &Path,
            options: LoadOptions,
            notify: StatusCallback,
        ) -> impl Future<Output = PlayerResult<Self::Handle>> + Send {
            self.calls.lock().unwrap().push(Call::Load {
                autoplay: options.autoplay,
            });
            let result = if self.fail_load {
                Err(PlayerError::Load("sample.mp3 not found".into()))
            } else {
                *self.notify.lock().unwrap() = Some(notify);
                Ok(ScriptedHandle {
                    calls: self.calls.clone(),
                    reject: self.reject,
                    released: false,
                })
            };
            async move { result }
        }
    }

    pub fn controller(
        engine: &ScriptedEngine,
    ) -> (
        PlaybackController<ScriptedEngine>,
        mpsc::UnboundedReceiver<StatusNotification>,
    ) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            PlaybackController::new(engine.clone(), "assets/sample.mp3", sender),
            receiver,
        )
    }

    fn status(position_ms: Millis, duration_ms: Millis) -> PlaybackStatus {
        PlaybackStatus {
            is_buffering: false,
            position_ms,
            duration_ms,
            did_just_finish: false,
        }
    }

    async fn deliver(
        controller: &mut PlaybackController<ScriptedEngine>,
        receiver: &mut mpsc::UnboundedReceiver<StatusNotification>,
    ) {
        while let Ok(notification) = receiver.try_recv() {
            controller.on_status_notification(notification);
        }
    }

    #[test]
    fn test_progress_guards_unknown_duration() {
        let mut view = PlaybackViewState {
            position_ms: 5_000,
            ..Default::default()
        };
        assert_eq!(view.progress(), 0.0);

        view.duration_ms = 20_000;
        assert_eq!(view.progress(), 0.25);

        view.position_ms = 40_000;
        assert_eq!(view.progress(), 1.0);
    }

    #[tokio::test]
    async fn test_initialize_loads_without_autoplay() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, _receiver) = controller(&engine);

        assert_eq!(controller.phase(), PlayerPhase::Unloaded);
        controller.initialize().await?;

        assert!(controller.has_handle());
        assert_eq!(controller.phase(), PlayerPhase::Ready);
        assert_eq!(engine.calls(), vec![Call::Load { autoplay: false }]);
        Ok(())
    }

    #[tokio::test]
    async fn test_play_then_notification() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;

        engine.emit(status(0, 180_000));
        deliver(&mut controller, &mut receiver).await;
        assert_eq!(controller.view_state().duration_ms, 180_000);

        controller.play().await?;
        engine.emit(status(90_000, 180_000));
        deliver(&mut controller, &mut receiver).await;

        let view = controller.view_state();
        assert_eq!(
            view,
            PlaybackViewState {
                is_playing: true,
                is_buffering: false,
                position_ms: 90_000,
                duration_ms: 180_000,
            }
        );
        assert_eq!(view.progress(), 0.5);
        assert_eq!(crate::types::format_time(view.position_ms), "1:30");
        assert_eq!(controller.phase(), PlayerPhase::Playing);
        Ok(())
    }

    #[tokio::test]
    async fn test_pause_and_toggle() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, _receiver) = controller(&engine);
        controller.initialize().await?;

        controller.toggle().await?;
        assert!(controller.view_state().is_playing);
        controller.toggle().await?;
        assert!(!controller.view_state().is_playing);
        assert_eq!(controller.phase(), PlayerPhase::Paused);

        assert_eq!(
            engine.calls(),
            vec![Call::Load { autoplay: false }, Call::Play, Call::Pause]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_stop_resets_position_immediately() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;
        controller.play().await?;
        engine.emit(status(42_000, 100_000));
        deliver(&mut controller, &mut receiver).await;

        controller.stop().await?;

        let view = controller.view_state();
        assert!(!view.is_playing);
        assert_eq!(view.position_ms, 0);
        assert_eq!(view.duration_ms, 100_000);
        assert_eq!(controller.phase(), PlayerPhase::Ready);
        assert_eq!(
            engine.calls()[2..],
            [Call::Stop, Call::SeekTo(0)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_stop_resets_position_from_paused_and_ready() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;

        controller.play().await?;
        controller.pause().await?;
        engine.emit(status(42_000, 100_000));
        deliver(&mut controller, &mut receiver).await;
        assert_eq!(controller.phase(), PlayerPhase::Paused);

        controller.stop().await?;
        assert!(!controller.view_state().is_playing);
        assert_eq!(controller.view_state().position_ms, 0);
        assert_eq!(controller.phase(), PlayerPhase::Ready);

        // Stopping again from Ready still rewinds and keeps the view reset.
        engine.emit(status(7_000, 100_000));
        deliver(&mut controller, &mut receiver).await;
        controller.stop().await?;
        assert!(!controller.view_state().is_playing);
        assert_eq!(controller.view_state().position_ms, 0);
        assert_eq!(controller.phase(), PlayerPhase::Ready);

        assert_eq!(
            engine.calls()[3..],
            [Call::Stop, Call::SeekTo(0), Call::Stop, Call::SeekTo(0)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_seek_targets_fraction_of_duration() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;
        engine.emit(status(0, 200_000));
        deliver(&mut controller, &mut receiver).await;

        controller.seek(0.25).await?;

        assert_eq!(engine.calls().last(), Some(&Call::SeekTo(50_000)));
        Ok(())
    }

    #[tokio::test]
    async fn test_seek_ignored_while_duration_unknown() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, _receiver) = controller(&engine);
        controller.initialize().await?;

        controller.seek(0.5).await?;

        assert_eq!(engine.calls(), vec![Call::Load { autoplay: false }]);
        Ok(())
    }

    #[tokio::test]
    async fn test_commands_without_handle_are_noops() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, _receiver) = controller(&engine);
        let before = controller.view_state();

        controller.play().await?;
        controller.pause().await?;
        controller.stop().await?;
        controller.seek(0.3).await?;

        assert_eq!(controller.view_state(), before);
        assert!(engine.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_error_leaves_controller_unloaded() -> PlayerResult<()> {
        let engine = ScriptedEngine {
            fail_load: true,
            ..Default::default()
        };
        let (mut controller, _receiver) = controller(&engine);

        let result = controller.initialize().await;
        assert!(matches!(result, Err(PlayerError::Load(_))));
        assert!(!controller.has_handle());
        assert_eq!(controller.phase(), PlayerPhase::Unloaded);

        let before = controller.view_state();
        controller.play().await?;
        controller.stop().await?;
        assert_eq!(controller.view_state(), before);
        assert_eq!(engine.calls(), vec![Call::Load { autoplay: false }]);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_command_keeps_state() -> PlayerResult<()> {
        let engine = ScriptedEngine {
            reject: Some(Call::Play),
            ..Default::default()
        };
        let (mut controller, _receiver) = controller(&engine);
        controller.initialize().await?;

        let result = controller.play().await;
        assert!(matches!(result, Err(PlayerError::Engine(_))));
        assert!(!controller.view_state().is_playing);
        assert_eq!(controller.phase(), PlayerPhase::Ready);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_rewind_keeps_position() -> PlayerResult<()> {
        let engine = ScriptedEngine {
            reject: Some(Call::SeekTo(0)),
            ..Default::default()
        };
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;
        engine.emit(status(10_000, 100_000));
        deliver(&mut controller, &mut receiver).await;

        assert!(controller.stop().await.is_err());
        assert_eq!(controller.view_state().position_ms, 10_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_notification_clamps_position() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;

        engine.emit(PlaybackStatus {
            is_buffering: true,
            position_ms: 12_000,
            duration_ms: 10_000,
            did_just_finish: false,
        });
        deliver(&mut controller, &mut receiver).await;

        let view = controller.view_state();
        assert!(view.is_buffering);
        assert_eq!(view.position_ms, 10_000);
        assert_eq!(view.progress(), 1.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_track_end_clears_playing() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;
        controller.play().await?;

        engine.emit(PlaybackStatus {
            is_buffering: false,
            position_ms: 30_000,
            duration_ms: 30_000,
            did_just_finish: true,
        });
        deliver(&mut controller, &mut receiver).await;

        assert!(!controller.view_state().is_playing);
        assert_eq!(controller.phase(), PlayerPhase::Ready);
        Ok(())
    }

    #[tokio::test]
    async fn test_teardown_releases_once_and_drops_late_status() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;
        engine.emit(status(1_000, 60_000));
        deliver(&mut controller, &mut receiver).await;

        controller.teardown();
        controller.teardown();
        assert_eq!(controller.phase(), PlayerPhase::Released);

        let before = controller.view_state();
        engine.emit(status(5_000, 60_000));
        deliver(&mut controller, &mut receiver).await;
        assert_eq!(controller.view_state(), before);

        let releases = engine
            .calls()
            .into_iter()
            .filter(|c| *c == Call::Release)
            .count();
        assert_eq!(releases, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_reinitialize_releases_previous_handle() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        let (mut controller, mut receiver) = controller(&engine);
        controller.initialize().await?;
        let stale_notify = engine.notify.lock().unwrap().clone();

        controller.initialize().await?;
        assert_eq!(
            engine.calls(),
            vec![
                Call::Load { autoplay: false },
                Call::Release,
                Call::Load { autoplay: false },
            ]
        );

        if let Some(notify) = stale_notify {
            notify(status(9_000, 10_000));
        }
        deliver(&mut controller, &mut receiver).await;
        assert_eq!(controller.view_state(), PlaybackViewState::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_drop_releases_handle() -> PlayerResult<()> {
        let engine = ScriptedEngine::default();
        {
            let (mut controller, _receiver) = controller(&engine);
            controller.initialize().await?;
        }
        assert_eq!(engine.calls().last(), Some(&Call::Release));
        Ok(())
    }
}
