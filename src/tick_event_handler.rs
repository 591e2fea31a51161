use crate::app::AppEvent;
use crate::types::{SystemTimeTick, Tick};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Time between two redraws. A zero rate is treated as one frame per second.
pub fn frame_period(target_fps: u8) -> Duration {
    Duration::from_millis(1_000 / u64::from(target_fps.max(1)))
}

async fn next_redraw(redraws: &mut Interval, cancellation_token: &CancellationToken) -> Option<Tick> {
    tokio::select! {
        biased;
        _ = cancellation_token.cancelled() => None,
        _ = redraws.tick() => Some(Tick::now()),
    }
}

/// Feeds `AppEvent::Tick` into the app at `target_fps` until cancelled.
pub fn start_tick_event_loop(
    target_fps: u8,
    event_sender: mpsc::Sender<AppEvent>,
    cancellation_token: CancellationToken,
) -> JoinHandle<()> {
    let mut redraws = time::interval(frame_period(target_fps));
    // A late frame is dropped, the next draw shows the current state anyway.
    redraws.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::spawn(async move {
        while let Some(tick) = next_redraw(&mut redraws, &cancellation_token).await {
            if event_sender.send(AppEvent::Tick(tick)).await.is_err() {
                log::warn!("Redraw ticks stopped: app receiver closed.");
                return;
            }
        }
        log::info!("Redraw ticks cancelled.");
    })
}
