use anyhow::anyhow;
use std::time::{SystemTime, UNIX_EPOCH};

// A Tick is a wall-clock timestamp in milliseconds since the epoch.
pub type Tick = u64;
// Millis is an offset inside the audio track.
pub type Millis = u64;
pub type HandleId = u64;

pub type AppResult<T> = Result<T, anyhow::Error>;

pub const MILLIS_PER_SECOND: Millis = 1_000;
pub const MILLIS_PER_MINUTE: Millis = 60 * MILLIS_PER_SECOND;

pub trait SystemTimeTick {
    fn now() -> Self;
    fn from_system_time(time: SystemTime) -> Self;
}

impl SystemTimeTick for Tick {
    fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    fn from_system_time(time: SystemTime) -> Tick {
        time.duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Tick)
            .unwrap_or_default()
    }
}

/// Formats a track offset as `M:SS`, rounding to the nearest second.
///
/// A remainder that rounds up to 60 seconds rolls over into the next minute,
/// so `59_500` is shown as `1:00` rather than `0:60`.
pub fn format_time(millis: Millis) -> String {
    let rounds_up = millis % MILLIS_PER_SECOND >= MILLIS_PER_SECOND / 2;
    let total_seconds = millis / MILLIS_PER_SECOND + Millis::from(rounds_up);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes}:{seconds:02}")
}

/// Parses an `M:SS` string (as produced by [`format_time`]) into milliseconds.
pub fn parse_time(text: &str) -> AppResult<Millis> {
    let (minutes, seconds) = text
        .trim()
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected a time like 1:30, got '{text}'"))?;

    let minutes: Millis = minutes.parse()?;
    let seconds: Millis = seconds.parse()?;
    if seconds >= 60 {
        return Err(anyhow!("Seconds must be below 60, got {seconds}"));
    }

    minutes
        .checked_mul(MILLIS_PER_MINUTE)
        .and_then(|millis| millis.checked_add(seconds * MILLIS_PER_SECOND))
        .ok_or_else(|| anyhow!("Time '{text}' is out of range"))
}
