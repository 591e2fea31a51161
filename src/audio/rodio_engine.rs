use super::{
    AudioEngine, LoadOptions, PlaybackStatus, PlayerError, PlayerHandle, PlayerResult,
    StatusCallback,
};
use crate::types::Millis;
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::future::Future;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

const STATUS_INTERVAL_MILLIS: u64 = 250;

type Reply = oneshot::Sender<PlayerResult<()>>;

#[derive(Debug)]
enum AudioCommand {
    Play(Reply),
    Pause(Reply),
    Stop(Reply),
    SeekTo { position_ms: Millis, reply: Reply },
    Release,
}

fn open_source(path: &Path) -> PlayerResult<Decoder<BufReader<File>>> {
    let file = File::open(path)
        .map_err(|e| PlayerError::Load(format!("Cannot open {}: {e}", path.display())))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| PlayerError::Load(format!("Cannot decode {}: {e}", path.display())))
}

/// Plays local files through the default output device. Every handle owns a
/// dedicated audio thread, since rodio output streams cannot leave the thread
/// that opened them.
#[derive(Debug, Default)]
pub struct RodioEngine;

impl RodioEngine {
    pub fn new() -> Self {
        Self
    }
}

impl AudioEngine for RodioEngine {
    type Handle = RodioHandle;

    fn load(
        &mut self,
        source: &Path,
        options: LoadOptions,
        notify: StatusCallback,
    ) -> impl Future<Output = PlayerResult<Self::Handle>> + Send {
        let source = source.to_path_buf();
        let (sender, receiver): (Sender<AudioCommand>, Receiver<AudioCommand>) = mpsc::channel();
        let (ready_sender, ready_receiver) = oneshot::channel();

        let spawned = thread::Builder::new()
            .name("audio-thread".into())
            .spawn(move || run_audio_thread(source, options, notify, receiver, ready_sender));

        async move {
            spawned.map_err(|e| PlayerError::Load(format!("Cannot spawn audio thread: {e}")))?;
            ready_receiver
                .await
                .map_err(|_| PlayerError::Load("Audio thread exited while loading".into()))??;

            Ok(RodioHandle {
                sender,
                released: false,
            })
        }
    }
}

#[derive(Debug)]
pub struct RodioHandle {
    sender: Sender<AudioCommand>,
    released: bool,
}

impl RodioHandle {
    fn request(
        &self,
        command: impl FnOnce(Reply) -> AudioCommand,
    ) -> impl Future<Output = PlayerResult<()>> + Send + 'static {
        let (reply, feedback) = oneshot::channel();
        let sent = !self.released && self.sender.send(command(reply)).is_ok();

        async move {
            if !sent {
                return Err(PlayerError::Engine("Audio thread is not running".into()));
            }
            feedback
                .await
                .map_err(|_| PlayerError::Engine("Audio thread dropped the command".into()))?
        }
    }
}

impl PlayerHandle for RodioHandle {
    fn play(&mut self) -> impl Future<Output = PlayerResult<()>> + Send {
        self.request(AudioCommand::Play)
    }

    fn pause(&mut self) -> impl Future<Output = PlayerResult<()>> + Send {
        self.request(AudioCommand::Pause)
    }

    fn stop(&mut self) -> impl Future<Output = PlayerResult<()>> + Send {
        self.request(AudioCommand::Stop)
    }

    fn seek_to(&mut self, position_ms: Millis) -> impl Future<Output = PlayerResult<()>> + Send {
        self.request(move |reply| AudioCommand::SeekTo { position_ms, reply })
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            // The thread also exits when the sender is dropped.
            let _ = self.sender.send(AudioCommand::Release);
        }
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.release();
    }
}

struct AudioThread {
    sink: Sink,
    source: PathBuf,
    duration_ms: Millis,
    // Position to report while the sink has not caught up with a rewind.
    position_override: Option<Millis>,
    exhausted: bool,
    notify: StatusCallback,
}

impl AudioThread {
    fn position_ms(&self) -> Millis {
        let position = self
            .position_override
            .unwrap_or_else(|| self.sink.get_pos().as_millis() as Millis);
        if self.duration_ms > 0 {
            position.min(self.duration_ms)
        } else {
            position
        }
    }

    fn publish(&self, did_just_finish: bool) {
        (self.notify)(PlaybackStatus {
            is_buffering: false,
            position_ms: self.position_ms(),
            duration_ms: self.duration_ms,
            did_just_finish,
        });
    }

    /// Replaces the queued decoder with a fresh one, paused at the start.
    fn rewind(&mut self) -> PlayerResult<()> {
        let decoder =
            open_source(&self.source).map_err(|e| PlayerError::Engine(e.to_string()))?;
        self.sink.clear();
        self.sink.append(decoder);
        self.sink.pause();
        self.position_override = Some(0);
        self.exhausted = false;
        Ok(())
    }

    fn execute(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Play(reply) => {
                self.sink.play();
                self.position_override = None;
                let _ = reply.send(Ok(()));
            }
            AudioCommand::Pause(reply) => {
                self.sink.pause();
                let _ = reply.send(Ok(()));
            }
            AudioCommand::Stop(reply) => {
                let _ = reply.send(self.rewind());
            }
            AudioCommand::SeekTo { position_ms, reply } => {
                if position_ms == 0 && self.position_override == Some(0) {
                    let _ = reply.send(Ok(()));
                    return;
                }
                let result = self
                    .sink
                    .try_seek(Duration::from_millis(position_ms))
                    .map_err(|e| PlayerError::Engine(format!("Seek failed: {e}")));
                if result.is_ok() {
                    self.position_override = self.sink.is_paused().then_some(position_ms);
                }
                let _ = reply.send(result);
            }
            AudioCommand::Release => {}
        }
    }

    fn check_track_end(&mut self) {
        if !self.sink.empty() || self.exhausted {
            return;
        }

        self.exhausted = true;
        self.position_override = Some(self.duration_ms);
        self.publish(true);
        if let Err(e) = self.rewind() {
            log::error!("Cannot reload track after it ended: {e}");
        }
    }
}

fn run_audio_thread(
    source: PathBuf,
    options: LoadOptions,
    notify: StatusCallback,
    receiver: Receiver<AudioCommand>,
    ready: oneshot::Sender<PlayerResult<()>>,
) {
    notify(PlaybackStatus {
        is_buffering: true,
        ..Default::default()
    });

    let (_stream, stream_handle) = match OutputStream::try_default() {
        Ok(v) => v,
        Err(e) => {
            let _ = ready.send(Err(PlayerError::Load(format!(
                "Failed to create audio output stream: {e}"
            ))));
            return;
        }
    };

    let sink = match Sink::try_new(&stream_handle) {
        Ok(s) => s,
        Err(e) => {
            let _ = ready.send(Err(PlayerError::Load(format!(
                "Failed to create rodio Sink: {e}"
            ))));
            return;
        }
    };
    sink.pause();

    let decoder = match open_source(&source) {
        Ok(d) => d,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let duration_ms = decoder
        .total_duration()
        .map(|d| d.as_millis() as Millis)
        .unwrap_or_default();
    if duration_ms == 0 {
        log::warn!("Duration of {} is unknown", source.display());
    }

    sink.append(decoder);
    if options.autoplay {
        sink.play();
    }

    let mut audio = AudioThread {
        sink,
        source,
        duration_ms,
        position_override: None,
        exhausted: false,
        notify,
    };

    if ready.send(Ok(())).is_err() {
        log::warn!("Load abandoned before the audio thread was ready");
        return;
    }
    audio.publish(false);

    loop {
        match receiver.recv_timeout(Duration::from_millis(STATUS_INTERVAL_MILLIS)) {
            Ok(AudioCommand::Release) | Err(RecvTimeoutError::Disconnected) => {
                log::info!("Audio thread shutting down.");
                break;
            }
            Ok(command) => audio.execute(command),
            Err(RecvTimeoutError::Timeout) => {}
        }

        audio.check_track_end();
        audio.publish(false);
    }

    audio.sink.stop();
}
