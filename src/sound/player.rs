//! Audio playback on the default output device

use std::{
    fs::File,
    io::{Cursor, Read, Seek},
    path::PathBuf,
    sync::mpsc,
    thread,
};

use rodio::{mixer::Mixer, Decoder, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::ClipHandle;

/// Chime played when no custom sound has been uploaded
pub const DEFAULT_CLIP: &[u8] = include_bytes!("../../assets/chime.wav");
pub const DEFAULT_CLIP_NAME: &str = "chime.wav";

/// Where the bytes of a clip come from
#[derive(Debug, Clone, PartialEq)]
pub enum ClipSource {
    Bundled(&'static [u8]),
    File(PathBuf),
}

/// A clip ready to be played
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub handle: ClipHandle,
    pub source: ClipSource,
    /// Volume in 0.0..=1.0
    pub volume: f32,
}

/// Plays clips from the beginning
pub trait AudioPlayer {
    fn play(&mut self, request: &PlayRequest) -> Result<(), String>;
}

/// Output stream kept open on its own thread. The stream is not `Send`, so
/// only its mixer leaves the thread; dropping `_close` ends the thread and
/// closes the device.
struct AudioOutput {
    mixer: Mixer,
    _close: mpsc::Sender<()>,
}

impl AudioOutput {
    fn open() -> Result<Self, String> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (close_tx, close_rx) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match OutputStreamBuilder::open_default_stream() {
                Ok(mut stream) => {
                    stream.log_on_drop(false);
                    let _ = ready_tx.send(Ok(stream.mixer().clone()));
                    // Blocks until the sender is dropped
                    let _ = close_rx.recv();
                    debug!("Audio output closed");
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(format!("Failed to open audio output: {}", e)));
                }
            })
            .map_err(|e| format!("Failed to start audio thread: {}", e))?;

        let mixer = ready_rx
            .recv()
            .map_err(|e| format!("Audio thread exited early: {}", e))??;
        Ok(Self { mixer, _close: close_tx })
    }
}

/// Plays through a single sink. Each play stops the previous clip so the new
/// one starts from the beginning.
pub struct RodioPlayer {
    output: Option<AudioOutput>,
    current: Option<Sink>,
}

impl RodioPlayer {
    /// Open the default output device. Without one the player still works,
    /// but every play reports an error.
    pub fn open() -> Self {
        let output = match AudioOutput::open() {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("{}, completion sounds are disabled", e);
                None
            }
        };
        Self { output, current: None }
    }

    fn start<R>(&mut self, reader: R, request: &PlayRequest) -> Result<(), String>
    where
        R: Read + Seek + Send + Sync + 'static,
    {
        let decoder = Decoder::new(reader)
            .map_err(|e| format!("Failed to decode clip {}: {}", request.handle, e))?;
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| "No audio output device".to_string())?;

        if let Some(previous) = self.current.take() {
            previous.stop();
        }

        let sink = Sink::connect_new(&output.mixer);
        sink.set_volume(request.volume.clamp(0.0, 1.0));
        sink.append(decoder);
        sink.play();
        self.current = Some(sink);

        debug!("Playing {} at {:.0}%", request.handle, request.volume * 100.0);
        Ok(())
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&mut self, request: &PlayRequest) -> Result<(), String> {
        match &request.source {
            ClipSource::Bundled(bytes) => self.start(Cursor::new(*bytes), request),
            ClipSource::File(path) => {
                let file = File::open(path)
                    .map_err(|e| format!("Failed to open clip {}: {}", path.display(), e))?;
                self.start(file, request)
            }
        }
    }
}
