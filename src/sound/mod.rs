//! Completion sound selection and playback

pub mod clips;
pub mod player;

use serde::Serialize;
use tracing::{info, warn};

pub use clips::{ClipHandle, ClipRegistry, SpoolClipRegistry};
pub use player::{AudioPlayer, ClipSource, PlayRequest, RodioPlayer, DEFAULT_CLIP, DEFAULT_CLIP_NAME};

/// Volume used until the user changes it
pub const DEFAULT_VOLUME: u8 = 30;
/// Step of the volume up/down controls
pub const VOLUME_STEP: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Default,
    Uploaded,
}

/// The clip currently used for completion sounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundSelection {
    pub source_kind: SourceKind,
    pub source_handle: ClipHandle,
    pub display_name: String,
    pub volume_percent: u8,
}

/// Owns the selected clip, the volume and the player
pub struct SoundSubsystem {
    selection: SoundSelection,
    registry: Box<dyn ClipRegistry + Send>,
    player: Box<dyn AudioPlayer + Send>,
}

impl SoundSubsystem {
    pub fn new(registry: Box<dyn ClipRegistry + Send>, player: Box<dyn AudioPlayer + Send>) -> Self {
        Self {
            selection: SoundSelection {
                source_kind: SourceKind::Default,
                source_handle: ClipHandle::default_clip(),
                display_name: DEFAULT_CLIP_NAME.to_string(),
                volume_percent: DEFAULT_VOLUME,
            },
            registry,
            player,
        }
    }

    pub fn selection(&self) -> &SoundSelection {
        &self.selection
    }

    pub fn volume(&self) -> u8 {
        self.selection.volume_percent
    }

    /// Replace the active clip with uploaded audio. The previously uploaded
    /// clip, if any, is released once the new one is registered.
    pub fn upload_custom_sound(&mut self, file_name: &str, data: &[u8]) -> Result<(), String> {
        let handle = self.registry.register(file_name, data)?;
        let previous = std::mem::replace(&mut self.selection.source_handle, handle);
        self.selection.source_kind = SourceKind::Uploaded;
        self.selection.display_name = file_name.to_string();

        if !previous.is_default() {
            self.registry.release(&previous);
        }

        info!("Completion sound set to {} ({})", file_name, self.selection.source_handle);
        Ok(())
    }

    /// Go back to the default clip, releasing any uploaded one
    pub fn clear_custom_sound(&mut self) {
        if self.selection.source_kind == SourceKind::Default {
            return;
        }
        let previous = std::mem::replace(&mut self.selection.source_handle, ClipHandle::default_clip());
        self.registry.release(&previous);
        self.selection.source_kind = SourceKind::Default;
        self.selection.display_name = DEFAULT_CLIP_NAME.to_string();
        info!("Completion sound reset to default");
    }

    /// Set the volume, clamped to 0..=100
    pub fn set_volume(&mut self, percent: i64) {
        self.selection.volume_percent = percent.clamp(0, 100) as u8;
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.selection.volume_percent as i64 - VOLUME_STEP);
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.selection.volume_percent as i64 + VOLUME_STEP);
    }

    /// Play the selected clip from the start. Playback problems are logged and
    /// reported as `false`, never propagated.
    pub fn play(&mut self) -> bool {
        let source = match self.selection.source_kind {
            SourceKind::Default => Some(ClipSource::Bundled(DEFAULT_CLIP)),
            SourceKind::Uploaded => self
                .registry
                .resolve(&self.selection.source_handle)
                .map(ClipSource::File),
        };
        let Some(source) = source else {
            warn!("Selected clip {} is no longer available", self.selection.source_handle);
            return false;
        };

        let request = PlayRequest {
            handle: self.selection.source_handle.clone(),
            source,
            volume: self.selection.volume_percent as f32 / 100.0,
        };
        match self.player.play(&request) {
            Ok(()) => true,
            Err(e) => {
                warn!("Sound playback failed: {}", e);
                false
            }
        }
    }

}

impl Drop for SoundSubsystem {
    fn drop(&mut self) {
        if self.selection.source_kind == SourceKind::Uploaded {
            self.registry.release(&self.selection.source_handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        path::PathBuf,
        sync::{Arc, Mutex},
    };

    use super::*;

    /// Registry that only counts handles
    #[derive(Clone, Default)]
    struct TrackingRegistry {
        live: Arc<Mutex<HashSet<ClipHandle>>>,
        next: Arc<Mutex<u64>>,
        fail: bool,
    }

    impl ClipRegistry for TrackingRegistry {
        fn register(&mut self, _file_name: &str, _data: &[u8]) -> Result<ClipHandle, String> {
            if self.fail {
                return Err("disk full".to_string());
            }
            let mut next = self.next.lock().unwrap();
            *next += 1;
            let handle = ClipHandle::uploaded(*next);
            self.live.lock().unwrap().insert(handle.clone());
            Ok(handle)
        }

        fn resolve(&self, handle: &ClipHandle) -> Option<PathBuf> {
            self.live
                .lock()
                .unwrap()
                .contains(handle)
                .then(|| PathBuf::from(format!("/spool/{}", handle)))
        }

        fn release(&mut self, handle: &ClipHandle) {
            self.live.lock().unwrap().remove(handle);
        }
    }

    impl TrackingRegistry {
        fn outstanding(&self) -> usize {
            self.live.lock().unwrap().len()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPlayer {
        played: Arc<Mutex<Vec<PlayRequest>>>,
        fail: bool,
    }

    impl AudioPlayer for RecordingPlayer {
        fn play(&mut self, request: &PlayRequest) -> Result<(), String> {
            if self.fail {
                return Err("autoplay blocked".to_string());
            }
            self.played.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    fn subsystem(registry: TrackingRegistry, player: RecordingPlayer) -> SoundSubsystem {
        SoundSubsystem::new(Box::new(registry), Box::new(player))
    }

    #[test]
    fn defaults() {
        let sound = subsystem(TrackingRegistry::default(), RecordingPlayer::default());
        let selection = sound.selection();
        assert_eq!(selection.source_kind, SourceKind::Default);
        assert_eq!(selection.display_name, "chime.wav");
        assert_eq!(selection.volume_percent, 30);
    }

    #[test]
    fn volume_down_clamps_at_zero() {
        let mut sound = subsystem(TrackingRegistry::default(), RecordingPlayer::default());
        for _ in 0..5 {
            sound.volume_down();
        }
        assert_eq!(sound.volume(), 0);
        sound.volume_down();
        assert_eq!(sound.volume(), 0);
    }

    #[test]
    fn volume_up_clamps_at_hundred() {
        let mut sound = subsystem(TrackingRegistry::default(), RecordingPlayer::default());
        sound.set_volume(95);
        sound.volume_up();
        assert_eq!(sound.volume(), 100);
        sound.set_volume(-20);
        assert_eq!(sound.volume(), 0);
        sound.set_volume(250);
        assert_eq!(sound.volume(), 100);
    }

    #[test]
    fn plays_default_clip_at_volume() {
        let player = RecordingPlayer::default();
        let mut sound = subsystem(TrackingRegistry::default(), player.clone());
        sound.set_volume(50);
        assert!(sound.play());

        let played = player.played.lock().unwrap();
        assert_eq!(played.len(), 1);
        assert!(played[0].handle.is_default());
        assert_eq!(played[0].source, ClipSource::Bundled(DEFAULT_CLIP));
        assert_eq!(played[0].volume, 0.5);
    }

    #[test]
    fn uploaded_clip_replaces_default_and_releases_previous() {
        let registry = TrackingRegistry::default();
        let player = RecordingPlayer::default();
        let mut sound = subsystem(registry.clone(), player.clone());

        sound.upload_custom_sound("first.mp3", b"1").unwrap();
        assert_eq!(registry.outstanding(), 1);
        sound.play();

        sound.upload_custom_sound("second.mp3", b"2").unwrap();
        assert_eq!(registry.outstanding(), 1);
        assert_eq!(sound.selection().display_name, "second.mp3");
        sound.play();

        let played = player.played.lock().unwrap();
        assert_eq!(played[0].handle, ClipHandle::uploaded(1));
        assert_eq!(played[1].handle, ClipHandle::uploaded(2));
        assert_eq!(played[1].source, ClipSource::File(PathBuf::from("/spool/upload-2")));
    }

    #[test]
    fn failed_upload_keeps_previous_selection() {
        let registry = TrackingRegistry { fail: true, ..Default::default() };
        let mut sound = subsystem(registry, RecordingPlayer::default());
        assert!(sound.upload_custom_sound("x.mp3", b"x").is_err());
        assert_eq!(sound.selection().source_kind, SourceKind::Default);
    }

    #[test]
    fn clear_custom_sound_falls_back_to_default() {
        let registry = TrackingRegistry::default();
        let mut sound = subsystem(registry.clone(), RecordingPlayer::default());
        sound.upload_custom_sound("x.mp3", b"x").unwrap();
        sound.clear_custom_sound();
        assert_eq!(registry.outstanding(), 0);
        assert_eq!(sound.selection().source_kind, SourceKind::Default);
        assert_eq!(sound.selection().display_name, "chime.wav");
    }

    #[test]
    fn drop_releases_uploaded_clip() {
        let registry = TrackingRegistry::default();
        {
            let mut sound = subsystem(registry.clone(), RecordingPlayer::default());
            sound.upload_custom_sound("x.mp3", b"x").unwrap();
            assert_eq!(registry.outstanding(), 1);
        }
        assert_eq!(registry.outstanding(), 0);
    }

    #[test]
    fn playback_failure_is_swallowed() {
        let player = RecordingPlayer { fail: true, ..Default::default() };
        let mut sound = subsystem(TrackingRegistry::default(), player);
        assert!(!sound.play());
    }
}
