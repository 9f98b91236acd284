//! Song-level settings collected from directives during one conversion.

use std::path::PathBuf;

/// Global song metadata and timing, shared by every procedure expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongConfig {
    pub audio_file: Option<PathBuf>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub bpm: Option<f64>,
    /// Audio sync offset in milliseconds.
    pub offset_ms: f64,
    /// Silence prepended to the audio, in seconds.
    pub lead_in_silence: f64,
}

impl SongConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the lead-in silence in beats at the song tempo.
    pub fn lead_in_beats(&self) -> Option<f64> {
        self.bpm.map(|bpm| bpm * self.lead_in_silence / 60.0)
    }
}
