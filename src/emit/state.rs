//! Emission state: the musical clock threaded through a traversal.

/// Running time, measure subdivision and tempo for one timeline.
///
/// Not `Clone`; isolated timelines are made with [`EmissionState::fork`].
#[derive(Debug, PartialEq)]
pub struct EmissionState {
    /// Current position in beats.
    pub time: f64,
    /// Subdivisions per beat; one frame advances `1 / measure` beats.
    pub measure: f64,
    /// First tempo set on this timeline.
    pub initial_bpm: Option<f64>,
    /// Most recent tempo set on this timeline.
    pub current_bpm: Option<f64>,
}

impl EmissionState {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            measure: 1.0,
            initial_bpm: None,
            current_bpm: None,
        }
    }

    /// An independent copy of this timeline.
    pub fn fork(&self) -> Self {
        Self {
            time: self.time,
            measure: self.measure,
            initial_bpm: self.initial_bpm,
            current_bpm: self.current_bpm,
        }
    }

    /// Length of one frame in beats.
    pub fn tick(&self) -> f64 {
        1.0 / self.measure
    }

    /// Move forward by one frame.
    pub fn advance(&mut self) {
        self.time += self.tick();
    }

    /// Move by `subdivisions` frames of the current measure.
    pub fn shift(&mut self, subdivisions: f64) {
        self.time += subdivisions / self.measure;
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.initial_bpm.get_or_insert(bpm);
        self.current_bpm = Some(bpm);
    }
}

impl Default for EmissionState {
    fn default() -> Self {
        Self::new()
    }
}
