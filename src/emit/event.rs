//! Timed output events.

use crate::notation::{DifficultyMask, Note, Obstacle};

/// What an event places.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Note(Note),
    /// Obstacle length is already in beats.
    Obstacle(Obstacle),
}

/// A note or obstacle stamped with its time in beats.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
}

impl Event {
    pub fn note(time: f64, note: Note) -> Self {
        Self {
            time,
            kind: EventKind::Note(note),
        }
    }

    pub fn obstacle(time: f64, obstacle: Obstacle) -> Self {
        Self {
            time,
            kind: EventKind::Obstacle(obstacle),
        }
    }

    pub fn difficulties(&self) -> DifficultyMask {
        match &self.kind {
            EventKind::Note(note) => note.difficulties,
            EventKind::Obstacle(obstacle) => obstacle.difficulties,
        }
    }

    pub fn as_note(&self) -> Option<&Note> {
        match &self.kind {
            EventKind::Note(note) => Some(note),
            EventKind::Obstacle(_) => None,
        }
    }

    pub fn as_obstacle(&self) -> Option<&Obstacle> {
        match &self.kind {
            EventKind::Obstacle(obstacle) => Some(obstacle),
            EventKind::Note(_) => None,
        }
    }
}
