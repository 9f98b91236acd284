//! JSON models for the song manifest (`info.json`) and per-difficulty level
//! files.

use serde::{Deserialize, Serialize};

use crate::notation::{Color, CutDirection, Difficulty, Note, Obstacle};

pub const LEVEL_FORMAT_VERSION: &str = "1.5.0";

/// Rows at or above this make a wall a ceiling wall.
pub const CEILING_ROW: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    DefaultEnvironment,
    BigMirror,
    TriangleEnvironment,
    NiceEnvironment,
}

/// The song manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInfo {
    pub song_name: String,
    pub song_sub_name: String,
    pub author_name: String,
    pub beats_per_minute: f64,
    pub preview_start_time: f64,
    pub preview_duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_path: Option<String>,
    pub environment_name: Environment,
    pub difficulty_levels: Vec<LevelInfo>,
}

/// Manifest entry for one written difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub difficulty: Difficulty,
    pub difficulty_rank: u8,
    pub audio_path: String,
    pub json_path: String,
    pub offset: f64,
    pub old_offset: f64,
}

/// One difficulty's level file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(rename = "_version")]
    pub version: String,
    #[serde(rename = "_beatsPerMinute")]
    pub beats_per_minute: f64,
    #[serde(rename = "_beatsPerBar")]
    pub beats_per_bar: u32,
    #[serde(rename = "_noteJumpSpeed")]
    pub note_jump_speed: f64,
    #[serde(rename = "_shuffle")]
    pub shuffle: u32,
    #[serde(rename = "_shufflePeriod")]
    pub shuffle_period: f64,
    #[serde(rename = "_events")]
    pub events: Vec<LightEvent>,
    #[serde(rename = "_notes")]
    pub notes: Vec<LevelNote>,
    #[serde(rename = "_obstacles")]
    pub obstacles: Vec<LevelObstacle>,
}

impl LevelData {
    pub fn new(beats_per_minute: f64) -> Self {
        Self {
            version: LEVEL_FORMAT_VERSION.to_string(),
            beats_per_minute,
            beats_per_bar: 16,
            note_jump_speed: 10.0,
            shuffle: 0,
            shuffle_period: 0.5,
            events: Vec::new(),
            notes: Vec::new(),
            obstacles: Vec::new(),
        }
    }
}

/// Lighting event. Never produced by the notation, kept for the file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightEvent {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_type")]
    pub kind: i32,
    #[serde(rename = "_value")]
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelNote {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_lineIndex")]
    pub line_index: u8,
    #[serde(rename = "_lineLayer")]
    pub line_layer: u8,
    #[serde(rename = "_type")]
    pub kind: u8,
    #[serde(rename = "_cutDirection")]
    pub cut_direction: u8,
}

impl LevelNote {
    pub fn from_note(time: f64, note: &Note) -> Self {
        let kind = match note.color {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Bomb => 3,
        };
        Self {
            time,
            line_index: note.x,
            line_layer: note.y,
            kind,
            cut_direction: note.direction.unwrap_or(CutDirection::Any).ordinal(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelObstacle {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_lineIndex")]
    pub line_index: u8,
    /// 0 for a full-height wall, 1 for a ceiling wall.
    #[serde(rename = "_type")]
    pub kind: u8,
    #[serde(rename = "_duration")]
    pub duration: f64,
    #[serde(rename = "_width")]
    pub width: u8,
}

impl LevelObstacle {
    pub fn from_obstacle(time: f64, obstacle: &Obstacle) -> Self {
        Self {
            time,
            line_index: obstacle.line_index(),
            kind: u8::from(obstacle.bottom_row() >= CEILING_ROW),
            duration: obstacle.length,
            width: obstacle.width(),
        }
    }
}
