//! Frame data model: one parsed notation line.
//!
//! A [`Frame`] holds the directives written after the `;` separators and the
//! notes and obstacles placed on the line. Frames never carry time; the
//! emission engine stamps copies of their contents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Saber color of a note. Bombs are placed like notes but have no color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
    Bomb,
}

/// The direction a note has to be cut in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Any,
}

impl CutDirection {
    /// All directions in ordinal order.
    pub const ALL: [CutDirection; 9] = [
        CutDirection::Up,
        CutDirection::Down,
        CutDirection::Left,
        CutDirection::Right,
        CutDirection::UpLeft,
        CutDirection::UpRight,
        CutDirection::DownLeft,
        CutDirection::DownRight,
        CutDirection::Any,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// An output difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
    ExpertPlus,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::ExpertPlus,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::ExpertPlus => "ExpertPlus",
        }
    }
}

/// Which difficulties a placed object appears in, one bit per [`Difficulty`] rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DifficultyMask(pub u8);

impl DifficultyMask {
    pub const NONE: DifficultyMask = DifficultyMask(0);
    pub const ALL: DifficultyMask = DifficultyMask(0b1_1111);

    pub fn only(difficulty: Difficulty) -> Self {
        Self(1 << difficulty.rank())
    }

    pub fn contains(self, difficulty: Difficulty) -> bool {
        self.0 & (1 << difficulty.rank()) != 0
    }

    pub fn with(self, difficulty: Difficulty) -> Self {
        Self(self.0 | (1 << difficulty.rank()))
    }
}

impl Default for DifficultyMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// A placed hit target. `direction` is `None` only for bombs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub x: u8,
    pub y: u8,
    pub color: Color,
    pub direction: Option<CutDirection>,
    pub difficulties: DifficultyMask,
}

impl Note {
    /// A red or blue note cut in `direction`.
    pub fn colored(x: u8, y: u8, color: Color, direction: CutDirection) -> Self {
        Self {
            x,
            y,
            color,
            direction: Some(direction),
            difficulties: DifficultyMask::default(),
        }
    }

    pub fn bomb(x: u8, y: u8) -> Self {
        Self {
            x,
            y,
            color: Color::Bomb,
            direction: None,
            difficulties: DifficultyMask::default(),
        }
    }
}

/// A wall spanning the rectangle between two corner cells.
///
/// Corners are stored as written; [`Obstacle::line_index`] and
/// [`Obstacle::width`] normalize them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x1: u8,
    pub y1: u8,
    pub x2: u8,
    pub y2: u8,
    /// Duration. Measure-units in a frame, beats once emitted.
    pub length: f64,
    pub difficulties: DifficultyMask,
}

impl Obstacle {
    pub fn new(corner_a: (u8, u8), corner_b: (u8, u8), length: f64) -> Self {
        Self {
            x1: corner_a.0,
            y1: corner_a.1,
            x2: corner_b.0,
            y2: corner_b.1,
            length,
            difficulties: DifficultyMask::default(),
        }
    }

    /// Leftmost column covered.
    pub fn line_index(&self) -> u8 {
        self.x1.min(self.x2)
    }

    /// Number of columns covered.
    pub fn width(&self) -> u8 {
        self.x1.abs_diff(self.x2) + 1
    }

    /// Lowest row covered.
    pub fn bottom_row(&self) -> u8 {
        self.y1.min(self.y2)
    }
}

/// One parsed input line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// 1-based source line number.
    pub line: usize,
    pub directives: HashMap<String, String>,
    pub notes: Vec<Note>,
    pub obstacles: Vec<Obstacle>,
}

impl Frame {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    /// Raw value of a directive, if the line set it.
    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives.get(key).map(String::as_str)
    }

    /// Whether the line placed nothing and set no directives.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.notes.is_empty() && self.obstacles.is_empty()
    }
}
