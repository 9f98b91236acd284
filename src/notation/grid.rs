//! Grid codec: maps notation characters to grid cells, colors and cut
//! directions, and back.
//!
//! The playfield is 4 columns by 3 rows. The positions alphabet holds one
//! character per (color, row, column) triple, red cells first, so its length
//! is always 24. The directions alphabet holds one character per
//! [`CutDirection`] in declaration order; the default is laid out like a
//! numeric keypad (`8` is up, `2` is down, and so on).

use thiserror::Error;

use super::frame::{Color, CutDirection};

/// Number of grid columns.
pub const GRID_COLUMNS: u8 = 4;
/// Number of grid rows.
pub const GRID_ROWS: u8 = 3;
/// Cells per color in the positions alphabet.
pub const CELLS_PER_COLOR: usize = (GRID_COLUMNS * GRID_ROWS) as usize;
/// Required length of the positions alphabet (red cells, then blue cells).
pub const POSITIONS_LEN: usize = CELLS_PER_COLOR * 2;
/// Required length of the directions alphabet.
pub const DIRECTIONS_LEN: usize = CutDirection::ALL.len();

pub const DEFAULT_POSITIONS: &str = "ZXCVASDFQWERzxcvasdfqwer";
pub const DEFAULT_DIRECTIONS: &str = "824679135";
pub const DEFAULT_BOMB: char = '*';
pub const DEFAULT_OBSTACLE_OPEN: char = '[';
pub const DEFAULT_OBSTACLE_CLOSE: char = ']';

/// A decoded position character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub color: Color,
    pub x: u8,
    pub y: u8,
}

impl Position {
    /// Index of this position in a positions alphabet, or `None` for bombs
    /// and out-of-range cells.
    pub fn index(&self) -> Option<usize> {
        let color = match self.color {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Bomb => return None,
        };
        if self.x >= GRID_COLUMNS || self.y >= GRID_ROWS {
            return None;
        }
        Some(color * CELLS_PER_COLOR + self.y as usize * GRID_COLUMNS as usize + self.x as usize)
    }

    fn from_index(index: usize) -> Self {
        let color = if index / CELLS_PER_COLOR == 0 {
            Color::Red
        } else {
            Color::Blue
        };
        Self {
            color,
            x: (index % GRID_COLUMNS as usize) as u8,
            y: ((index / GRID_COLUMNS as usize) % GRID_ROWS as usize) as u8,
        }
    }
}

/// What a single notation character means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Bomb,
    ObstacleOpen,
    ObstacleClose,
    Direction(CutDirection),
    Position(Position),
}

/// An alphabet set that cannot be used for decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlphabetError {
    #[error("{name} alphabet must have {expected} characters, found {found}")]
    WrongLength {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("character '{0}' is used more than once across the alphabets")]
    DuplicateSymbol(char),
    #[error("whitespace character {0:?} cannot be a notation symbol")]
    Whitespace(char),
}

/// The two alphabets plus the reserved control characters.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCodec {
    positions: Vec<char>,
    directions: Vec<char>,
    bomb: char,
    obstacle_open: char,
    obstacle_close: char,
}

impl GridCodec {
    /// Build a codec, checking alphabet lengths and that no character has
    /// two meanings.
    pub fn new(
        positions: &str,
        directions: &str,
        bomb: char,
        obstacle_open: char,
        obstacle_close: char,
    ) -> Result<Self, AlphabetError> {
        let positions: Vec<char> = positions.chars().collect();
        let directions: Vec<char> = directions.chars().collect();

        if positions.len() != POSITIONS_LEN {
            return Err(AlphabetError::WrongLength {
                name: "positions",
                expected: POSITIONS_LEN,
                found: positions.len(),
            });
        }
        if directions.len() != DIRECTIONS_LEN {
            return Err(AlphabetError::WrongLength {
                name: "directions",
                expected: DIRECTIONS_LEN,
                found: directions.len(),
            });
        }

        let controls = [bomb, obstacle_open, obstacle_close];
        let mut seen = Vec::with_capacity(POSITIONS_LEN + DIRECTIONS_LEN + controls.len());
        let all = positions
            .iter()
            .chain(directions.iter())
            .chain(controls.iter());
        for &c in all {
            if c.is_whitespace() {
                return Err(AlphabetError::Whitespace(c));
            }
            if seen.contains(&c) {
                return Err(AlphabetError::DuplicateSymbol(c));
            }
            seen.push(c);
        }

        Ok(Self {
            positions,
            directions,
            bomb,
            obstacle_open,
            obstacle_close,
        })
    }

    pub fn bomb(&self) -> char {
        self.bomb
    }

    pub fn obstacle_open(&self) -> char {
        self.obstacle_open
    }

    pub fn obstacle_close(&self) -> char {
        self.obstacle_close
    }

    /// Classify a character. Control characters win, then directions, then
    /// positions. Returns `None` for characters with no meaning.
    pub fn classify(&self, c: char) -> Option<Symbol> {
        if c == self.bomb {
            Some(Symbol::Bomb)
        } else if c == self.obstacle_open {
            Some(Symbol::ObstacleOpen)
        } else if c == self.obstacle_close {
            Some(Symbol::ObstacleClose)
        } else if let Some(direction) = self.decode_direction(c) {
            Some(Symbol::Direction(direction))
        } else {
            self.decode_position(c).map(Symbol::Position)
        }
    }

    pub fn decode_position(&self, c: char) -> Option<Position> {
        self.positions
            .iter()
            .position(|&p| p == c)
            .map(Position::from_index)
    }

    pub fn decode_direction(&self, c: char) -> Option<CutDirection> {
        self.directions
            .iter()
            .position(|&d| d == c)
            .map(|i| CutDirection::ALL[i])
    }

    pub fn encode_position(&self, position: Position) -> Option<char> {
        position.index().map(|i| self.positions[i])
    }

    pub fn encode_direction(&self, direction: CutDirection) -> char {
        self.directions[direction.ordinal() as usize]
    }
}

impl Default for GridCodec {
    fn default() -> Self {
        Self {
            positions: DEFAULT_POSITIONS.chars().collect(),
            directions: DEFAULT_DIRECTIONS.chars().collect(),
            bomb: DEFAULT_BOMB,
            obstacle_open: DEFAULT_OBSTACLE_OPEN,
            obstacle_close: DEFAULT_OBSTACLE_CLOSE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabets_are_valid() {
        let built = GridCodec::new(
            DEFAULT_POSITIONS,
            DEFAULT_DIRECTIONS,
            DEFAULT_BOMB,
            DEFAULT_OBSTACLE_OPEN,
            DEFAULT_OBSTACLE_CLOSE,
        )
        .unwrap();
        assert_eq!(built, GridCodec::default());
    }

    #[test]
    fn every_position_round_trips() {
        let codec = GridCodec::default();
        for (index, c) in DEFAULT_POSITIONS.chars().enumerate() {
            let pos = codec.decode_position(c).unwrap();
            assert_eq!(pos.index(), Some(index), "index of '{c}'");
            assert_eq!(codec.encode_position(pos), Some(c));
        }
    }

    #[test]
    fn decode_corner_positions() {
        let codec = GridCodec::default();
        // Bottom-left red
        assert_eq!(
            codec.decode_position('Z'),
            Some(Position {
                color: Color::Red,
                x: 0,
                y: 0
            })
        );
        // Top-right red
        assert_eq!(
            codec.decode_position('R'),
            Some(Position {
                color: Color::Red,
                x: 3,
                y: 2
            })
        );
        // Middle row, second column, blue
        assert_eq!(
            codec.decode_position('s'),
            Some(Position {
                color: Color::Blue,
                x: 1,
                y: 1
            })
        );
    }

    #[test]
    fn directions_follow_keypad_layout() {
        let codec = GridCodec::default();
        assert_eq!(codec.decode_direction('8'), Some(CutDirection::Up));
        assert_eq!(codec.decode_direction('2'), Some(CutDirection::Down));
        assert_eq!(codec.decode_direction('4'), Some(CutDirection::Left));
        assert_eq!(codec.decode_direction('6'), Some(CutDirection::Right));
        assert_eq!(codec.decode_direction('7'), Some(CutDirection::UpLeft));
        assert_eq!(codec.decode_direction('9'), Some(CutDirection::UpRight));
        assert_eq!(codec.decode_direction('1'), Some(CutDirection::DownLeft));
        assert_eq!(codec.decode_direction('3'), Some(CutDirection::DownRight));
        assert_eq!(codec.decode_direction('5'), Some(CutDirection::Any));
    }

    #[test]
    fn encode_direction_inverts_decode() {
        let codec = GridCodec::default();
        for direction in CutDirection::ALL {
            let c = codec.encode_direction(direction);
            assert_eq!(codec.decode_direction(c), Some(direction));
        }
    }

    #[test]
    fn classify_control_characters() {
        let codec = GridCodec::default();
        assert_eq!(codec.classify('*'), Some(Symbol::Bomb));
        assert_eq!(codec.classify('['), Some(Symbol::ObstacleOpen));
        assert_eq!(codec.classify(']'), Some(Symbol::ObstacleClose));
        assert!(matches!(codec.classify('A'), Some(Symbol::Position(_))));
        assert!(matches!(codec.classify('5'), Some(Symbol::Direction(_))));
        assert_eq!(codec.classify('@'), None);
        assert_eq!(codec.classify('0'), None);
    }

    #[test]
    fn bomb_position_has_no_index() {
        let pos = Position {
            color: Color::Bomb,
            x: 0,
            y: 0,
        };
        assert_eq!(pos.index(), None);
    }

    #[test]
    fn rejects_short_positions() {
        let err = GridCodec::new("ABC", DEFAULT_DIRECTIONS, '*', '[', ']').unwrap_err();
        assert_eq!(
            err,
            AlphabetError::WrongLength {
                name: "positions",
                expected: 24,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_overlapping_alphabets() {
        // '8' is both a position and a direction
        let positions = "8XCVASDFQWERzxcvasdfqwer";
        let err = GridCodec::new(positions, DEFAULT_DIRECTIONS, '*', '[', ']').unwrap_err();
        assert_eq!(err, AlphabetError::DuplicateSymbol('8'));
    }

    #[test]
    fn rejects_control_character_collision() {
        let err = GridCodec::new(DEFAULT_POSITIONS, DEFAULT_DIRECTIONS, 'Z', '[', ']').unwrap_err();
        assert_eq!(err, AlphabetError::DuplicateSymbol('Z'));
    }

    #[test]
    fn rejects_whitespace_symbol() {
        let err = GridCodec::new(DEFAULT_POSITIONS, DEFAULT_DIRECTIONS, ' ', '[', ']').unwrap_err();
        assert_eq!(err, AlphabetError::Whitespace(' '));
    }
}
