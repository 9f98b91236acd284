//! Notation parser: text lines → [`Frame`]s.
//!
//! A line looks like `8ZX 2q [QR4] ; measure=4 ; offset=1`. Direction
//! characters arm a cut direction, position characters place notes with the
//! armed direction, `[..]` places a wall and `;` starts a directive.

pub mod error;
pub mod frame;
pub mod grid;
pub mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use frame::{Color, CutDirection, Difficulty, DifficultyMask, Frame, Note, Obstacle};
pub use grid::{GridCodec, Position, Symbol};

use parser::{FrameParser, LineParser};

/// A notation format: the symbol alphabets plus format options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notation {
    pub codec: GridCodec,
    /// Reject positions written before any direction instead of placing bombs.
    pub strict_directions: bool,
}

impl Notation {
    pub fn new(codec: GridCodec, strict_directions: bool) -> Self {
        Self {
            codec,
            strict_directions,
        }
    }

    /// Lazily parse `source` one line at a time.
    pub fn parse<'a>(&'a self, source: &'a str) -> FrameParser<'a, std::str::Lines<'a>> {
        FrameParser::new(self, source.lines())
    }

    /// Lazily parse any sequence of lines, such as `BufRead::lines` output
    /// after error handling.
    pub fn parse_lines<I>(&self, lines: I) -> FrameParser<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        FrameParser::new(self, lines.into_iter())
    }

    /// Parse the whole source, failing on the first bad line.
    pub fn parse_all(&self, source: &str) -> Result<Vec<Frame>, ParseError> {
        self.parse(source).collect()
    }

    /// Parse one line, numbering it `line` in errors and in the frame.
    pub fn parse_line(&self, line: usize, text: &str) -> Result<Frame, ParseError> {
        LineParser::new(self, line).parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_collects_frames() {
        let frames = Notation::default()
            .parse_all("8Z;bpm=120\n\n[ZV2]")
            .unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].notes.len(), 1);
        assert_eq!(frames[0].directive("bpm"), Some("120"));
        assert!(frames[1].is_empty());
        assert_eq!(frames[2].obstacles.len(), 1);
    }

    #[test]
    fn parse_all_reports_failing_line() {
        let err = Notation::default().parse_all("8Z\n8X\n8Y").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, ParseErrorKind::UnrecognizedSymbol('Y'));
    }

    #[test]
    fn parse_is_restartable() {
        let notation = Notation::default();
        let source = "8Z\n2X";
        let first: Vec<_> = notation.parse(source).collect();
        let second: Vec<_> = notation.parse(source).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn parse_lines_accepts_owned_strings() {
        let lines = vec!["8Z".to_string(), "2X".to_string()];
        let frames: Vec<Frame> = Notation::default()
            .parse_lines(lines)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].line, 2);
    }

    #[test]
    fn parse_line_uses_given_line_number() {
        let err = Notation::default().parse_line(42, "%").unwrap_err();
        assert_eq!(err.line, 42);
    }

    #[test]
    fn parse_with_custom_alphabets() {
        let codec = GridCodec::new("abcdefghijklmnopqrstuvwx", "123456789", '!', '(', ')').unwrap();
        let notation = Notation::new(codec, false);
        let frame = notation.parse_line(1, "1 a x (ax3)").unwrap();
        assert_eq!(frame.notes.len(), 2);
        assert_eq!(frame.notes[0].direction, Some(CutDirection::Up));
        assert_eq!(frame.notes[1].color, Color::Blue);
        assert_eq!((frame.notes[1].x, frame.notes[1].y), (3, 2));
        assert_eq!(frame.obstacles.len(), 1);
    }
}
