//! Line parser for the note notation.
//!
//! Each input line becomes one [`Frame`]. The part before the first `;` is
//! scanned character by character; every later `;`-separated segment is a
//! `key=value` directive.

use super::error::{ParseError, ParseErrorKind};
use super::frame::{CutDirection, Frame, Note, Obstacle};
use super::grid::Symbol;
use super::Notation;

/// Parses a single line. Holds the scan state that lives for one line only.
pub struct LineParser<'a> {
    notation: &'a Notation,
    frame: Frame,
    armed: Option<CutDirection>,
    /// Set by the bomb marker; the next position becomes a bomb.
    bomb_pending: bool,
    obstacle: Option<String>,
}

impl<'a> LineParser<'a> {
    pub fn new(notation: &'a Notation, line: usize) -> Self {
        Self {
            notation,
            frame: Frame::new(line),
            armed: None,
            bomb_pending: false,
            obstacle: None,
        }
    }

    pub fn parse(mut self, text: &str) -> Result<Frame, ParseError> {
        let mut segments = text.split(';');
        let placements = segments.next().unwrap_or("");

        for segment in segments {
            self.parse_directive(segment)?;
        }

        for c in placements.chars().filter(|c| !c.is_whitespace()) {
            self.scan(c)?;
        }

        if let Some(buffer) = self.obstacle.take() {
            return Err(self.error(ParseErrorKind::UnterminatedObstacle(buffer)));
        }

        Ok(self.frame)
    }

    fn parse_directive(&mut self, segment: &str) -> Result<(), ParseError> {
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| self.error(ParseErrorKind::MalformedDirective(segment.trim().into())))?;
        self.frame
            .directives
            .insert(key.trim().to_string(), value.trim().to_string());
        Ok(())
    }

    fn scan(&mut self, c: char) -> Result<(), ParseError> {
        let notation = self.notation;
        let codec = &notation.codec;

        if let Some(buffer) = self.obstacle.as_mut() {
            if c == codec.obstacle_open() {
                return Err(self.error(ParseErrorKind::UnexpectedObstacleNesting));
            }
            if c != codec.obstacle_close() {
                buffer.push(c);
                return Ok(());
            }
            let buffer = self.obstacle.take().unwrap_or_default();
            let obstacle = self.finish_obstacle(&buffer)?;
            self.frame.obstacles.push(obstacle);
            return Ok(());
        }

        match codec.classify(c) {
            Some(Symbol::ObstacleOpen) => {
                self.obstacle = Some(String::new());
            }
            Some(Symbol::Bomb) => {
                self.armed = None;
                self.bomb_pending = true;
            }
            Some(Symbol::Direction(direction)) => {
                self.armed = Some(direction);
                self.bomb_pending = false;
            }
            Some(Symbol::Position(pos)) if self.bomb_pending => {
                self.bomb_pending = false;
                self.frame.notes.push(Note::bomb(pos.x, pos.y));
            }
            Some(Symbol::Position(pos)) => match self.armed {
                Some(direction) => {
                    self.frame
                        .notes
                        .push(Note::colored(pos.x, pos.y, pos.color, direction));
                }
                None if notation.strict_directions => {
                    return Err(self.error(ParseErrorKind::PositionBeforeDirection(c)));
                }
                None => {
                    self.frame.notes.push(Note::bomb(pos.x, pos.y));
                }
            },
            Some(Symbol::ObstacleClose) | None => {
                return Err(self.error(ParseErrorKind::UnrecognizedSymbol(c)));
            }
        }
        Ok(())
    }

    /// Decode `<corner><corner><length>`. Corner colors are ignored.
    fn finish_obstacle(&self, buffer: &str) -> Result<Obstacle, ParseError> {
        let codec = &self.notation.codec;
        let mut chars = buffer.chars();
        let (Some(a), Some(b)) = (chars.next(), chars.next()) else {
            return Err(self.error(ParseErrorKind::IncompleteObstacle(buffer.into())));
        };

        let corner_a = codec
            .decode_position(a)
            .ok_or_else(|| self.error(ParseErrorKind::UnrecognizedSymbol(a)))?;
        let corner_b = codec
            .decode_position(b)
            .ok_or_else(|| self.error(ParseErrorKind::UnrecognizedSymbol(b)))?;

        let digits = chars.as_str();
        let length: i32 = digits
            .parse()
            .map_err(|_| self.error(ParseErrorKind::InvalidNumericLiteral(digits.into())))?;

        Ok(Obstacle::new(
            (corner_a.x, corner_a.y),
            (corner_b.x, corner_b.y),
            f64::from(length),
        ))
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.frame.line, kind)
    }
}

/// Lazy frame sequence over input lines. Stops after the first error.
pub struct FrameParser<'a, I> {
    notation: &'a Notation,
    lines: I,
    line: usize,
    failed: bool,
}

impl<'a, I> FrameParser<'a, I> {
    pub fn new(notation: &'a Notation, lines: I) -> Self {
        Self {
            notation,
            lines,
            line: 0,
            failed: false,
        }
    }
}

impl<I, S> Iterator for FrameParser<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<Frame, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let text = self.lines.next()?;
        self.line += 1;
        let result = LineParser::new(self.notation, self.line).parse(text.as_ref());
        self.failed = result.is_err();
        Some(result)
    }
}
