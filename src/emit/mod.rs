//! Emission engine: frames → timed [`Event`]s.
//!
//! [`Emission`] walks the frame sequence once, applying each frame's
//! directives in [`Directive::ORDER`], expanding procedures, then stamping
//! the frame's own notes and obstacles with the running time. Every frame
//! advances the clock by `1 / measure` beats, placements or not.
//!
//! Procedures come in two flavors:
//! - `proc_add` layers the body on a forked timeline; the caller's clock is
//!   untouched afterwards.
//! - `proc_ins` splices the body into the caller's timeline; time, measure
//!   and tempo changes made by the body stay in effect.
//!
//! Expansion is depth-first with an explicit cursor stack, so events are
//! produced lazily and a consumer can stop pulling at any point.

pub mod directive;
pub mod error;
pub mod event;
pub mod procedure;
pub mod song;
pub mod state;

pub use directive::Directive;
pub use error::EmitError;
pub use event::{Event, EventKind};
pub use procedure::{ProcedureDecl, ProcedureRegistry};
pub use song::SongConfig;
pub use state::EmissionState;

use std::collections::VecDeque;
use std::ops::Range;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::notation::{Frame, Obstacle};

/// Progress of a cursor through its current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Directives,
    Insert,
    Place,
}

/// One level of the traversal: the top-level sequence or a procedure body.
#[derive(Debug)]
struct Cursor {
    frames: Range<usize>,
    pos: usize,
    /// Index into `Emission::states`.
    slot: usize,
    /// Whether the slot was pushed for this cursor and dies with it.
    owns_slot: bool,
    procedure: Option<String>,
    stage: Stage,
    frame_offset: f64,
    insert: Option<String>,
}

impl Cursor {
    fn new(frames: Range<usize>, slot: usize, owns_slot: bool, procedure: Option<String>) -> Self {
        Self {
            pos: frames.start,
            frames,
            slot,
            owns_slot,
            procedure,
            stage: Stage::Directives,
            frame_offset: 0.0,
            insert: None,
        }
    }
}

/// Directive effects that apply after the directive pass.
#[derive(Debug, Default)]
struct FrameEffects {
    frame_offset: f64,
    add: Option<String>,
    insert: Option<String>,
}

/// Lazy event stream over a frame sequence.
///
/// Yields `Err` at most once; the stream ends after an error.
pub struct Emission<'a> {
    frames: &'a [Frame],
    song: &'a mut SongConfig,
    procedures: ProcedureRegistry,
    /// Slot 0 is the top-level timeline; forked timelines are pushed above it.
    states: Vec<EmissionState>,
    stack: Vec<Cursor>,
    pending: VecDeque<Event>,
}

impl<'a> Emission<'a> {
    /// Start a top-level run at time 0, measure 1, no tempo.
    pub fn new(frames: &'a [Frame], song: &'a mut SongConfig) -> Self {
        Self::with_state(frames, song, EmissionState::new())
    }

    /// Start a top-level run from an existing timeline.
    pub fn with_state(frames: &'a [Frame], song: &'a mut SongConfig, state: EmissionState) -> Self {
        Self {
            frames,
            song,
            procedures: ProcedureRegistry::new(),
            states: vec![state],
            stack: vec![Cursor::new(0..frames.len(), 0, false, None)],
            pending: VecDeque::new(),
        }
    }

    /// The top-level timeline.
    pub fn state(&self) -> &EmissionState {
        &self.states[0]
    }

    pub fn procedures(&self) -> &ProcedureRegistry {
        &self.procedures
    }

    /// Drop the stream and return the top-level timeline as it stands.
    pub fn into_state(self) -> EmissionState {
        self.states.into_iter().next().unwrap_or_default()
    }

    fn step(&mut self) -> Result<(), EmitError> {
        let depth = self.stack.len() - 1;
        let (pos, slot, stage) = {
            let cursor = &self.stack[depth];
            (cursor.pos, cursor.slot, cursor.stage)
        };
        let frames = self.frames;
        let frame = &frames[pos];

        match stage {
            Stage::Directives => {
                let effects = self.apply_directives(frame, pos, slot, depth == 0)?;
                let cursor = &mut self.stack[depth];
                cursor.frame_offset = effects.frame_offset;
                cursor.insert = effects.insert;
                cursor.stage = Stage::Insert;
                if let Some(name) = effects.add {
                    let forked = self.states[slot].fork();
                    self.expand_isolated(forked, &name, frame.line)?;
                }
            }
            Stage::Insert => {
                let cursor = &mut self.stack[depth];
                cursor.stage = Stage::Place;
                if let Some(name) = cursor.insert.take() {
                    self.expand_linked(slot, &name, frame.line)?;
                }
            }
            Stage::Place => {
                let frame_offset = self.stack[depth].frame_offset;
                self.place(frame, slot, frame_offset);
                let cursor = &mut self.stack[depth];
                cursor.pos += 1;
                cursor.stage = Stage::Directives;
            }
        }
        Ok(())
    }

    fn apply_directives(
        &mut self,
        frame: &Frame,
        pos: usize,
        slot: usize,
        top_level: bool,
    ) -> Result<FrameEffects, EmitError> {
        let line = frame.line;
        let mut effects = FrameEffects::default();
        let state = &mut self.states[slot];

        for directive in Directive::ORDER {
            let Some(raw) = frame.directive(directive.key()) else {
                continue;
            };
            match directive {
                Directive::SetTime => {
                    state.time = self.song.lead_in_silence + number(directive, raw, line)?;
                }
                Directive::Bpm => {
                    let bpm = number(directive, raw, line)?;
                    self.song.bpm = Some(bpm);
                    state.set_bpm(bpm);
                }
                Directive::IntroSilence => {
                    let seconds = number(directive, raw, line)?;
                    let bpm = self.song.bpm.ok_or(EmitError::TempoUnset { line })?;
                    state.time += bpm * seconds / 60.0;
                    self.song.lead_in_silence += seconds;
                }
                Directive::AudioFile => self.song.audio_file = Some(PathBuf::from(raw)),
                Directive::Title => self.song.title = Some(raw.to_string()),
                Directive::Subtitle => self.song.subtitle = Some(raw.to_string()),
                Directive::Author => self.song.author = Some(raw.to_string()),
                Directive::AudioOffsetMs => {
                    self.song.offset_ms = number(directive, raw, line)?;
                }
                Directive::Measure => {
                    let measure = number(directive, raw, line)?;
                    if !(measure > 0.0 && measure.is_finite()) {
                        return Err(EmitError::InvalidMeasure {
                            line,
                            value: measure,
                        });
                    }
                    state.measure = measure;
                }
                Directive::Offset => state.shift(number(directive, raw, line)?),
                Directive::FrameOffset => effects.frame_offset = number(directive, raw, line)?,
                Directive::Proc if top_level => {
                    let decl = ProcedureDecl::parse(raw, line)?;
                    let name = decl.name.clone();
                    let body = self.procedures.define(decl, pos, self.frames.len(), line)?;
                    debug!(line, name = %name, frames = body.len(), "defined procedure");
                }
                Directive::Proc => {
                    trace!(line, "nested procedure definition ignored");
                }
                Directive::ProcAdd => effects.add = Some(raw.to_string()),
                Directive::ProcIns => effects.insert = Some(raw.to_string()),
            }
        }

        for key in frame.directives.keys() {
            if Directive::from_key(key).is_none() {
                trace!(line, key = %key, "unknown directive ignored");
            }
        }

        Ok(effects)
    }

    /// Expand `name` on its own timeline. Changes made by the body are
    /// dropped when it finishes.
    fn expand_isolated(
        &mut self,
        state: EmissionState,
        name: &str,
        line: usize,
    ) -> Result<(), EmitError> {
        let body = self.resolve(name, line)?;
        self.states.push(state);
        let slot = self.states.len() - 1;
        self.stack
            .push(Cursor::new(body, slot, true, Some(name.to_string())));
        Ok(())
    }

    /// Expand `name` on the caller's timeline in `slot`.
    fn expand_linked(&mut self, slot: usize, name: &str, line: usize) -> Result<(), EmitError> {
        let body = self.resolve(name, line)?;
        self.stack
            .push(Cursor::new(body, slot, false, Some(name.to_string())));
        Ok(())
    }

    fn resolve(&self, name: &str, line: usize) -> Result<Range<usize>, EmitError> {
        let active = self
            .stack
            .iter()
            .any(|cursor| cursor.procedure.as_deref() == Some(name));
        if active {
            return Err(EmitError::RecursiveProcedure {
                line,
                name: name.to_string(),
            });
        }
        self.procedures.lookup(name, line)
    }

    /// Stamp the frame's placements and advance one tick.
    fn place(&mut self, frame: &Frame, slot: usize, frame_offset: f64) {
        let state = &mut self.states[slot];
        let measure = state.measure;
        let time = state.time + frame_offset / measure;

        self.pending
            .extend(frame.notes.iter().map(|&note| Event::note(time, note)));
        self.pending.extend(frame.obstacles.iter().map(|&obstacle| {
            Event::obstacle(
                time,
                Obstacle {
                    length: obstacle.length / measure,
                    ..obstacle
                },
            )
        }));

        state.advance();
    }

    fn finish_cursor(&mut self) {
        if let Some(cursor) = self.stack.pop() {
            if cursor.owns_slot {
                self.states.pop();
            }
            if let Some(name) = cursor.procedure {
                trace!(name = %name, "procedure expansion finished");
            }
        }
    }
}

impl Iterator for Emission<'_> {
    type Item = Result<Event, EmitError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            let cursor = self.stack.last()?;
            if cursor.pos >= cursor.frames.end {
                self.finish_cursor();
                continue;
            }
            if let Err(err) = self.step() {
                self.stack.clear();
                return Some(Err(err));
            }
        }
    }
}

/// Run a full top-level emission and collect every event.
pub fn emit(frames: &[Frame], song: &mut SongConfig) -> Result<Vec<Event>, EmitError> {
    Emission::new(frames, song).collect()
}

fn number(directive: Directive, raw: &str, line: usize) -> Result<f64, EmitError> {
    raw.parse().map_err(|_| EmitError::InvalidNumericLiteral {
        line,
        key: directive.key(),
        value: raw.to_string(),
    })
}
