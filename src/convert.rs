//! End-to-end conversion: notation file in, level directory out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::audio::{self, AudioPlan, FINAL_AUDIO_NAME};
use crate::config;
use crate::emit::{self, Emission, Event, EventKind, SongConfig};
use crate::level::{self, COVER_IMAGE_NAME};
use crate::notation::{Difficulty, Notation};

/// Inputs for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    /// Notation config file; falls back to ~/.textsaber/notation.yaml.
    pub notation: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
    pub skip_audio: bool,
}

/// What a conversion produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub frames: usize,
    pub notes: usize,
    pub obstacles: usize,
    pub difficulties: Vec<Difficulty>,
    pub audio: Option<PathBuf>,
    pub cover: Option<PathBuf>,
    pub written: Vec<PathBuf>,
}

/// Parse and emit a whole source text. Returns the events and the song
/// settings the directives left behind.
pub fn compile_source(source: &str, notation: &Notation) -> Result<(Vec<Event>, SongConfig)> {
    let frames = notation.parse_all(source)?;
    let mut song = SongConfig::new();
    let events = emit::emit(&frames, &mut song)?;
    Ok((events, song))
}

/// Run a full conversion.
pub fn convert(options: &ConvertOptions) -> Result<ConversionSummary> {
    let notation = config::resolve_notation(options.notation.as_deref())
        .context("failed to load notation config")?;

    let source = std::fs::read_to_string(&options.input)
        .with_context(|| format!("failed to read {}", options.input.display()))?;
    let frames = notation
        .parse_all(&source)
        .with_context(|| format!("failed to parse {}", options.input.display()))?;

    let mut song = SongConfig::new();
    let events = {
        let mut emission = Emission::new(&frames, &mut song);
        let events = emission
            .by_ref()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("failed to expand {}", options.input.display()))?;
        if !emission.procedures().is_empty() {
            debug!(procedures = emission.procedures().len(), "defined procedures");
        }
        events
    };

    let notes = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Note(_)))
        .count();
    info!(
        frames = frames.len(),
        events = events.len(),
        notes,
        "compiled notation"
    );
    if let Some(beats) = song.lead_in_beats().filter(|b| *b > 0.0) {
        info!(seconds = song.lead_in_silence, beats, "lead-in silence");
    }

    // Levels are built before the output directory is touched so a bad
    // notation file leaves nothing behind.
    let set = level::build_level_set(
        &events,
        &song,
        FINAL_AUDIO_NAME,
        cover_source(&options.input).map(|_| COVER_IMAGE_NAME.to_string()),
    )?;

    std::fs::create_dir_all(&options.out_dir)
        .with_context(|| format!("failed to create {}", options.out_dir.display()))?;

    let audio = if options.skip_audio {
        None
    } else {
        prepare_audio(&options.input, &options.out_dir, &song, options.ffmpeg.as_deref())?
    };

    let cover = copy_cover(&options.input, &options.out_dir)?;

    let written = level::write_level_set(&options.out_dir, &set)?;
    info!(
        levels = set.levels.len(),
        out_dir = %options.out_dir.display(),
        "wrote level files"
    );

    Ok(ConversionSummary {
        frames: frames.len(),
        notes,
        obstacles: events.len() - notes,
        difficulties: set.levels.iter().map(|(d, _)| *d).collect(),
        audio,
        cover,
        written,
    })
}

/// Audio paths in the notation are relative to the input file.
fn prepare_audio(
    input: &Path,
    out_dir: &Path,
    song: &SongConfig,
    ffmpeg: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let Some(plan) = AudioPlan::resolve(song) else {
        return Ok(None);
    };
    let plan = match input.parent() {
        Some(base) => plan.relative_to(base),
        None => plan,
    };
    let written = audio::prepare_audio(&plan, out_dir, ffmpeg)
        .with_context(|| format!("failed to prepare audio {}", plan.source().display()))?;
    info!(audio = %written.display(), transcoded = plan.needs_ffmpeg(), "prepared audio");
    Ok(Some(written))
}

/// `<input>.jpg`, if it exists.
fn cover_source(input: &Path) -> Option<PathBuf> {
    Some(input.with_extension("jpg")).filter(|cover| cover.is_file())
}

/// Copy `<input>.jpg` to the level's cover image if it exists.
fn copy_cover(input: &Path, out_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(cover) = cover_source(input) else {
        return Ok(None);
    };
    let dest = out_dir.join(COVER_IMAGE_NAME);
    std::fs::copy(&cover, &dest)
        .with_context(|| format!("failed to copy cover {}", cover.display()))?;
    Ok(Some(dest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_source_collects_song_settings() {
        let (events, song) =
            compile_source("8Z;bpm=120;title=Test\n2X", &Notation::default()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(song.bpm, Some(120.0));
        assert_eq!(song.title.as_deref(), Some("Test"));
    }

    #[test]
    fn compile_source_reports_parse_errors() {
        let err = compile_source("8Z\n8[Z", &Notation::default()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn cover_is_copied_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("song.txt");
        std::fs::write(dir.path().join("song.jpg"), b"jpg").unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let cover = copy_cover(&input, &out).unwrap();
        assert_eq!(cover, Some(out.join("cover.jpg")));
    }

    #[test]
    fn missing_cover_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cover = copy_cover(&dir.path().join("song.txt"), dir.path()).unwrap();
        assert!(cover.is_none());
    }
}
