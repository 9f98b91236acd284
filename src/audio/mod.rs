//! Audio preparation: copies or transcodes the song's audio into the level
//! directory as `song.ogg`, prepending lead-in silence when requested.
//!
//! Transcoding shells out to `ffmpeg`. The decision of what to do is a pure
//! [`AudioPlan`] so it can be inspected without touching the filesystem.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::emit::SongConfig;

/// File name of the prepared audio inside the level directory.
pub const FINAL_AUDIO_NAME: &str = "song.ogg";

const VORBIS_CODEC: &str = "libvorbis";
const VORBIS_BITRATE: &str = "192k";
const SILENCE_SOURCE: &str = "anullsrc=channel_layout=stereo:sample_rate=44100";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("ffmpeg not found; install it or pass --ffmpeg")]
    FfmpegNotFound,
    #[error("ffmpeg path {0} does not exist")]
    FfmpegMissing(PathBuf),
    #[error("audio file {0} does not exist")]
    SourceMissing(PathBuf),
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error("failed to start ffmpeg: {0}")]
    Spawn(io::Error),
    #[error("ffmpeg exited with code {code}: {stderr}")]
    Ffmpeg { code: i32, stderr: String },
}

/// What has to happen to get the song's audio into place.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioPlan {
    /// The source is already Ogg and needs no silence.
    Copy { source: PathBuf },
    /// Re-encode to Ogg Vorbis, optionally prefixed with `lead_in` seconds
    /// of silence.
    Transcode {
        source: PathBuf,
        lead_in: Option<f64>,
    },
}

impl AudioPlan {
    /// Decide the plan for a song. `None` when no audio file was set.
    pub fn resolve(song: &SongConfig) -> Option<Self> {
        let source = song.audio_file.clone()?;
        let lead_in = (song.lead_in_silence > 0.0).then_some(song.lead_in_silence);
        if lead_in.is_none() && is_ogg(&source) {
            Some(AudioPlan::Copy { source })
        } else {
            Some(AudioPlan::Transcode { source, lead_in })
        }
    }

    pub fn source(&self) -> &Path {
        match self {
            AudioPlan::Copy { source } | AudioPlan::Transcode { source, .. } => source,
        }
    }

    /// Same plan with the source resolved against `base` if it is relative.
    pub fn relative_to(self, base: &Path) -> Self {
        let rebase = |source: PathBuf| {
            if source.is_relative() {
                base.join(source)
            } else {
                source
            }
        };
        match self {
            AudioPlan::Copy { source } => AudioPlan::Copy {
                source: rebase(source),
            },
            AudioPlan::Transcode { source, lead_in } => AudioPlan::Transcode {
                source: rebase(source),
                lead_in,
            },
        }
    }

    pub fn needs_ffmpeg(&self) -> bool {
        matches!(self, AudioPlan::Transcode { .. })
    }
}

fn is_ogg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ogg"))
}

/// A located ffmpeg executable.
#[derive(Debug, Clone, PartialEq)]
pub struct Ffmpeg {
    path: PathBuf,
}

impl Ffmpeg {
    /// Use `explicit` if given, otherwise search `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, AudioError> {
        match explicit {
            Some(path) if path.exists() => Ok(Self {
                path: path.to_path_buf(),
            }),
            Some(path) => Err(AudioError::FfmpegMissing(path.to_path_buf())),
            None => which::which("ffmpeg")
                .map(|path| Self { path })
                .map_err(|_| AudioError::FfmpegNotFound),
        }
    }

    /// Encode `source` to Ogg Vorbis at `dest`.
    pub fn transcode(
        &self,
        source: &Path,
        lead_in: Option<f64>,
        dest: &Path,
    ) -> Result<(), AudioError> {
        tracing::debug!(
            ffmpeg = %self.path.display(),
            source = %source.display(),
            ?lead_in,
            "transcoding audio"
        );

        let output = Command::new(&self.path)
            .args(transcode_args(source, lead_in, dest))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(AudioError::Spawn)?;

        if !output.status.success() {
            return Err(AudioError::Ffmpeg {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// ffmpeg arguments for encoding `source` to `dest`, with generated silence
/// concatenated in front when `lead_in` is set.
pub fn transcode_args(source: &Path, lead_in: Option<f64>, dest: &Path) -> Vec<OsString> {
    let mut args = os_args(&["-y", "-hide_banner", "-loglevel", "error"]);

    match lead_in {
        Some(seconds) => {
            args.extend(os_args(&["-f", "lavfi", "-t", &seconds.to_string()]));
            args.extend(os_args(&["-i", SILENCE_SOURCE, "-i"]));
            args.push(source.into());
            args.extend(os_args(&[
                "-filter_complex",
                "[0:a][1:a]concat=n=2:v=0:a=1[a]",
                "-map",
                "[a]",
            ]));
        }
        None => {
            args.push("-i".into());
            args.push(source.into());
            args.push("-vn".into());
        }
    }

    args.extend(os_args(&["-codec:a", VORBIS_CODEC, "-b:a", VORBIS_BITRATE]));
    args.push(dest.into());
    args
}

fn os_args(items: &[&str]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}

/// Carry out `plan`, writing `song.ogg` into `out_dir`. `ffmpeg` is only
/// consulted for transcodes. Returns the written path.
pub fn prepare_audio(
    plan: &AudioPlan,
    out_dir: &Path,
    ffmpeg: Option<&Path>,
) -> Result<PathBuf, AudioError> {
    let source = plan.source();
    if !source.exists() {
        return Err(AudioError::SourceMissing(source.to_path_buf()));
    }
    let dest = out_dir.join(FINAL_AUDIO_NAME);

    match plan {
        AudioPlan::Copy { source } => {
            tracing::debug!(source = %source.display(), "copying ogg audio");
            std::fs::copy(source, &dest).map_err(|e| AudioError::Copy {
                from: source.clone(),
                to: dest.clone(),
                source: e,
            })?;
        }
        AudioPlan::Transcode { source, lead_in } => {
            Ffmpeg::locate(ffmpeg)?.transcode(source, *lead_in, &dest)?;
        }
    }
    Ok(dest)
}
