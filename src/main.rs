//! TextSaber: converts a notation file into a playable level directory.
//!
//! ```bash
//! textsaber song.txt out/
//! textsaber song.txt out/ --notation my-keys.yaml --skip-audio
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use textsaber::convert::{convert, ConvertOptions};

/// Convert a TextSaber notation file into level files.
#[derive(Parser)]
#[command(name = "textsaber")]
#[command(version)]
struct Cli {
    /// Notation file to convert
    input: PathBuf,

    /// Directory to write the level into (created if missing)
    out_dir: PathBuf,

    /// Notation config overriding the symbol alphabets
    #[arg(long, value_name = "FILE")]
    notation: Option<PathBuf>,

    /// ffmpeg executable used for audio transcoding
    #[arg(long, value_name = "PATH")]
    ffmpeg: Option<PathBuf>,

    /// Do not copy or transcode the song audio
    #[arg(long)]
    skip_audio: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let summary = convert(&ConvertOptions {
        input: cli.input,
        out_dir: cli.out_dir,
        notation: cli.notation,
        ffmpeg: cli.ffmpeg,
        skip_audio: cli.skip_audio,
    })?;

    println!(
        "{} notes, {} obstacles across {} difficulties",
        summary.notes,
        summary.obstacles,
        summary.difficulties.len()
    );
    for path in &summary.written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}
