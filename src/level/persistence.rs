//! Level persistence: writes the manifest and level files as JSON.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::{level_file_name, LevelSet, INFO_FILE_NAME};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no bpm set; add a bpm directive before exporting")]
    MissingTempo,
    #[error("failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Write `info.json` and one file per level into `out_dir`, creating it as
/// needed. Returns the written paths, manifest first.
pub fn write_level_set(out_dir: &Path, set: &LevelSet) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(set.levels.len() + 1);

    let info_path = out_dir.join(INFO_FILE_NAME);
    write_json(&info_path, &set.info)?;
    written.push(info_path);

    for (difficulty, level) in &set.levels {
        let path = out_dir.join(level_file_name(*difficulty));
        write_json(&path, level)?;
        written.push(path);
    }

    Ok(written)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string(value).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{Event, SongConfig};
    use crate::level::{build_level_set, LevelData, SongInfo};
    use crate::notation::{Color, CutDirection, Note};

    fn sample_set() -> LevelSet {
        let events = vec![Event::note(
            0.0,
            Note::colored(1, 1, Color::Blue, CutDirection::Right),
        )];
        let song = SongConfig {
            bpm: Some(100.0),
            ..SongConfig::default()
        };
        build_level_set(&events, &song, "song.ogg", None).unwrap()
    }

    #[test]
    fn writes_manifest_and_levels() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_level_set(dir.path(), &sample_set()).unwrap();
        assert_eq!(written.len(), 6);
        assert_eq!(written[0], dir.path().join("info.json"));
        assert!(dir.path().join("Easy.json").exists());
        assert!(dir.path().join("ExpertPlus.json").exists());
    }

    #[test]
    fn written_files_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        let set = sample_set();
        write_level_set(dir.path(), &set).unwrap();

        let info: SongInfo =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("info.json")).unwrap())
                .unwrap();
        assert_eq!(info, set.info);

        let level: LevelData =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("Hard.json")).unwrap())
                .unwrap();
        assert_eq!(level.notes.len(), 1);
        assert_eq!(level.notes[0].cut_direction, 3);
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");
        write_level_set(&out, &sample_set()).unwrap();
        assert!(out.join("info.json").exists());
    }
}
