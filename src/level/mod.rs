//! Level export: partitions the event stream by difficulty and builds the
//! manifest and level file models.

pub mod model;
pub mod persistence;

pub use model::{Environment, LevelData, LevelInfo, LevelNote, LevelObstacle, SongInfo};
pub use persistence::{write_level_set, ExportError};

use crate::emit::{Event, EventKind, SongConfig};
use crate::notation::Difficulty;

pub const INFO_FILE_NAME: &str = "info.json";
pub const COVER_IMAGE_NAME: &str = "cover.jpg";

/// Level file name for a difficulty, e.g. `Expert.json`.
pub fn level_file_name(difficulty: Difficulty) -> String {
    format!("{}.json", difficulty.name())
}

/// Build one difficulty's level from every event whose mask includes it.
pub fn build_level(events: &[Event], difficulty: Difficulty, bpm: f64) -> LevelData {
    let mut level = LevelData::new(bpm);
    for event in events
        .iter()
        .filter(|e| e.difficulties().contains(difficulty))
    {
        match &event.kind {
            EventKind::Note(note) => level.notes.push(LevelNote::from_note(event.time, note)),
            EventKind::Obstacle(obstacle) => level
                .obstacles
                .push(LevelObstacle::from_obstacle(event.time, obstacle)),
        }
    }
    level
}

/// The manifest plus every non-empty level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    pub info: SongInfo,
    pub levels: Vec<(Difficulty, LevelData)>,
}

/// Assemble the manifest and levels. Difficulties without notes are left out.
pub fn build_level_set(
    events: &[Event],
    song: &SongConfig,
    audio_path: &str,
    cover_image_path: Option<String>,
) -> Result<LevelSet, ExportError> {
    let bpm = song.bpm.ok_or(ExportError::MissingTempo)?;

    let mut info = SongInfo {
        song_name: song.title.clone().unwrap_or_default(),
        song_sub_name: song.subtitle.clone().unwrap_or_default(),
        author_name: song.author.clone().unwrap_or_default(),
        beats_per_minute: bpm,
        preview_start_time: 0.0,
        preview_duration: 0.0,
        cover_image_path,
        environment_name: Environment::default(),
        difficulty_levels: Vec::new(),
    };

    let mut levels = Vec::new();
    for difficulty in Difficulty::ALL {
        let level = build_level(events, difficulty, bpm);
        if level.notes.is_empty() {
            continue;
        }
        info.difficulty_levels.push(LevelInfo {
            difficulty,
            difficulty_rank: difficulty.rank(),
            audio_path: audio_path.to_string(),
            json_path: level_file_name(difficulty),
            offset: song.offset_ms,
            old_offset: song.offset_ms,
        });
        levels.push((difficulty, level));
    }

    Ok(LevelSet { info, levels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{Color, CutDirection, DifficultyMask, Note, Obstacle};

    fn note_for(mask: DifficultyMask, time: f64) -> Event {
        let mut note = Note::colored(0, 0, Color::Red, CutDirection::Up);
        note.difficulties = mask;
        Event::note(time, note)
    }

    fn song() -> SongConfig {
        SongConfig {
            bpm: Some(120.0),
            title: Some("Song".into()),
            offset_ms: 15.0,
            ..SongConfig::default()
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(level_file_name(Difficulty::Easy), "Easy.json");
        assert_eq!(level_file_name(Difficulty::ExpertPlus), "ExpertPlus.json");
    }

    #[test]
    fn build_level_filters_by_mask() {
        let events = vec![
            note_for(DifficultyMask::only(Difficulty::Easy), 0.0),
            note_for(DifficultyMask::only(Difficulty::Expert), 1.0),
            note_for(DifficultyMask::ALL, 2.0),
        ];
        let easy = build_level(&events, Difficulty::Easy, 120.0);
        assert_eq!(easy.notes.len(), 2);
        assert!((easy.notes[1].time - 2.0).abs() < f64::EPSILON);
        let hard = build_level(&events, Difficulty::Hard, 120.0);
        assert_eq!(hard.notes.len(), 1);
    }

    #[test]
    fn build_level_keeps_obstacles() {
        let events = vec![
            note_for(DifficultyMask::ALL, 0.0),
            Event::obstacle(1.0, Obstacle::new((0, 0), (1, 0), 2.0)),
        ];
        let level = build_level(&events, Difficulty::Normal, 100.0);
        assert_eq!(level.obstacles.len(), 1);
        assert_eq!(level.obstacles[0].width, 2);
    }

    #[test]
    fn level_set_skips_empty_difficulties() {
        let events = vec![note_for(DifficultyMask::only(Difficulty::Hard), 0.0)];
        let set = build_level_set(&events, &song(), "song.ogg", None).unwrap();
        assert_eq!(set.levels.len(), 1);
        assert_eq!(set.levels[0].0, Difficulty::Hard);
        assert_eq!(set.info.difficulty_levels.len(), 1);
        let entry = &set.info.difficulty_levels[0];
        assert_eq!(entry.json_path, "Hard.json");
        assert_eq!(entry.difficulty_rank, 2);
        assert!((entry.offset - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn obstacle_only_difficulty_is_skipped() {
        let events = vec![Event::obstacle(0.0, Obstacle::new((0, 0), (0, 0), 1.0))];
        let set = build_level_set(&events, &song(), "song.ogg", None).unwrap();
        assert!(set.levels.is_empty());
        assert!(set.info.difficulty_levels.is_empty());
    }

    #[test]
    fn level_set_fills_manifest() {
        let events = vec![note_for(DifficultyMask::ALL, 0.0)];
        let set =
            build_level_set(&events, &song(), "song.ogg", Some(COVER_IMAGE_NAME.into())).unwrap();
        assert_eq!(set.levels.len(), 5);
        assert_eq!(set.info.song_name, "Song");
        assert_eq!(set.info.song_sub_name, "");
        assert_eq!(set.info.cover_image_path.as_deref(), Some("cover.jpg"));
        assert!((set.info.beats_per_minute - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn level_set_needs_tempo() {
        let err = build_level_set(&[], &SongConfig::default(), "song.ogg", None).unwrap_err();
        assert!(matches!(err, ExportError::MissingTempo));
    }
}
