//! The closed set of frame directives and their processing order.

/// A directive recognized by the emission engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    SetTime,
    Bpm,
    IntroSilence,
    AudioFile,
    Title,
    Subtitle,
    Author,
    AudioOffsetMs,
    Measure,
    Offset,
    FrameOffset,
    Proc,
    ProcAdd,
    ProcIns,
}

impl Directive {
    /// Processing order within one frame. Later directives see the effects
    /// of earlier ones.
    pub const ORDER: [Directive; 14] = [
        Directive::SetTime,
        Directive::Bpm,
        Directive::IntroSilence,
        Directive::AudioFile,
        Directive::Title,
        Directive::Subtitle,
        Directive::Author,
        Directive::AudioOffsetMs,
        Directive::Measure,
        Directive::Offset,
        Directive::FrameOffset,
        Directive::Proc,
        Directive::ProcAdd,
        Directive::ProcIns,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Directive::SetTime => "set_time",
            Directive::Bpm => "bpm",
            Directive::IntroSilence => "intro_silence",
            Directive::AudioFile => "audio_file",
            Directive::Title => "title",
            Directive::Subtitle => "subtitle",
            Directive::Author => "author",
            Directive::AudioOffsetMs => "audio_offset_ms",
            Directive::Measure => "measure",
            Directive::Offset => "offset",
            Directive::FrameOffset => "frame_offset",
            Directive::Proc => "proc",
            Directive::ProcAdd => "proc_add",
            Directive::ProcIns => "proc_ins",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|d| d.key() == key)
    }
}
