//! TextSaber: a text notation for rhythm-game levels.
//!
//! Each line of a notation file is one time step. [`notation`] parses lines
//! into frames, [`emit`] turns frames into timed events while expanding
//! procedures, and [`level`] writes the events out as per-difficulty level
//! files. [`convert`] ties the steps together with [`audio`] preparation.

pub mod audio;
pub mod config;
pub mod convert;
pub mod emit;
pub mod level;
pub mod notation;
