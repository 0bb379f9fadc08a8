//! Record/replay infrastructure for running without ImageMagick.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
