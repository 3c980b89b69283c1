pub mod ffmpeg;
pub mod stats;
