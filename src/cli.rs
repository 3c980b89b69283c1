use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sonic-spectrum", about = "Render an audio track's spectrum as an animated visualization video")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Output video file
    #[arg(short, long, default_value = "output.mp4")]
    pub output: PathBuf,

    /// Visual style (bars, circle, nebula, neural, quantum, organic) or "all"
    #[arg(short, long, default_value = "bars")]
    pub style: String,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 1080)]
    pub height: u32,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Playback volume (0.0-1.0), applied before analysis
    #[arg(long, default_value_t = 1.0)]
    pub volume: f32,

    /// Primary theme colour as #rrggbb
    #[arg(long)]
    pub color: Option<String>,

    /// Use the dark theme
    #[arg(long)]
    pub dark_mode: bool,

    /// Stop after this many seconds of audio (quick previews)
    #[arg(long)]
    pub limit: Option<f64>,

    /// Write per-frame frequency/amplitude stats as JSON lines
    #[arg(long)]
    pub stats: Option<PathBuf>,

    /// Config file (defaults to ./sonic-spectrum.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// H.264 CRF quality (0-51, lower = better)
    #[arg(long, default_value_t = 18)]
    pub crf: u32,

    /// FFmpeg video codec
    #[arg(long, default_value = "libx264")]
    pub codec: String,

    /// FFmpeg pixel format
    #[arg(long, default_value = "yuv420p")]
    pub pix_fmt: String,

    /// List available visual styles and exit
    #[arg(long)]
    pub list_styles: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["sonic-spectrum", "song.mp3"]);
        assert_eq!(cli.input, Some(PathBuf::from("song.mp3")));
        assert_eq!(cli.style, "bars");
        assert_eq!((cli.width, cli.height, cli.fps), (1920, 1080, 60));
        assert!(!cli.dark_mode);
        assert_eq!(cli.limit, None);
    }

    #[test]
    fn style_and_theme_flags() {
        let cli = Cli::parse_from([
            "sonic-spectrum",
            "song.wav",
            "-s",
            "all",
            "--color",
            "#4ecdc4",
            "--dark-mode",
            "--volume",
            "0.4",
            "--limit",
            "12.5",
        ]);
        assert_eq!(cli.style, "all");
        assert_eq!(cli.color.as_deref(), Some("#4ecdc4"));
        assert!(cli.dark_mode);
        assert_eq!(cli.volume, 0.4);
        assert_eq!(cli.limit, Some(12.5));
    }
}
