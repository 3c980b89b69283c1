use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};

pub struct EncoderSettings<'a> {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub codec: &'a str,
    pub pix_fmt: &'a str,
    pub crf: u32,
}

/// Pipes raw RGBA frames into an ffmpeg child process, muxed with the
/// source audio.
pub struct FfmpegEncoder {
    child: Child,
    frames_written: u64,
}

impl FfmpegEncoder {
    pub fn new(output_path: &Path, input_audio: &Path, settings: &EncoderSettings) -> Result<Self> {
        let child = Command::new("ffmpeg")
            .args(encoder_args(output_path, input_audio, settings))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn ffmpeg. Is ffmpeg installed?")?;

        log::info!(
            "FFmpeg encoder started: {}x{} @ {}fps, codec={}",
            settings.width,
            settings.height,
            settings.fps,
            settings.codec
        );

        Ok(Self {
            child,
            frames_written: 0,
        })
    }

    pub fn write_frame(&mut self, rgba_pixels: &[u8]) -> Result<()> {
        let stdin = self.child.stdin.as_mut().context("FFmpeg stdin not available")?;
        stdin
            .write_all(rgba_pixels)
            .with_context(|| format!("Failed to write frame {} to ffmpeg", self.frames_written))?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        // Closing stdin signals end of stream.
        drop(self.child.stdin.take());

        let output = self.child.wait_with_output().context("Failed to wait for ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("FFmpeg exited with error:\n{}", stderr);
        }

        log::info!("FFmpeg encoding complete ({} frames)", self.frames_written);
        Ok(())
    }
}

fn encoder_args(output_path: &Path, input_audio: &Path, settings: &EncoderSettings) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-y",
        "-f",
        "rawvideo",
        "-pixel_format",
        "rgba",
        "-video_size",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();

    args.push(format!("{}x{}", settings.width, settings.height).into());
    args.push("-framerate".into());
    args.push(settings.fps.to_string().into());
    args.push("-i".into());
    args.push("pipe:0".into());
    args.push("-i".into());
    args.push(input_audio.into());
    args.push("-c:v".into());
    args.push(settings.codec.into());
    args.push("-pix_fmt".into());
    args.push(settings.pix_fmt.into());
    args.push("-crf".into());
    args.push(settings.crf.to_string().into());
    args.push("-preset".into());
    args.push("medium".into());
    for arg in ["-c:a", "aac", "-b:a", "192k", "-shortest"] {
        args.push(arg.into());
    }
    args.push(output_path.into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_pipe_raw_rgba_with_source_audio() {
        let settings = EncoderSettings {
            width: 640,
            height: 360,
            fps: 60,
            codec: "libx264",
            pix_fmt: "yuv420p",
            crf: 20,
        };
        let args = encoder_args(Path::new("out.mp4"), Path::new("in.flac"), &settings);
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();

        let after = |flag: &str| {
            let i = args.iter().position(|a| a == flag).unwrap();
            args[i + 1].clone()
        };
        assert_eq!(after("-video_size"), "640x360");
        assert_eq!(after("-framerate"), "60");
        assert_eq!(after("-crf"), "20");
        assert!(args.contains(&"in.flac".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }
}
