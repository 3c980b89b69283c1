mod audio;
mod cli;
mod config;
mod encode;
mod engine;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use audio::spectrum::TrackSpectrum;
use audio::transport::{PlaybackState, Transport};
use cli::Cli;
use encode::ffmpeg::{EncoderSettings, FfmpegEncoder};
use encode::stats::StatsWriter;
use engine::scheduler::{FrameOutcome, Scheduler};
use render::color::Theme;
use render::raster::Raster;
use render::style::VisualStyle;

/// A style and the frame at which it hands over to the next one.
#[derive(Debug, PartialEq)]
struct StyleSlot {
    style: VisualStyle,
    end_frame: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    let mut audio_config = config::AudioConfig::default();
    if let Some(path) = config::find_config(cli.config.as_deref()) {
        match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                // Config values apply only where the CLI was left at its default
                if cli.width == config::default_width() { cli.width = cfg.output.width; }
                if cli.height == config::default_height() { cli.height = cfg.output.height; }
                if cli.fps == config::default_fps() { cli.fps = cfg.output.fps; }
                if cli.crf == config::default_crf() { cli.crf = cfg.output.crf; }
                if cli.codec == config::default_codec() { cli.codec = cfg.output.codec; }
                if cli.pix_fmt == config::default_pix_fmt() { cli.pix_fmt = cfg.output.pix_fmt; }
                if cli.style == config::default_style() { cli.style = cfg.visual.style; }
                if cli.volume == config::default_volume() { cli.volume = cfg.audio.volume; }
                if cli.color.is_none() { cli.color = cfg.visual.color; }
                cli.dark_mode |= cfg.visual.dark_mode;
                audio_config = cfg.audio;
            }
            Err(err) => log::warn!("Ignoring config: {:#}", err),
        }
    }

    if cli.list_styles {
        println!("Available styles:");
        for style in VisualStyle::ALL {
            println!("  {:<10} {}", style.name(), style.description());
        }
        println!("  {:<10} {}", "all", "Every style in turn, in equal slices of the track");
        return Ok(());
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    if cli.fps == 0 {
        anyhow::bail!("--fps must be positive");
    }

    let theme = Theme::resolve(cli.color.as_deref(), cli.dark_mode)?;

    log::info!("sonic-spectrum - audio spectrum visualizer");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!("Style: {}", cli.style);
    log::info!("Canvas: {}x{} @ {}fps", cli.width, cli.height, cli.fps);

    // 1. Decode
    let track = audio::decode::decode_track(input)?;

    // 2. Analyse the whole track ahead of playback
    let timeline = audio::analyser::analyse(&track.samples, track.sample_rate, cli.fps, audio_config.analyser())?;
    let mut transport = Transport::new(track.duration());
    transport.set_volume(cli.volume);
    let source = TrackSpectrum::new(timeline, track.sample_rate, cli.fps, transport);
    let total_frames = source.frame_count();
    log::info!("Total frames: {}, Duration: {:.1}s", total_frames, source.transport().duration());

    let planned_frames = planned_frames(total_frames, cli.fps, cli.limit);
    if planned_frames < total_frames {
        log::info!("Preview: stopping after {} frames", planned_frames);
    }

    // 3. Style plan
    let slots = plan_styles(&cli.style, planned_frames);
    for (i, slot) in slots.iter().enumerate() {
        let start = if i == 0 { 0 } else { slots[i - 1].end_frame };
        log::info!("Style [{}]: {} (frames {}-{})", i, slot.style, start, slot.end_frame.saturating_sub(1));
    }

    // 4. Output sinks
    let mut encoder = FfmpegEncoder::new(
        &cli.output,
        input,
        &EncoderSettings {
            width: cli.width,
            height: cli.height,
            fps: cli.fps,
            codec: &cli.codec,
            pix_fmt: &cli.pix_fmt,
            crf: cli.crf,
        },
    )?;
    let mut stats_writer = cli.stats.as_deref().map(StatsWriter::create).transpose()?;

    let pb = ProgressBar::new(planned_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames {msg}")?
            .progress_chars("=>-"),
    );

    // 5. Render loop: one scheduler tick per output frame
    let mut scheduler = Scheduler::new(source, slots[0].style);
    scheduler.resize(cli.width, cli.height);
    let readout = pb.clone();
    scheduler.on_frame_stats(move |stats| {
        readout.set_message(format!("{} / {}", stats.frequency_label(), stats.amplitude_label()));
    });

    let mut raster = Raster::new(cli.width, cli.height);
    let frame_step = 1.0 / cli.fps as f64;
    let mut slot_idx = 0;
    let mut frame_idx = 0usize;

    scheduler.source_mut().transport_mut().play();
    scheduler.start();

    while let Some(request) = scheduler.pending() {
        while slot_idx + 1 < slots.len() && frame_idx >= slots[slot_idx].end_frame {
            slot_idx += 1;
            log::info!("Switching to style: {}", slots[slot_idx].style);
            scheduler.set_style(slots[slot_idx].style);
        }

        let clock = scheduler.source().transport().position();
        let stats = match scheduler.fire(request, clock, &mut raster) {
            FrameOutcome::Painted(stats) | FrameOutcome::Skipped(stats) => stats,
            FrameOutcome::Cancelled | FrameOutcome::Ended => break,
        };

        if let Some(writer) = stats_writer.as_mut() {
            writer.record(frame_idx as u64, clock, scheduler.style(), &stats)?;
        }
        encoder.write_frame(&raster.composite_rgba8(&theme))?;

        scheduler.source_mut().transport_mut().advance(frame_step);
        frame_idx += 1;
        pb.set_position(frame_idx as u64);

        if frame_idx >= planned_frames && planned_frames < total_frames {
            scheduler.source_mut().transport_mut().pause();
            scheduler.pause();
        }
    }

    if scheduler.source().transport().state() == PlaybackState::Paused {
        log::info!(
            "Preview limit reached at {:.2}s",
            scheduler.source().transport().position()
        );
    }
    scheduler.stop();
    scheduler.source_mut().transport_mut().stop();
    pb.finish_with_message(format!(
        "{} / {}",
        scheduler.readout().frequency,
        scheduler.readout().amplitude
    ));

    // 6. Finish
    if let Some(writer) = stats_writer {
        writer.finish()?;
    }
    log::info!("Finishing encoding...");
    encoder.finish()?;

    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}

/// Frames to render: the whole track, or only the first `limit` seconds.
fn planned_frames(total_frames: usize, fps: u32, limit: Option<f64>) -> usize {
    match limit {
        Some(seconds) if seconds > 0.0 => ((seconds * fps as f64).ceil() as usize).min(total_frames),
        _ => total_frames,
    }
}

/// Resolve the style selector into slots covering `total_frames`. `all`
/// shares the track equally between every style, the last one taking any
/// remainder.
fn plan_styles(selector: &str, total_frames: usize) -> Vec<StyleSlot> {
    if !selector.eq_ignore_ascii_case("all") {
        return vec![StyleSlot {
            style: VisualStyle::from_selector(selector),
            end_frame: total_frames,
        }];
    }

    let count = VisualStyle::ALL.len();
    let per_style = total_frames / count;
    VisualStyle::ALL
        .iter()
        .enumerate()
        .map(|(i, &style)| StyleSlot {
            style,
            end_frame: if i == count - 1 { total_frames } else { (i + 1) * per_style },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_style_covers_track() {
        let slots = plan_styles("nebula", 100);
        assert_eq!(
            slots,
            vec![StyleSlot {
                style: VisualStyle::Nebula,
                end_frame: 100
            }]
        );
        assert_eq!(plan_styles("unknown", 5)[0].style, VisualStyle::Bars);
    }

    #[test]
    fn all_splits_track_evenly() {
        let slots = plan_styles("all", 62);
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[0].end_frame, 10);
        assert_eq!(slots[4].end_frame, 50);
        assert_eq!(slots[5].end_frame, 62);
        assert_eq!(slots[5].style, VisualStyle::OrganicFlow);
    }

    #[test]
    fn limit_caps_planned_frames() {
        assert_eq!(planned_frames(600, 60, None), 600);
        assert_eq!(planned_frames(600, 60, Some(2.5)), 150);
        assert_eq!(planned_frames(600, 60, Some(1.0 / 120.0)), 1);
        assert_eq!(planned_frames(600, 60, Some(30.0)), 600);
        assert_eq!(planned_frames(600, 60, Some(0.0)), 600);
    }
}
