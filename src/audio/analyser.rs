use anyhow::Result;
use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

/// Settings mirroring a browser `AnalyserNode`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyserSettings {
    pub fft_size: usize,
    pub smoothing: f32,
    pub min_decibels: f32,
    pub max_decibels: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserSettings {
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            anyhow::bail!("fft_size must be a power of two in 32..=32768, got {}", self.fft_size);
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            anyhow::bail!("smoothing must be within 0.0-1.0, got {}", self.smoothing);
        }
        if self.min_decibels >= self.max_decibels {
            anyhow::bail!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels,
                self.max_decibels
            );
        }
        Ok(())
    }

    /// Map a linear magnitude onto the 0-255 byte range through the
    /// configured decibel window.
    pub fn to_byte(&self, magnitude: f32) -> u8 {
        if magnitude <= 0.0 {
            return 0;
        }
        let db = 20.0 * magnitude.log10();
        let scaled = 255.0 / (self.max_decibels - self.min_decibels) * (db - self.min_decibels);
        scaled.floor().clamp(0.0, 255.0) as u8
    }
}

/// Smoothed linear magnitudes for every video frame of a track, at unity gain.
///
/// Gain is linear, so the transport's volume is applied when frames are
/// converted to bytes rather than here.
pub struct SpectrumTimeline {
    pub settings: AnalyserSettings,
    pub frames: Vec<Vec<f32>>,
}

/// Run the analyser over a whole track, one snapshot per frame at `fps`.
///
/// Pass 1 computes the windowed FFT of each snapshot in parallel; pass 2
/// applies the temporal smoothing, which is sequential.
pub fn analyse(samples: &[f32], sample_rate: u32, fps: u32, settings: AnalyserSettings) -> Result<SpectrumTimeline> {
    settings.validate()?;
    if fps == 0 || sample_rate == 0 {
        anyhow::bail!("fps and sample rate must be positive");
    }

    let duration = samples.len() as f64 / sample_rate as f64;
    let total_frames = (duration * fps as f64).ceil() as usize;

    log::info!(
        "Analysing {} frames (fft_size={}, smoothing={:.2})...",
        total_frames,
        settings.fft_size,
        settings.smoothing
    );
    let raw = raw_magnitudes(samples, sample_rate, fps, total_frames, settings.fft_size);
    let frames = smooth(raw, settings.smoothing);

    Ok(SpectrumTimeline { settings, frames })
}

fn raw_magnitudes(
    samples: &[f32],
    sample_rate: u32,
    fps: u32,
    total_frames: usize,
    fft_size: usize,
) -> Vec<Vec<f32>> {
    let window = blackman_window(fft_size);
    let samples_per_frame = sample_rate as f64 / fps as f64;
    let half = fft_size / 2;

    (0..total_frames)
        .into_par_iter()
        .map_init(
            || FftPlanner::<f32>::new().plan_fft_forward(fft_size),
            |fft, frame_idx| {
                // The analyser sees the most recent fft_size samples played.
                let end = ((frame_idx as f64 * samples_per_frame) as usize).min(samples.len());
                let start = end.saturating_sub(fft_size);
                let offset = fft_size - (end - start);

                let mut buffer = vec![Complex::new(0.0f32, 0.0); fft_size];
                for (i, &s) in samples[start..end].iter().enumerate() {
                    buffer[offset + i] = Complex::new(s * window[offset + i], 0.0);
                }
                fft.process(&mut buffer);

                buffer[..half]
                    .iter()
                    .map(|c| c.norm() / fft_size as f32)
                    .collect()
            },
        )
        .collect()
}

fn smooth(mut frames: Vec<Vec<f32>>, smoothing: f32) -> Vec<Vec<f32>> {
    // The first snapshot is smoothed against silence.
    if let Some(first) = frames.first_mut() {
        first.iter_mut().for_each(|v| *v *= 1.0 - smoothing);
    }
    for i in 1..frames.len() {
        let (done, rest) = frames.split_at_mut(i);
        let prev = &done[i - 1];
        for (cur, &p) in rest[0].iter_mut().zip(prev.iter()) {
            *cur = smoothing * p + (1.0 - smoothing) * *cur;
        }
    }
    frames
}

fn blackman_window(size: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    (0..size)
        .map(|i| {
            let x = std::f32::consts::TAU * i as f32 / size as f32;
            A0 - A1 * x.cos() + A2 * (2.0 * x).cos()
        })
        .collect()
}
