use serde::Serialize;

/// Lowest amplitude reported, matching the analyser's `min_decibels`.
/// A silent frame would otherwise be `-inf` dB.
pub const AMPLITUDE_FLOOR_DB: f64 = -100.0;

/// Display statistics for one spectrum frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SummaryStats {
    pub average_frequency_hz: f64,
    pub average_amplitude_db: f64,
}

impl SummaryStats {
    pub fn from_frame(frame: &[u8], sample_rate: f64) -> Self {
        Self {
            average_frequency_hz: average_frequency(frame, sample_rate),
            average_amplitude_db: average_amplitude(frame),
        }
    }

    pub fn frequency_label(&self) -> String {
        format!("{} Hz", self.average_frequency_hz.round())
    }

    pub fn amplitude_label(&self) -> String {
        format!("{:.2} dB", self.average_amplitude_db)
    }
}

/// Magnitude-weighted mean of the bin centre frequencies. Bins span
/// `0..nyquist` evenly. Returns 0 when every bin is silent.
pub fn average_frequency(frame: &[u8], sample_rate: f64) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let hz_per_bin = sample_rate / 2.0 / frame.len() as f64;

    let (weighted, total) = frame
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(weighted, total), (index, &value)| {
            let weight = value as f64 / 255.0;
            (weighted + index as f64 * hz_per_bin * weight, total + weight)
        });

    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

/// Mean magnitude in decibels relative to full scale, floored at
/// [`AMPLITUDE_FLOOR_DB`].
pub fn average_amplitude(frame: &[u8]) -> f64 {
    if frame.is_empty() {
        return AMPLITUDE_FLOOR_DB;
    }
    let mean = frame.iter().map(|&v| v as f64).sum::<f64>() / frame.len() as f64;
    if mean <= 0.0 {
        return AMPLITUDE_FLOOR_DB;
    }
    (20.0 * (mean / 255.0).log10()).max(AMPLITUDE_FLOOR_DB)
}
