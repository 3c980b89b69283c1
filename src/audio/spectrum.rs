use crate::engine::SpectrumSource;

use super::analyser::SpectrumTimeline;
use super::transport::Transport;

/// Spectrum of a pre-analysed track, read at the transport's playhead.
pub struct TrackSpectrum {
    timeline: SpectrumTimeline,
    sample_rate: u32,
    fps: u32,
    transport: Transport,
    frame: Vec<u8>,
}

impl TrackSpectrum {
    pub fn new(timeline: SpectrumTimeline, sample_rate: u32, fps: u32, transport: Transport) -> Self {
        let bins = timeline.settings.bin_count();
        Self {
            timeline,
            sample_rate,
            fps,
            transport,
            frame: vec![0; bins],
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    pub fn frame_count(&self) -> usize {
        self.timeline.frames.len()
    }

    /// Snapshot nearest the playhead. Snapshots sit exactly on `k / fps`,
    /// and a playhead built by summing frame steps drifts either side of that.
    fn frame_index(&self) -> usize {
        (self.transport.position() * self.fps as f64).round() as usize
    }
}

impl SpectrumSource for TrackSpectrum {
    fn current_frame(&mut self) -> &[u8] {
        let settings = self.timeline.settings;
        let gain = self.transport.volume();
        let index = self.frame_index();

        match self.timeline.frames.get(index).or_else(|| self.timeline.frames.last()) {
            Some(magnitudes) => {
                for (byte, &m) in self.frame.iter_mut().zip(magnitudes) {
                    *byte = settings.to_byte(m * gain);
                }
            }
            None => self.frame.iter_mut().for_each(|b| *b = 0),
        }
        &self.frame
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate as f64
    }

    fn is_active(&self) -> bool {
        self.transport.is_active()
    }
}
