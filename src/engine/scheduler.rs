use crate::render::style::VisualStyle;
use crate::render::surface::RenderSurface;

use super::summary::SummaryStats;
use super::SpectrumSource;

/// Handle for one scheduled frame. Only the most recently issued handle can
/// paint; stopping invalidates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest(u64);

#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The frame was drawn and the next one scheduled.
    Painted(SummaryStats),
    /// Stats were published but the renderer failed; the loop continues.
    Skipped(SummaryStats),
    /// The request was stale or cancelled. Nothing was drawn.
    Cancelled,
    /// The source went inactive; the scheduler stopped itself.
    Ended,
}

/// Text shown next to the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Readout {
    pub frequency: String,
    pub amplitude: String,
}

impl Readout {
    pub fn zero() -> Self {
        Self {
            frequency: "0 Hz".to_string(),
            amplitude: "0 dB".to_string(),
        }
    }
}

type StatsSink = Box<dyn FnMut(&SummaryStats)>;

/// Drives the render loop: one frame per host repaint while running.
///
/// The host asks for [`Scheduler::pending`] on each repaint signal and hands
/// the request back to [`Scheduler::fire`]. A frame only schedules the next
/// one after it has returned, so at most one request is ever outstanding.
pub struct Scheduler<S> {
    source: S,
    style: VisualStyle,
    /// Requested surface size, applied on the next paint.
    size: Option<(u32, u32)>,
    pending: Option<FrameRequest>,
    next_id: u64,
    readout: Readout,
    sinks: Vec<StatsSink>,
}

impl<S: SpectrumSource> Scheduler<S> {
    pub fn new(source: S, style: VisualStyle) -> Self {
        Self {
            source,
            style,
            size: None,
            pending: None,
            next_id: 0,
            readout: Readout::zero(),
            sinks: Vec::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn style(&self) -> VisualStyle {
        self.style
    }

    /// Takes effect on the next frame without restarting the loop.
    pub fn set_style(&mut self, style: VisualStyle) {
        if style != self.style {
            log::debug!("Visual style {} -> {}", self.style, style);
            self.style = style;
        }
    }

    /// Applied to the surface at the start of the next paint.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    pub fn on_frame_stats(&mut self, sink: impl FnMut(&SummaryStats) + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Begin requesting frames. Calling it while running keeps the current
    /// request so two loops never run at once.
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.schedule();
        }
    }

    /// Cancel the outstanding request, keeping the readout. Idempotent.
    pub fn pause(&mut self) {
        self.pending = None;
    }

    /// Cancel the outstanding request and zero the readout. Idempotent.
    pub fn stop(&mut self) {
        self.pending = None;
        self.readout = Readout::zero();
    }

    /// Run the frame for `request` at `clock_seconds` of playback.
    pub fn fire(
        &mut self,
        request: FrameRequest,
        clock_seconds: f64,
        surface: &mut dyn RenderSurface,
    ) -> FrameOutcome {
        if self.pending != Some(request) {
            return FrameOutcome::Cancelled;
        }
        self.pending = None;

        if !self.source.is_active() {
            log::debug!("Spectrum source inactive, stopping render loop");
            self.stop();
            return FrameOutcome::Ended;
        }

        if let Some((width, height)) = self.size {
            if surface.width() != width || surface.height() != height {
                surface.resize(width, height);
            }
        }

        let sample_rate = self.source.sample_rate();
        let frame = self.source.current_frame();
        let stats = SummaryStats::from_frame(frame, sample_rate);

        self.readout = Readout {
            frequency: stats.frequency_label(),
            amplitude: stats.amplitude_label(),
        };
        for sink in &mut self.sinks {
            sink(&stats);
        }

        let outcome = match self.style.paint(frame, clock_seconds, surface) {
            Ok(()) => FrameOutcome::Painted(stats),
            Err(err) => {
                log::warn!("Skipping {} frame at {:.3}s: {}", self.style, clock_seconds, err);
                FrameOutcome::Skipped(stats)
            }
        };

        self.schedule();
        outcome
    }

    fn schedule(&mut self) {
        self.next_id += 1;
        self.pending = Some(FrameRequest(self.next_id));
    }
}
