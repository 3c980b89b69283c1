use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::surface::RenderSurface;
use super::{bars, nebula, neural, organic, quantum, radial_pulse};

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("animation clock is not finite: {0}")]
    NonFiniteClock(f64),
}

/// The closed set of visualisations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualStyle {
    #[default]
    Bars,
    RadialPulse,
    Nebula,
    NeuralNetwork,
    QuantumWave,
    OrganicFlow,
}

impl VisualStyle {
    pub const ALL: [VisualStyle; 6] = [
        VisualStyle::Bars,
        VisualStyle::RadialPulse,
        VisualStyle::Nebula,
        VisualStyle::NeuralNetwork,
        VisualStyle::QuantumWave,
        VisualStyle::OrganicFlow,
    ];

    /// Short selector name, as offered in the style picker.
    pub fn name(self) -> &'static str {
        match self {
            VisualStyle::Bars => "bars",
            VisualStyle::RadialPulse => "circle",
            VisualStyle::Nebula => "nebula",
            VisualStyle::NeuralNetwork => "neural",
            VisualStyle::QuantumWave => "quantum",
            VisualStyle::OrganicFlow => "organic",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VisualStyle::Bars => "Gradient frequency bars riding a sine wave",
            VisualStyle::RadialPulse => "Rotating, pulsing rings of particles",
            VisualStyle::Nebula => "Layered rings over a soft nebula disc",
            VisualStyle::NeuralNetwork => "Fully connected ring of 50 nodes",
            VisualStyle::QuantumWave => "Spiral of translucent probability blobs",
            VisualStyle::OrganicFlow => "A single flowing Bezier curve",
        }
    }

    /// Resolve a selector, falling back to bars for anything unknown.
    pub fn from_selector(selector: &str) -> Self {
        selector.parse().unwrap_or_else(|_| {
            log::warn!("Unknown visual style '{}', using bars", selector);
            VisualStyle::Bars
        })
    }

    /// Paint one full frame.
    ///
    /// A zero-sized surface is a no-op. Renderers keep no state between
    /// calls; anything left on the surface from the previous frame is either
    /// cleared or faded by the renderer itself.
    pub fn paint(
        self,
        frame: &[u8],
        clock_seconds: f64,
        surface: &mut dyn RenderSurface,
    ) -> Result<(), RenderError> {
        if !clock_seconds.is_finite() {
            return Err(RenderError::NonFiniteClock(clock_seconds));
        }
        if surface.is_empty() {
            return Ok(());
        }
        let time = clock_seconds as f32;
        match self {
            VisualStyle::Bars => bars::paint(frame, time, surface),
            VisualStyle::RadialPulse => radial_pulse::paint(frame, time, surface),
            VisualStyle::Nebula => nebula::paint(frame, time, surface),
            VisualStyle::NeuralNetwork => neural::paint(frame, time, surface),
            VisualStyle::QuantumWave => quantum::paint(frame, time, surface),
            VisualStyle::OrganicFlow => organic::paint(frame, time, surface),
        }
        Ok(())
    }
}

impl fmt::Display for VisualStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown visual style '{0}'")]
pub struct UnknownStyle(pub String);

impl FromStr for VisualStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bars" => Ok(VisualStyle::Bars),
            "circle" | "radial_pulse" => Ok(VisualStyle::RadialPulse),
            "nebula" => Ok(VisualStyle::Nebula),
            "neural" | "neural_network" => Ok(VisualStyle::NeuralNetwork),
            "quantum" | "quantum_wave" => Ok(VisualStyle::QuantumWave),
            "organic" | "organic_flow" => Ok(VisualStyle::OrganicFlow),
            _ => Err(UnknownStyle(s.to_string())),
        }
    }
}
