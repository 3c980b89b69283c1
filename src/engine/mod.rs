pub mod scheduler;
pub mod summary;

/// Supplies one spectrum snapshot per tick.
///
/// Frames hold `N` magnitudes in `0..=255`, with `N` fixed for the session.
pub trait SpectrumSource {
    fn current_frame(&mut self) -> &[u8];
    fn sample_rate(&self) -> f64;
    fn is_active(&self) -> bool;
}
