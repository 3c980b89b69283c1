/// Seconds short of the end that still count as the end.
const END_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Playback position, state and volume for one loaded track.
#[derive(Debug)]
pub struct Transport {
    state: PlaybackState,
    position: f64,
    duration: f64,
    volume: f32,
}

impl Transport {
    /// A stopped transport at full volume.
    pub fn new(duration: f64) -> Self {
        Self {
            state: PlaybackState::Stopped,
            position: 0.0,
            duration: duration.max(0.0),
            volume: 1.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.duration
    }

    /// Playing and not yet past the end of the track.
    pub fn is_active(&self) -> bool {
        self.state == PlaybackState::Playing && !self.is_finished()
    }

    /// Start or resume. A finished track starts again from the top.
    pub fn play(&mut self) {
        if self.is_finished() {
            self.position = 0.0;
        }
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.position = 0.0;
    }

    /// Move the playhead forward while playing. Reaching the end stops
    /// playback but leaves the playhead at the end.
    pub fn advance(&mut self, seconds: f64) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.position = (self.position + seconds.max(0.0)).min(self.duration);
        // Summed frame steps can land a hair short of the end.
        if self.duration - self.position < END_TOLERANCE {
            self.position = self.duration;
        }
        if self.is_finished() {
            self.state = PlaybackState::Stopped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_while_playing() {
        let mut t = Transport::new(2.0);
        t.advance(0.5);
        assert_eq!(t.position(), 0.0);
        t.play();
        t.advance(0.5);
        t.pause();
        t.advance(0.5);
        assert_eq!(t.position(), 0.5);
        assert_eq!(t.state(), PlaybackState::Paused);
        assert!(!t.is_active());
    }

    #[test]
    fn pause_and_stop_are_idempotent() {
        let mut t = Transport::new(2.0);
        t.pause();
        assert_eq!(t.state(), PlaybackState::Stopped);
        t.play();
        t.advance(1.0);
        t.stop();
        t.stop();
        assert_eq!(t.state(), PlaybackState::Stopped);
        assert_eq!(t.position(), 0.0);
    }

    #[test]
    fn finishing_then_replaying_restarts() {
        let mut t = Transport::new(1.0);
        t.play();
        t.advance(0.6);
        t.advance(0.6);
        assert_eq!(t.position(), 1.0);
        assert_eq!(t.state(), PlaybackState::Stopped);
        assert!(!t.is_active());
        t.play();
        assert_eq!(t.position(), 0.0);
        assert!(t.is_active());
    }

    #[test]
    fn volume_is_clamped() {
        let mut t = Transport::new(1.0);
        assert_eq!(t.volume(), 1.0);
        t.set_volume(3.0);
        assert_eq!(t.volume(), 1.0);
        t.set_volume(-1.0);
        assert_eq!(t.volume(), 0.0);
    }

    #[test]
    fn frame_steps_reach_the_end_exactly() {
        let mut t = Transport::new(70.0 / 60.0);
        t.play();
        let mut ticks = 0;
        while t.is_active() {
            t.advance(1.0 / 60.0);
            ticks += 1;
        }
        assert_eq!(ticks, 70);
        assert_eq!(t.position(), t.duration());
    }
}
