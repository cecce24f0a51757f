//! Crop range selection and preview over a video timeline.

use crate::models::CropWindow;

/// A `[start, end]` selection over a timeline of fixed duration.
///
/// The invariant `0 <= start <= end <= duration` holds after every mutation.
/// Moving one cursor past the other drags the other cursor with it rather
/// than rejecting the move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSelection {
    start: f64,
    end: f64,
    duration: f64,
}

impl CropSelection {
    /// Creates a selection spanning the full timeline. Non-finite or negative
    /// durations collapse to zero.
    pub fn new(duration: f64) -> Self {
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        Self {
            start: 0.0,
            end: duration,
            duration,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Length of the selected interval in seconds.
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0.0
    }

    /// Moves the start cursor, dragging the end cursor up if overtaken.
    pub fn set_start(&mut self, t: f64) {
        let t = self.clamp(t);
        self.start = t;
        if self.end < t {
            self.end = t;
        }
    }

    /// Moves the end cursor, dragging the start cursor down if overtaken.
    pub fn set_end(&mut self, t: f64) {
        let t = self.clamp(t);
        self.end = t;
        if self.start > t {
            self.start = t;
        }
    }

    /// The wire-level window for a crop request.
    pub fn window(&self) -> CropWindow {
        CropWindow {
            start: self.start,
            end: self.end,
        }
    }

    fn clamp(&self, t: f64) -> f64 {
        if !t.is_finite() {
            return 0.0;
        }
        t.clamp(0.0, self.duration)
    }
}

/// Playback controls of the underlying media element.
pub trait Transport {
    fn seek(&mut self, t: f64);
    fn play(&mut self);
    fn pause(&mut self);
}

/// Plays the selected interval and stops at its end.
///
/// The stop is driven by the transport's time-update ticks, not an exact
/// timer, so the actual stop point overshoots `end` by at most one tick.
#[derive(Debug)]
pub struct Preview {
    end: f64,
    playing: bool,
}

impl Preview {
    /// Seeks to the selection start and begins playback.
    pub fn start<T: Transport>(selection: &CropSelection, transport: &mut T) -> Self {
        transport.seek(selection.start());
        transport.play();
        Self {
            end: selection.end(),
            playing: true,
        }
    }

    /// Feeds one time-update tick. Pauses the transport the first time the
    /// playback position reaches the selection end.
    pub fn tick<T: Transport>(&mut self, now: f64, transport: &mut T) {
        if self.playing && now >= self.end {
            transport.pause();
            self.playing = false;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Stops playback early.
    pub fn stop<T: Transport>(&mut self, transport: &mut T) {
        if self.playing {
            transport.pause();
            self.playing = false;
        }
    }
}
