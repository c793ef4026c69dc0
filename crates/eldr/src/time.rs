//! Frame clock: delta time, time scaling, and an FPS window.
//!
//! [`Time`] is updated once per frame with the host loop's timestamp (in
//! milliseconds). Taking the timestamp as a parameter — instead of reading a
//! wall clock internally — keeps the clock deterministic for tests and lets
//! the window runner own the real clock.

use std::collections::VecDeque;

/// The frame clock. One update per tick.
///
/// `delta_time` and `time` are scaled by `time_scale`, which defaults to 1.
/// Setting it to 0 pauses everything downstream of the clock; 0.5 is
/// half-speed slow motion. The raw fields are never scaled.
#[derive(Debug, Clone)]
pub struct Time {
    /// Number of updates so far.
    pub frames: u64,
    /// Timestamp of the current frame, unscaled (ms).
    pub raw_time: f64,
    /// Time since the previous frame, unscaled (ms).
    pub raw_delta_time: f64,
    /// Time since the previous frame, scaled by `time_scale` (ms).
    pub delta_time: f64,
    /// Cumulative scaled time (ms).
    pub time: f64,
    /// Timestamp of the previous frame, unscaled (ms).
    pub previous_time: f64,
    /// Scale applied to delta time. Default 1.
    pub time_scale: f64,
    /// Timestamps of frames within the last second, for FPS measurement.
    times: VecDeque<f64>,
}

impl Time {
    pub fn new() -> Self {
        Self {
            frames: 0,
            raw_time: 0.0,
            raw_delta_time: 0.0,
            delta_time: 0.0,
            time: 0.0,
            previous_time: 0.0,
            time_scale: 1.0,
            times: VecDeque::new(),
        }
    }

    /// Advance the clock to `timestamp_ms`. Timestamps must be monotonic.
    pub fn update(&mut self, timestamp_ms: f64) {
        self.frames += 1;
        self.previous_time = self.raw_time;
        self.raw_time = timestamp_ms;
        self.raw_delta_time = timestamp_ms - self.previous_time;
        self.delta_time = self.raw_delta_time * self.time_scale;
        self.time += self.delta_time;

        // Slide the 1-second FPS window. Amortized O(1) for monotonic input.
        while self
            .times
            .front()
            .is_some_and(|&t| t <= timestamp_ms - 1000.0)
        {
            self.times.pop_front();
        }
        self.times.push_back(timestamp_ms);
    }

    /// Frames observed in the trailing one-second window.
    pub fn fps(&self) -> usize {
        self.times.len()
    }

    /// Scaled delta time in seconds, the usual form for movement code.
    pub fn delta_secs(&self) -> f32 {
        (self.delta_time / 1000.0) as f32
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_and_cumulative_time() {
        let mut time = Time::new();
        time.update(0.0);
        time.update(16.0);
        assert_eq!(time.delta_time, 16.0);
        assert_eq!(time.time, 16.0);
        assert_eq!(time.raw_delta_time, 16.0);
        assert_eq!(time.frames, 2);
    }

    #[test]
    fn time_scale_scales_delta() {
        let mut time = Time::new();
        time.update(0.0);
        time.time_scale = 0.5;
        time.update(16.0);
        assert_eq!(time.delta_time, 8.0);
        assert_eq!(time.raw_delta_time, 16.0);
        assert_eq!(time.time, 8.0);
    }

    #[test]
    fn zero_scale_pauses() {
        let mut time = Time::new();
        time.update(0.0);
        time.time_scale = 0.0;
        time.update(100.0);
        assert_eq!(time.delta_time, 0.0);
        assert_eq!(time.time, 0.0);
        assert_eq!(time.raw_time, 100.0);
    }

    #[test]
    fn fps_window_evicts_old_frames() {
        let mut time = Time::new();
        for i in 0..60 {
            time.update(i as f64 * 16.0);
        }
        let fps_before = time.fps();
        assert!(fps_before > 0 && fps_before <= 60);

        // Jump far ahead: everything but the new frame falls out the window.
        time.update(10_000.0);
        assert_eq!(time.fps(), 1);
    }

    #[test]
    fn fps_counts_frames_in_window() {
        let mut time = Time::new();
        // 30 frames over exactly one second at ~33ms spacing.
        for i in 0..30 {
            time.update(i as f64 * 33.0);
        }
        assert_eq!(time.fps(), 30);
    }
}
