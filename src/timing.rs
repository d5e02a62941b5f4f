/// Time between two host frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameDelta {
    /// Wall-clock seconds since the previous frame. 0 on the first frame or when time went backwards.
    pub elapsed: f64,
    /// `elapsed` clamped into `[0, max_dt]`; the step actually simulated.
    pub dt: f64,
}

/// Turns host frame timestamps into clamped per-tick deltas.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    /// Last host timestamp in milliseconds. `None` until the first frame after start/reset.
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the last timestamp so the next frame starts from zero elapsed time.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }

    /// Records `timestamp_ms` and returns the time since the previous frame.
    pub fn advance(&mut self, timestamp_ms: f64, max_dt: f64) -> FrameDelta {
        let Some(last) = self.last.replace(timestamp_ms) else {
            return FrameDelta::default();
        };

        let elapsed = (timestamp_ms - last) / 1000.0;
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return FrameDelta::default();
        }
        if elapsed > max_dt {
            log::debug!("frame delta {elapsed:.3}s clamped to {max_dt}s");
            return FrameDelta { elapsed, dt: max_dt };
        }
        FrameDelta { elapsed, dt: elapsed }
    }
}

/// Frames-per-second estimate averaged over a trailing window.
#[derive(Clone, Copy, Debug, Default)]
pub struct FpsMeter {
    fps: f64,
    elapsed: f64,
    frames: u32,
}

impl FpsMeter {
    /// Seconds of frames averaged per published estimate.
    pub const WINDOW: f64 = 0.5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one frame that took `elapsed` wall-clock seconds.
    pub fn record(&mut self, elapsed: f64) {
        self.elapsed += elapsed;
        self.frames += 1;
        if self.elapsed >= Self::WINDOW {
            self.fps = (self.frames as f64 / self.elapsed).round();
            self.elapsed = 0.0;
            self.frames = 0;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
