/// How elapsed shader time advances per frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TimeStep {
    /// Fixed increment per frame. Animation speed follows the display's
    /// refresh rate.
    Fixed(f32),
    /// Wall-clock seconds since the last frame, multiplied by `rate`.
    Scaled { rate: f32 },
}

impl Default for TimeStep {
    fn default() -> Self {
        TimeStep::Fixed(0.01)
    }
}

/// Frame deltas above this are treated as a stall (tab in background,
/// debugger pause).
pub const MAX_DELTA_SECS: f64 = 0.25;

/// Shader time source, ticked once per animation frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: TimeStep,
    // f64 so a fixed step stays exact over long sessions
    elapsed: f64,
    last_ms: Option<f64>,
    frame_index: u64,
}

impl FrameClock {
    pub fn new(step: TimeStep) -> Self {
        Self {
            step,
            elapsed: 0.0,
            last_ms: None,
            frame_index: 0,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock. `now_ms` is the animation-frame timestamp; it is
    /// ignored in fixed-step mode.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let advance = match self.step {
            TimeStep::Fixed(step) => step as f64,
            TimeStep::Scaled { rate } => {
                let dt = match self.last_ms {
                    Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_DELTA_SECS),
                    None => 0.0,
                };
                dt * rate as f64
            }
        };
        self.last_ms = Some(now_ms);
        self.elapsed += advance;
        self.frame_index = self.frame_index.wrapping_add(1);
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TimeStep::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_step_uses_timestamps() {
        let mut clock = FrameClock::new(TimeStep::Scaled { rate: 0.6 });
        assert_eq!(clock.tick(1000.0), 0.0);
        let t = clock.tick(1200.0);
        assert!((t - 0.12).abs() < 1e-6, "t={t}");
    }

    #[test]
    fn scaled_step_clamps_stalls_and_backwards_time() {
        let mut clock = FrameClock::new(TimeStep::Scaled { rate: 1.0 });
        clock.tick(0.0);
        let t = clock.tick(10_000.0);
        assert!((t - MAX_DELTA_SECS).abs() < 1e-6);
        let t2 = clock.tick(5_000.0);
        assert_eq!(t2, t);
        assert_eq!(clock.frame_index(), 3);
    }

    #[test]
    fn fixed_step_stays_exact_past_2_pow_18() {
        let mut clock = FrameClock::new(TimeStep::Fixed(0.01));
        // jump close to where an f32 accumulator stops advancing
        clock.elapsed = 262_143.99;
        let mut prev = clock.elapsed();
        for _ in 0..1_000 {
            let t = clock.tick(0.0);
            let step = t - prev;
            assert!((step - 0.01f32 as f64).abs() < 1e-6, "step={step} at t={t}");
            prev = t;
        }
        assert!(prev > 262_144.0 + 9.9);
    }
}
