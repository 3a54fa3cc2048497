/// Fixed-timestep clock driving the simulation loop.
///
/// Frame deltas are accumulated and paid out as whole fixed steps. While
/// paused no steps are paid out and incoming time is dropped, so resuming
/// never replays the paused interval as a burst of catch-up steps.
pub struct StepClock {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
    paused: bool,
}

impl StepClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
            paused: false,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if self.paused || self.dt <= 0.0 || !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused {
            self.accumulator = 0.0;
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut clock = StepClock::new(1.0 / 60.0);
        assert_eq!(clock.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut clock = StepClock::new(1.0 / 60.0);
        assert_eq!(clock.accumulate(0.008), 0);
        assert_eq!(clock.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut clock = StepClock::new(1.0 / 60.0);
        assert_eq!(clock.accumulate(1.0), 10);
    }

    #[test]
    fn paused_clock_pays_nothing_and_drops_time() {
        let mut clock = StepClock::new(1.0 / 60.0);
        clock.accumulate(0.010);
        clock.set_paused(true);
        assert!(clock.is_paused());
        assert_eq!(clock.accumulate(1.0), 0);

        clock.set_paused(false);
        // The 10ms banked before the pause is gone too.
        assert_eq!(clock.accumulate(0.008), 0);
        assert_eq!(clock.accumulate(0.010), 1);
    }

    #[test]
    fn ignores_bogus_frame_times() {
        let mut clock = StepClock::new(1.0 / 60.0);
        assert_eq!(clock.accumulate(f32::NAN), 0);
        assert_eq!(clock.accumulate(-1.0), 0);
        assert_eq!(clock.accumulate(1.0 / 60.0), 1);
    }
}
