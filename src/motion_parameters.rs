/// Fixed sampling interval of every generated series, in seconds.
pub const TIME_STEP: f64 = 0.01;

/// Initial conditions of a uniformly accelerated motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParameters {
    /// Velocity at t = 0, m/s
    pub initial_velocity: f64,
    /// Constant acceleration, m/s^2
    pub acceleration: f64,
    /// Upper (excluded) bound of the time axis, s
    pub max_time: f64,
    /// Sampling interval, s
    pub time_step: f64,
}

/// A body thrown upwards at 10 m/s under earth gravity, observed for 5 s.
impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            initial_velocity: 10.0,
            acceleration: -9.8,
            max_time: 5.0,
            time_step: TIME_STEP,
        }
    }
}

impl MotionParameters {
    /// Creates new parameters sampled at the fixed `TIME_STEP`.
    pub fn new(initial_velocity: f64, acceleration: f64, max_time: f64) -> Self {
        Self::with_time_step(initial_velocity, acceleration, max_time, TIME_STEP)
    }

    /// Creates new parameters with an explicit sampling interval.
    pub fn with_time_step(
        initial_velocity: f64,
        acceleration: f64,
        max_time: f64,
        time_step: f64,
    ) -> Self {
        Self {
            initial_velocity,
            acceleration,
            max_time,
            time_step,
        }
    }

    /// Exact bit pattern of all four fields, used as a cache key.
    /// Two parameter sets with the same key always produce the same series.
    pub fn key(&self) -> [u64; 4] {
        [
            self.initial_velocity.to_bits(),
            self.acceleration.to_bits(),
            self.max_time.to_bits(),
            self.time_step.to_bits(),
        ]
    }
}
