use crate::motion_parameters::MotionParameters;

/// Sampled position, velocity and acceleration of a motion over `[0, max_time)`.
///
/// Produced by [`compute`]; the four components have the same length.
/// A series assembled by hand through [`MotionSeries::from_parts`] carries no
/// such guarantee, which is why the chart renderer checks it again.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionSeries {
    times: Vec<f64>,
    positions: Vec<f64>,
    velocities: Vec<f64>,
    accelerations: Vec<f64>,
}

impl MotionSeries {
    /// Builds a series from raw components without checking their lengths.
    pub fn from_parts(
        times: Vec<f64>,
        positions: Vec<f64>,
        velocities: Vec<f64>,
        accelerations: Vec<f64>,
    ) -> Self {
        Self {
            times,
            positions,
            velocities,
            accelerations,
        }
    }

    /// Sample instants, s.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Positions, m.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Velocities, m/s.
    pub fn velocities(&self) -> &[f64] {
        &self.velocities
    }

    /// Accelerations, m/s^2.
    pub fn accelerations(&self) -> &[f64] {
        &self.accelerations
    }

    /// Number of time samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns `(time, position, velocity, acceleration)` at sample `idx`.
    pub fn sample(&self, idx: usize) -> Option<(f64, f64, f64, f64)> {
        Some((
            *self.times.get(idx)?,
            *self.positions.get(idx)?,
            *self.velocities.get(idx)?,
            *self.accelerations.get(idx)?,
        ))
    }

    /// Returns the last sample, if any.
    pub fn last(&self) -> Option<(f64, f64, f64, f64)> {
        self.sample(self.len().checked_sub(1)?)
    }
}

/// Relative tolerance applied to `max_time / time_step` before rounding up,
/// so that an exact multiple such as 5.0 / 0.01 yields 500 on every platform.
const SAMPLE_COUNT_TOLERANCE: f64 = 1e-9;

/// Number of samples `t_i = i * time_step` that fit in `[0, max_time)`.
///
/// `N = ceil(r - r * tol)` with `r = max_time / time_step`, so a partial
/// last step still gets its sample and `(N - 1) * dt < max_time <= N * dt`.
/// A non-finite or non-positive ratio gives zero samples, and so does a
/// `time_step` larger than `max_time`.
pub fn sample_count(params: &MotionParameters) -> usize {
    let ratio = params.max_time / params.time_step;
    if !ratio.is_finite() || ratio < 1.0 {
        return 0;
    }
    (ratio - ratio * SAMPLE_COUNT_TOLERANCE).ceil() as usize
}

/// Evaluates the closed-form MRUA equations at every sample instant.
///
/// Each value is computed directly from `t_i = i * dt`, never accumulated
/// from the previous sample, so the result is bit-for-bit reproducible.
/// Non-finite velocities or accelerations propagate into the output.
///
/// # Panics
///
/// Panics with a capacity overflow when the sample count does not fit in
/// a `Vec` (e.g. `max_time = 1e300`). Callers taking user input bound the
/// count first, see `shell::validate`.
pub fn compute(params: &MotionParameters) -> MotionSeries {
    let n = sample_count(params);
    let v0 = params.initial_velocity;
    let a = params.acceleration;
    let dt = params.time_step;

    let mut times = Vec::with_capacity(n);
    let mut positions = Vec::with_capacity(n);
    let mut velocities = Vec::with_capacity(n);

    for i in 0..n {
        let t = i as f64 * dt;
        times.push(t);

        // pos(t) = v0*t + a*t^2/2
        positions.push(v0 * t + 0.5 * a * t * t);

        // vel(t) = v0 + a*t
        velocities.push(v0 + a * t);
    }

    MotionSeries {
        times,
        positions,
        velocities,
        accelerations: vec![a; n],
    }
}
