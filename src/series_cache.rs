use std::rc::Rc;

use crate::kinematics::{compute, MotionSeries};
use crate::motion_parameters::MotionParameters;

/// A fixed-size FIFO of recently computed series, keyed by the exact bits
/// of their parameters. The oldest entry is overwritten when full.
pub struct SeriesCache<const N: usize> {
    buffer: [Option<([u64; 4], Rc<MotionSeries>)>; N],
    idx: usize,
    cap: usize,
}

impl<const N: usize> Default for SeriesCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SeriesCache<N> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            buffer: std::array::from_fn(|_| None),
            idx: 0,
            cap: 0,
        }
    }

    /// Returns the cached series for `params`, if present.
    pub fn get(&self, params: &MotionParameters) -> Option<Rc<MotionSeries>> {
        let key = params.key();
        self.buffer
            .iter()
            .flatten()
            .find(|(k, _)| *k == key)
            .map(|(_, series)| Rc::clone(series))
    }

    /// Returns the cached series for `params`, computing and storing it on a miss.
    pub fn get_or_compute(&mut self, params: &MotionParameters) -> Rc<MotionSeries> {
        if let Some(series) = self.get(params) {
            log::debug!("series cache hit ({} samples)", series.len());
            return series;
        }
        let series = Rc::new(compute(params));
        log::debug!("computed series with {} samples", series.len());
        self.write(params.key(), Rc::clone(&series));
        series
    }

    /// Writes an entry, overwriting the oldest one if full.
    fn write(&mut self, key: [u64; 4], series: Rc<MotionSeries>) {
        if N == 0 {
            return;
        }
        self.buffer[self.idx] = Some((key, series));
        self.idx = (self.idx + 1) % N;
        if self.cap < N {
            self.cap += 1;
        }
    }

    /// Number of stored series.
    pub fn len(&self) -> usize {
        self.cap
    }

    /// Checks if the cache is full.
    pub fn is_full(&self) -> bool {
        self.cap == N
    }

    /// Checks if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cap == 0
    }
}
