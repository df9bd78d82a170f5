//! Property tests for the closed-form sampler.

use mrua_motion::{compute, sample_count, MotionParameters};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}

/// (v0, a, t_max, dt) with at most a few hundred thousand samples.
fn arb_params() -> impl Strategy<Value = MotionParameters> {
    (-1e3..1e3f64, -1e2..1e2f64, 1e-3..50.0f64, 1e-3..2.0f64)
        .prop_map(|(v0, a, t_max, dt)| MotionParameters::with_time_step(v0, a, t_max, dt))
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn components_have_sample_count_length(p in arb_params()) {
        let s = compute(&p);
        let n = sample_count(&p);
        prop_assert_eq!(s.times().len(), n);
        prop_assert_eq!(s.positions().len(), n);
        prop_assert_eq!(s.velocities().len(), n);
        prop_assert_eq!(s.accelerations().len(), n);
    }

    #[test]
    fn sample_count_spans_half_open_interval(p in arb_params()) {
        let n = sample_count(&p);
        if p.time_step > p.max_time {
            prop_assert_eq!(n, 0);
        } else {
            prop_assert!(n >= 1);
            prop_assert!((n - 1) as f64 * p.time_step < p.max_time);
            prop_assert!(n as f64 * p.time_step >= p.max_time * (1.0 - 1e-8));
        }
    }

    #[test]
    fn times_lie_in_half_open_interval(p in arb_params()) {
        let s = compute(&p);
        prop_assert!(s.times().iter().all(|&t| (0.0..p.max_time).contains(&t)));
    }

    #[test]
    fn initial_state_and_constant_acceleration(p in arb_params()) {
        let s = compute(&p);
        if let Some((t0, x0, v0, _)) = s.sample(0) {
            prop_assert_eq!(t0, 0.0);
            prop_assert_eq!(x0, 0.0);
            prop_assert_eq!(v0, p.initial_velocity);
        }
        prop_assert!(s.accelerations().iter().all(|&a| a == p.acceleration));
    }

    #[test]
    fn compute_is_bit_reproducible(p in arb_params()) {
        let first = compute(&p);
        let second = compute(&p);
        prop_assert_eq!(bits(first.times()), bits(second.times()));
        prop_assert_eq!(bits(first.positions()), bits(second.positions()));
        prop_assert_eq!(bits(first.velocities()), bits(second.velocities()));
        prop_assert_eq!(bits(first.accelerations()), bits(second.accelerations()));
    }

    #[test]
    fn zero_acceleration_keeps_velocity(v0 in -1e3..1e3f64, t_max in 1e-3..50.0f64) {
        let s = compute(&MotionParameters::new(v0, 0.0, t_max));
        prop_assert!(s.velocities().iter().all(|&v| v == v0));
    }
}
