//! Frame-rate aware interpolation helpers

use glam::Vec3;

/// Smallest smoothing time accepted by [`smooth_damp`]
const MIN_SMOOTH_TIME: f32 = 1.0e-4;

/// Critically damped spring step toward `target`.
///
/// Returns the new `(value, velocity)`. The caller owns the velocity and feeds
/// it back next frame. There is no speed cap, and the result never overshoots
/// `target`. A non-positive `dt` leaves both values untouched.
pub fn smooth_damp(current: f32, target: f32, velocity: f32, smooth_time: f32, dt: f32) -> (f32, f32) {
    if dt <= 0.0 {
        return (current, velocity);
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (velocity + omega * change) * dt;
    let new_velocity = (velocity - omega * temp) * decay;
    let value = target + (change + temp) * decay;

    if (target - current > 0.0) == (value > target) {
        return (target, 0.0);
    }
    (value, new_velocity)
}

/// Linear interpolation with `t` clamped to `[0, 1]`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Vector interpolation with `t` clamped to `[0, 1]`
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_damp_approaches_without_overshoot() {
        let (mut value, mut velocity) = (50.0, 0.0);
        let mut previous = value;
        for _ in 0..240 {
            (value, velocity) = smooth_damp(value, 100.0, velocity, 0.07, 1.0 / 60.0);
            assert!(value <= 100.0);
            assert!(value >= previous);
            previous = value;
        }
        assert!((value - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_smooth_damp_from_above() {
        let (mut value, mut velocity) = (80.0, 0.0);
        for _ in 0..120 {
            (value, velocity) = smooth_damp(value, 20.0, velocity, 0.1, 1.0 / 30.0);
            assert!(value >= 20.0);
        }
        assert!((value - 20.0).abs() < 1e-2);
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_noop() {
        assert_eq!(smooth_damp(3.0, 10.0, 1.5, 0.2, 0.0), (3.0, 1.5));
    }

    #[test]
    fn test_lerp_clamps_t() {
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
        assert_eq!(lerp_vec3(Vec3::ZERO, Vec3::ONE, 0.5), Vec3::splat(0.5));
    }
}
