//! Critically damped smoothing toward a moving target.

/// Moves `current` toward `target` like a critically damped spring that settles in roughly `smooth_time` seconds.
///
/// `rate` carries the spring's velocity between calls and must be kept by the caller.
/// Never overshoots `target`.
#[must_use]
pub fn smooth_damp(current: f32, target: f32, rate: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    // polynomial approximation of exp(-omega * dt), good for the range a fixed step produces
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*rate + omega * change) * dt;
    *rate = (*rate - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        *rate = 0.0;
        return target;
    }
    output
}
