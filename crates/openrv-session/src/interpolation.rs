//! Sub-frame positions for slow-motion playback.
//!
//! Below normal speed, several display ticks land inside one source frame.
//! With interpolation enabled the renderer blends the current frame with the
//! next one using the fractional position computed here.

/// Fractional position inside the current frame, if one applies.
///
/// `accumulator` is the playback clock's running frame count since the
/// last whole-frame boundary. Positions advance linearly with playback time:
/// at speed 0.5 each nominal frame period adds 0.5 and the position wraps
/// into the next frame on reaching 1.0.
///
/// Returns `None` when interpolation is off or speed is at least 1.0.
#[inline]
pub fn compute_sub_frame(interpolation_enabled: bool, speed: f64, accumulator: f64) -> Option<f64> {
    if !interpolation_enabled || speed >= 1.0 {
        return None;
    }
    let position = accumulator.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    Some(if position >= 1.0 { 0.0 } else { position })
}

/// Blend weights `(current, next)` for a sub-frame position.
#[inline]
pub fn blend_weights(position: f64) -> (f64, f64) {
    let t = position.clamp(0.0, 1.0);
    (1.0 - t, t)
}
