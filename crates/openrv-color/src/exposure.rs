//! Exposure parameter and its display mapping.

use openrv_core::{Result, RvError};
use serde::{Deserialize, Serialize};

/// Color grading parameters owned by a session.
///
/// Exposure is measured in stops and is not range-limited; only the rendered
/// pixel value is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorState {
    pub exposure: f32,
}

impl ColorState {
    pub const DEFAULT_EXPOSURE: f32 = 0.0;

    /// Linear gain for the current exposure (`2^exposure`).
    #[inline]
    pub fn gain(&self) -> f32 {
        self.exposure.exp2()
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.exposure == Self::DEFAULT_EXPOSURE
    }

    /// Store a new exposure and return the previous one.
    ///
    /// Non-finite values would poison every rendered pixel and are rejected.
    pub fn set_exposure(&mut self, exposure: f32) -> Result<f32> {
        if !exposure.is_finite() {
            return Err(RvError::invalid(format!(
                "exposure must be finite, got {exposure}"
            )));
        }
        Ok(std::mem::replace(&mut self.exposure, exposure))
    }

    /// Restore the default exposure and return the previous one.
    pub fn reset(&mut self) -> f32 {
        std::mem::replace(&mut self.exposure, Self::DEFAULT_EXPOSURE)
    }
}

/// Map one linear channel value to its displayed value:
/// `clamp(value * 2^exposure, 0, max)`.
#[inline]
pub fn apply_exposure(value: f32, exposure: f32, max: f32) -> f32 {
    (value * exposure.exp2()).clamp(0.0, max)
}
