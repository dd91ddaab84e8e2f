//! Signal encodings of pixel values.
//!
//! Exposure gain is applied in linear light, so encoded sources are decoded
//! before the gain and re-encoded for the display afterwards.

use serde::{Deserialize, Serialize};

/// Power segment with a linear toe, the curve shape shared by sRGB and
/// Rec.709.
#[derive(Debug, Clone, Copy)]
struct ToeCurve {
    /// Slope of the linear toe.
    slope: f32,
    /// `a` in `(1 + a) * L^(1 / power) - a`.
    offset: f32,
    /// Exponent of the decoding power segment.
    power: f32,
    /// Linear-light value where the toe ends.
    knee: f32,
}

impl ToeCurve {
    const SRGB: Self = Self {
        slope: 12.92,
        offset: 0.055,
        power: 2.4,
        knee: 0.003_130_8,
    };

    const REC709: Self = Self {
        slope: 4.5,
        offset: 0.099,
        power: 1.0 / 0.45,
        knee: 0.018,
    };

    fn decode(self, encoded: f32) -> f32 {
        if encoded < self.knee * self.slope {
            encoded / self.slope
        } else {
            ((encoded + self.offset) / (1.0 + self.offset)).powf(self.power)
        }
    }

    fn encode(self, linear: f32) -> f32 {
        if linear < self.knee {
            linear * self.slope
        } else {
            (1.0 + self.offset) * linear.powf(self.power.recip()) - self.offset
        }
    }
}

/// Encoding of a pixel signal relative to linear light.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferFunction {
    /// Values are already linear.
    #[default]
    Linear,
    Srgb,
    Rec709,
    /// Pure power law with the given exponent.
    Gamma(f32),
}

impl TransferFunction {
    /// Decode an encoded value to linear light.
    pub fn to_linear(self, v: f32) -> f32 {
        match self {
            Self::Linear => v,
            Self::Srgb => ToeCurve::SRGB.decode(v),
            Self::Rec709 => ToeCurve::REC709.decode(v),
            // Negative signal has no defined power; treat it as black.
            Self::Gamma(exponent) => v.max(0.0).powf(exponent),
        }
    }

    /// Encode a linear-light value.
    pub fn from_linear(self, v: f32) -> f32 {
        match self {
            Self::Linear => v,
            Self::Srgb => ToeCurve::SRGB.encode(v),
            Self::Rec709 => ToeCurve::REC709.encode(v),
            Self::Gamma(exponent) if exponent == 0.0 => 0.0,
            Self::Gamma(exponent) => v.max(0.0).powf(exponent.recip()),
        }
    }

    #[inline]
    pub fn is_linear(self) -> bool {
        matches!(self, Self::Linear)
    }
}
