//! Frame timing for playback.
//!
//! Frames are addressed by integer index inside an inclusive range, the way
//! review tools number them (the first frame is usually 1). Wall-clock time
//! is converted to fractional frame counts through the media frame rate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::color::TransferFunction;
use crate::error::{Result, RvError};

/// Frame rate as a rational number (e.g., 24000/1001 for 23.976 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 24000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Number of (fractional) frames covered by `elapsed` at the given speed.
    #[inline]
    pub fn frames_in(self, elapsed: Duration, speed: f64) -> f64 {
        elapsed.as_secs_f64() * self.to_fps_f64() * speed
    }

    /// Reject zero components, which would make every conversion divide by zero.
    pub fn validate(self) -> Result<Self> {
        if self.numerator == 0 || self.denominator == 0 {
            return Err(RvError::invalid(format!(
                "frame rate {}/{} must have non-zero terms",
                self.numerator, self.denominator
            )));
        }
        Ok(self)
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_24
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// An inclusive range of frame indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    /// First frame (inclusive)
    pub first: i64,
    /// Last frame (inclusive)
    pub last: i64,
}

impl FrameRange {
    /// Create a range, rejecting `last < first`.
    pub fn new(first: i64, last: i64) -> Result<Self> {
        if last < first {
            return Err(RvError::invalid(format!(
                "frame range {first}..={last} is empty"
            )));
        }
        Ok(Self { first, last })
    }

    /// Single-frame range, used for still images.
    pub const fn single(frame: i64) -> Self {
        Self {
            first: frame,
            last: frame,
        }
    }

    /// Number of frames in the range.
    #[inline]
    pub fn len(self) -> i64 {
        self.last - self.first + 1
    }

    /// Always false; a range holds at least one frame.
    #[inline]
    pub fn is_empty(self) -> bool {
        false
    }

    #[inline]
    pub fn contains(self, frame: i64) -> bool {
        frame >= self.first && frame <= self.last
    }

    /// Clamp a frame into the range.
    #[inline]
    pub fn clamp(self, frame: i64) -> i64 {
        frame.clamp(self.first, self.last)
    }

    /// Wrap a frame into the range, as looping playback does. Any `i64`
    /// is accepted, including values far outside the range.
    pub fn wrap(self, frame: i64) -> i64 {
        let offset =
            (i128::from(frame) - i128::from(self.first)).rem_euclid(i128::from(self.len()));
        // offset < len, so first + offset <= last
        self.first + offset as i64
    }
}

impl Default for FrameRange {
    fn default() -> Self {
        Self::single(1)
    }
}

/// What the session needs to know about loaded media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Display name of the source (file name or URL).
    pub name: String,
    /// Nominal frame rate of the media.
    pub frame_rate: FrameRate,
    /// Frames available for playback.
    pub frames: FrameRange,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Encoding of the decoded pixel values.
    #[serde(default)]
    pub transfer: TransferFunction,
}

impl MediaInfo {
    /// Describe a video clip of `frame_count` frames starting at frame 1.
    pub fn video(
        name: impl Into<String>,
        width: u32,
        height: u32,
        frame_rate: FrameRate,
        frame_count: i64,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            frame_rate: frame_rate.validate()?,
            frames: FrameRange::new(1, frame_count)?,
            width,
            height,
            transfer: TransferFunction::default(),
        })
    }

    /// Describe a still image (a single frame).
    pub fn image(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            frame_rate: FrameRate::default(),
            frames: FrameRange::single(1),
            width,
            height,
            transfer: TransferFunction::default(),
        }
    }

    /// Tag the media with the encoding of its pixel values.
    pub fn with_transfer(mut self, transfer: TransferFunction) -> Self {
        self.transfer = transfer;
        self
    }
}
