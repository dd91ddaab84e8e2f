//! OpenRV Core - Foundation types for the review session engine
//!
//! This crate provides the fundamental types shared by the session crates:
//! - Frame timing (FrameRate, FrameRange, MediaInfo)
//! - Pixel signal encodings (TransferFunction)
//! - Display geometry (Rotation, StrokePoint, transform matrices)
//! - Session configuration
//! - The common error taxonomy

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod time;

pub use color::TransferFunction;
pub use config::{LoopMode, SessionConfig};
pub use error::{Result, RvError};
pub use geometry::{Rotation, StrokePoint, Vec2};
pub use time::{FrameRange, FrameRate, MediaInfo};

/// Default tuning constants for an interactive review session.
pub mod defaults {
    /// Maximum number of undo entries kept per session.
    pub const HISTORY_DEPTH: usize = 200;

    /// Window in which repeated edits of one scalar field merge into one entry.
    pub const DEBOUNCE_WINDOW_MS: u64 = 150;

    /// Frames on either side of the playhead shown as annotation ghosts.
    pub const GHOST_FRAMES: u32 = 3;

    /// Extra pick radius for the eraser, in image pixels.
    pub const ERASER_TOLERANCE: f32 = 4.0;

    /// Interval of the cooperative scheduling tick.
    pub const TICK_INTERVAL_MS: u64 = 4;
}
