//! Playback clock: play/pause, speed, frame stepping and page visibility.
//!
//! The clock advances only on [`PlaybackController::tick`]. Each tick turns
//! the wall-clock time since the previous tick into fractional frames at the
//! current speed; whole frames move the playhead and the remainder stays in
//! an accumulator that feeds the sub-frame position.
//!
//! While the page is hidden ticks consume no time at all. The first tick
//! after play or resume only anchors the clock, so nothing that happened
//! while stopped or hidden is ever fast-forwarded.

use openrv_core::{FrameRange, FrameRate, LoopMode, MediaInfo, Result, RvError};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::interpolation::compute_sub_frame;

/// Transport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackMode {
    #[default]
    Stopped,
    Playing,
}

/// Owns the playhead and the scheduling state of playback.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    mode: PlaybackMode,
    frame_rate: FrameRate,
    range: FrameRange,
    current_frame: i64,
    speed: f64,
    interpolation_enabled: bool,
    loop_mode: LoopMode,
    /// Fractional frames played since `current_frame` was entered.
    accumulator: f64,
    /// Time of the last tick that consumed time; `None` makes the next tick
    /// an anchor.
    last_tick: Option<Instant>,
    hidden: bool,
    /// Whether to start playing again when the page becomes visible.
    resume_on_visible: bool,
}

impl PlaybackController {
    pub const DEFAULT_SPEED: f64 = 1.0;

    /// Create a stopped controller on the first frame of `media`.
    pub fn new(media: &MediaInfo, loop_mode: LoopMode) -> Self {
        Self {
            mode: PlaybackMode::Stopped,
            frame_rate: media.frame_rate,
            range: media.frames,
            current_frame: media.frames.first,
            speed: Self::DEFAULT_SPEED,
            interpolation_enabled: false,
            loop_mode,
            accumulator: 0.0,
            last_tick: None,
            hidden: false,
            resume_on_visible: false,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Playing
    }

    pub fn current_frame(&self) -> i64 {
        self.current_frame
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn interpolation_enabled(&self) -> bool {
        self.interpolation_enabled
    }

    /// Fractional position inside the current frame. Recomputed on every
    /// call from the fields it depends on, never stored.
    pub fn sub_frame_position(&self) -> Option<f64> {
        compute_sub_frame(self.interpolation_enabled, self.speed, self.accumulator)
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn range(&self) -> FrameRange {
        self.range
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
    }

    // ── Transport ───────────────────────────────────────────────

    /// Start playback. While hidden this only arms resume-on-visible.
    pub fn play(&mut self) {
        if self.hidden {
            self.resume_on_visible = true;
            debug!("Play requested while hidden, will start when visible");
            return;
        }
        if self.loop_mode == LoopMode::Once && self.current_frame == self.range.last {
            self.current_frame = self.range.first;
            self.accumulator = 0.0;
        }
        self.mode = PlaybackMode::Playing;
        self.last_tick = None;
        debug!(frame = self.current_frame, speed = self.speed, "Playback started");
    }

    /// Stop playback at the current frame and sub-frame.
    pub fn pause(&mut self) {
        self.resume_on_visible = false;
        if self.mode == PlaybackMode::Playing {
            debug!(frame = self.current_frame, "Playback paused");
        }
        self.mode = PlaybackMode::Stopped;
        self.last_tick = None;
    }

    /// Same as [`pause`](Self::pause); the playhead stays where it is.
    pub fn stop(&mut self) {
        self.pause();
    }

    pub fn toggle(&mut self) {
        let playing = if self.hidden {
            self.resume_on_visible
        } else {
            self.is_playing()
        };
        if playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Handle a page visibility edge. Returns false for a repeated edge.
    pub fn set_visibility(&mut self, visible: bool) -> bool {
        if visible != self.hidden {
            return false;
        }

        if visible {
            self.hidden = false;
            if std::mem::take(&mut self.resume_on_visible) {
                self.mode = PlaybackMode::Playing;
                self.last_tick = None;
            }
            debug!(
                frame = self.current_frame,
                playing = self.is_playing(),
                "Page visible"
            );
        } else {
            self.hidden = true;
            self.resume_on_visible = self.is_playing();
            self.mode = PlaybackMode::Stopped;
            self.last_tick = None;
            debug!(
                frame = self.current_frame,
                resume = self.resume_on_visible,
                "Page hidden, playback frozen"
            );
        }
        true
    }

    // ── Clock ───────────────────────────────────────────────────

    /// Advance the clock to `now`. Returns the number of whole frames the
    /// playhead moved.
    pub fn tick(&mut self, now: Instant) -> i64 {
        if self.hidden || self.mode != PlaybackMode::Playing {
            return 0;
        }
        let Some(last) = self.last_tick.replace(now) else {
            return 0;
        };
        let elapsed = now.saturating_duration_since(last);
        self.advance(self.frame_rate.frames_in(elapsed, self.speed))
    }

    /// Move the clock by a fractional number of frames. Returns the whole
    /// frames consumed, saturated to `i64`.
    ///
    /// The move is resolved against the range in floating point, so any
    /// finite or infinite advance lands on a valid frame.
    pub fn advance(&mut self, frames: f64) -> i64 {
        if frames.is_nan() {
            return 0;
        }
        self.accumulator += frames.clamp(f64::MIN, f64::MAX);
        let whole = self.accumulator.floor();
        self.accumulator -= whole;
        if whole == 0.0 {
            return 0;
        }

        let offset = (self.current_frame - self.range.first) as f64 + whole;
        let span = (self.range.len() - 1) as f64;
        match self.loop_mode {
            LoopMode::Once if offset > span => {
                self.current_frame = self.range.last;
                self.accumulator = 0.0;
                self.mode = PlaybackMode::Stopped;
                self.last_tick = None;
                debug!(frame = self.current_frame, "Reached end of range, stopping");
            }
            LoopMode::Once => {
                self.current_frame = self.range.first + offset.max(0.0) as i64;
            }
            LoopMode::Loop => {
                // rem_euclid of integral floats is exact; min() guards the
                // top edge against rounding.
                let wrapped = offset.rem_euclid(span + 1.0).min(span);
                self.current_frame = self.range.first + wrapped as i64;
            }
        }
        whole as i64
    }

    // ── Parameters ──────────────────────────────────────────────

    /// Set the speed multiplier and return the previous one.
    pub fn set_speed(&mut self, speed: f64) -> Result<f64> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(RvError::invalid(format!(
                "playback speed must be positive, got {speed}"
            )));
        }
        Ok(std::mem::replace(&mut self.speed, speed))
    }

    /// Enable or disable sub-frame interpolation and return the previous state.
    pub fn set_interpolation(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.interpolation_enabled, enabled)
    }

    /// Step by `delta` frames. Stepping pauses playback and lands exactly on
    /// a frame boundary.
    pub fn step(&mut self, delta: i64) {
        self.pause();
        let target = self.current_frame.saturating_add(delta);
        self.current_frame = match self.loop_mode {
            LoopMode::Loop => self.range.wrap(target),
            LoopMode::Once => self.range.clamp(target),
        };
        self.accumulator = 0.0;
        debug!(frame = self.current_frame, delta, "Frame step");
    }

    /// Jump to `frame`, clamped into the range.
    pub fn seek(&mut self, frame: i64) {
        self.current_frame = self.range.clamp(frame);
        self.accumulator = 0.0;
        if self.is_playing() {
            self.last_tick = None;
        }
        debug!(frame = self.current_frame, "Seek");
    }
}
