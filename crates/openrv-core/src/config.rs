//! Session configuration with a versioned JSON representation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::color::TransferFunction;
use crate::defaults;
use crate::error::{Result, RvError};

/// Current config schema version.
pub const CONFIG_VERSION: u32 = 1;

/// What playback does when it runs past the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Wrap back to the first frame.
    #[default]
    Loop,
    /// Stop on the last frame.
    Once,
}

/// Tunables for one review session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Schema version of the file this config was read from.
    pub version: u32,
    /// Maximum undo depth.
    pub history_depth: usize,
    /// Coalescing window for repeated scalar edits, in milliseconds.
    pub debounce_window_ms: u64,
    /// Behaviour at the end of the frame range.
    pub loop_mode: LoopMode,
    /// Frames on either side of the playhead drawn as ghosts.
    pub ghost_frames: u32,
    /// Extra eraser pick radius in image pixels.
    pub eraser_tolerance: f32,
    /// Scheduling tick interval of the session driver, in milliseconds.
    pub tick_interval_ms: u64,
    /// Encoding expected by the display surface.
    pub display_transfer: TransferFunction,
}

impl SessionConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Parse a config from JSON bytes. Missing fields take their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| RvError::Config(format!("Invalid session config: {}", e)))?;

        if config.version > CONFIG_VERSION {
            return Err(RvError::Config(format!(
                "Config version {} is newer than supported version {}",
                config.version, CONFIG_VERSION
            )));
        }
        if config.history_depth == 0 {
            return Err(RvError::Config("history_depth must be at least 1".into()));
        }

        Ok(config)
    }

    /// Serialize to pretty JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| RvError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Load a config file from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config = Self::from_json(&data)?;
        debug!(path = %path.display(), ?config, "Session config loaded");
        Ok(config)
    }

    /// Write this config to disk.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            history_depth: defaults::HISTORY_DEPTH,
            debounce_window_ms: defaults::DEBOUNCE_WINDOW_MS,
            loop_mode: LoopMode::Loop,
            ghost_frames: defaults::GHOST_FRAMES,
            eraser_tolerance: defaults::ERASER_TOLERANCE,
            tick_interval_ms: defaults::TICK_INTERVAL_MS,
            display_transfer: TransferFunction::Linear,
        }
    }
}
