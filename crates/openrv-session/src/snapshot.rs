//! Read-only views of session state for observers (renderer, UI panels,
//! test harnesses). Field names serialize in camelCase to match the test
//! hook surface of the review application.

use openrv_core::{FrameRange, LoopMode};
use serde::{Deserialize, Serialize};

use crate::paint::Tool;
use crate::playback::PlaybackMode;

/// Playback and media state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub media_name: String,
    pub current_frame: i64,
    pub frame_range: FrameRange,
    pub fps: f64,
    pub mode: PlaybackMode,
    pub is_playing: bool,
    pub playback_speed: f64,
    pub interpolation_enabled: bool,
    pub sub_frame_position: Option<f64>,
    pub loop_mode: LoopMode,
    pub page_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSnapshot {
    pub exposure: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformSnapshot {
    /// Degrees clockwise: 0, 90, 180 or 270.
    pub rotation: u32,
    pub flip_h: bool,
    pub flip_v: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintSnapshot {
    pub current_tool: Tool,
    /// Strokes drawn on the current frame and not erased.
    pub visible_annotation_count: usize,
    /// Strokes on neighbouring frames drawn as ghosts.
    pub ghost_annotation_count: usize,
    /// Live strokes on all frames.
    pub total_annotation_count: usize,
    pub ghost_enabled: bool,
    pub is_drawing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPanelState {
    pub entry_count: usize,
    /// Index of the last executed entry, `None` when everything is undone.
    pub current_index: Option<usize>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub has_pending_edit: bool,
    /// Label of the entry the next undo reverts.
    pub undo_label: Option<String>,
    /// Label of the entry the next redo re-applies.
    pub redo_label: Option<String>,
    /// Entry labels, oldest first.
    pub entries: Vec<String>,
}
