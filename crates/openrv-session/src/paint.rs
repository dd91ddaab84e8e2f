//! Annotation strokes drawn over frames.
//!
//! Strokes are kept in drawing order. Removing the newest stroke drops it
//! outright; any other removal only marks the stroke deleted, so that undo
//! can bring back the exact same stroke in its original place.

use openrv_core::geometry::distance_to_segment;
use openrv_core::{RvError, StrokePoint, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The active annotation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer input is not captured for annotations.
    #[default]
    None,
    Pen,
    Eraser,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pen => "pen",
            Self::Eraser => "eraser",
        }
    }

    /// Tools that work on annotations (and so show ghosted neighbours).
    #[inline]
    pub fn edits_annotations(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for Tool {
    type Err = RvError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "pen" => Ok(Self::Pen),
            "eraser" => Ok(Self::Eraser),
            other => Err(RvError::invalid(format!("unknown tool '{other}'"))),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color and width for new strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// Straight RGBA in `[0, 1]`.
    pub color: [f32; 4],
    /// Stroke width in image pixels.
    pub width: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: [1.0, 0.2, 0.2, 1.0],
            width: 4.0,
        }
    }
}

/// A single pen stroke on one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: Uuid,
    pub frame: i64,
    pub tool: Tool,
    pub points: Vec<StrokePoint>,
    pub brush: Brush,
    /// Set by the eraser; deleted strokes are never visible.
    pub deleted: bool,
}

impl Annotation {
    pub fn new(frame: i64, brush: Brush) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            tool: Tool::Pen,
            points: Vec::new(),
            brush,
            deleted: false,
        }
    }

    /// Whether `pos` lies on the stroke, widened by `tolerance` pixels.
    pub fn hit_test(&self, pos: Vec2, tolerance: f32) -> bool {
        let reach = self.brush.width * 0.5 + tolerance;
        match self.points.as_slice() {
            [] => false,
            [only] => only.position.distance(pos) <= reach,
            points => points
                .windows(2)
                .any(|w| distance_to_segment(pos, w[0].position, w[1].position) <= reach),
        }
    }
}

/// All annotations of a session plus the stroke being drawn.
#[derive(Debug, Clone, Default)]
pub struct PaintLayer {
    annotations: Vec<Annotation>,
    tool: Tool,
    brush: Brush,
    ghost: bool,
    ghost_frames: u32,
    /// Stroke under construction between pointer-down and pointer-up.
    active: Option<Annotation>,
}

impl PaintLayer {
    pub fn new(ghost_frames: u32) -> Self {
        Self {
            ghost_frames,
            ..Self::default()
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. An unfinished stroke is abandoned.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.active.take().is_some() {
            tracing::debug!(tool = %tool, "Unfinished stroke dropped on tool change");
        }
        self.tool = tool;
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    pub fn ghost(&self) -> bool {
        self.ghost
    }

    pub fn set_ghost(&mut self, ghost: bool) {
        self.ghost = ghost;
    }

    /// Insert a stroke, or revive it if a stroke with the same id exists.
    pub fn insert(&mut self, annotation: Annotation) {
        match self.annotations.iter_mut().find(|a| a.id == annotation.id) {
            Some(existing) => {
                *existing = annotation;
                existing.deleted = false;
            }
            None => {
                let mut annotation = annotation;
                annotation.deleted = false;
                self.annotations.push(annotation);
            }
        }
    }

    /// Remove a stroke. Returns false when the id is unknown.
    ///
    /// The newest stroke is dropped from the list; re-inserting it appends
    /// it back in the same place. Older strokes are soft-deleted.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(index) = self.annotations.iter().position(|a| a.id == id) else {
            return false;
        };
        if index + 1 == self.annotations.len() {
            self.annotations.pop();
        } else {
            self.annotations[index].deleted = true;
        }
        true
    }

    /// Live (not deleted) strokes on `frame`, in drawing order.
    pub fn visible_at(&self, frame: i64) -> impl Iterator<Item = &Annotation> {
        self.annotations
            .iter()
            .filter(move |a| !a.deleted && a.frame == frame)
    }

    pub fn visible_count(&self, frame: i64) -> usize {
        self.visible_at(frame).count()
    }

    /// Live strokes on neighbouring frames shown as ghosts. Ghosts only
    /// appear while ghosting is on and an annotation tool is active.
    pub fn ghosts_at(&self, frame: i64) -> impl Iterator<Item = &Annotation> {
        let range = if self.ghost && self.tool.edits_annotations() {
            self.ghost_frames as i64
        } else {
            0
        };
        self.annotations.iter().filter(move |a| {
            !a.deleted && a.frame != frame && (a.frame - frame).abs() <= range
        })
    }

    /// Count of all live strokes on every frame.
    pub fn live_count(&self) -> usize {
        self.annotations.iter().filter(|a| !a.deleted).count()
    }

    /// Topmost visible stroke on `frame` under `pos`.
    pub fn pick(&self, frame: i64, pos: Vec2, tolerance: f32) -> Option<&Annotation> {
        self.annotations
            .iter()
            .rev()
            .find(|a| !a.deleted && a.frame == frame && a.hit_test(pos, tolerance))
    }

    /// Start a stroke on `frame`. Only the pen draws.
    pub fn begin_stroke(&mut self, frame: i64, point: StrokePoint) -> bool {
        if self.tool != Tool::Pen {
            return false;
        }
        let mut stroke = Annotation::new(frame, self.brush);
        stroke.points.push(point);
        self.active = Some(stroke);
        true
    }

    /// Append a point to the stroke in progress, if any.
    pub fn extend_stroke(&mut self, point: StrokePoint) -> bool {
        match self.active.as_mut() {
            Some(stroke) => {
                stroke.points.push(point);
                true
            }
            None => false,
        }
    }

    /// Take the finished stroke. It is not inserted; the caller commits it.
    pub fn finish_stroke(&mut self) -> Option<Annotation> {
        self.active.take().filter(|s| !s.points.is_empty())
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

}
