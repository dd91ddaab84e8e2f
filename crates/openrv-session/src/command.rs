//! Undoable session commands.
//!
//! Uses the Command pattern: every mutation is a `SessionCommand` that
//! carries both the old and the new value, so its inverse is available
//! without looking at live state. Commands are never modified after they
//! are recorded.

use crate::paint::Annotation;
use crate::transform::TransformState;

/// Receiver of commands. The session implements this once and both forward
/// application and undo/redo go through it, so side effects are identical.
pub trait CommandTarget {
    fn apply_command(&mut self, command: &SessionCommand);
}

/// Fields whose rapid edits merge into one history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoalesceKey {
    Exposure,
    PlaybackSpeed,
}

/// A reversible edit of session state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Exposure change in stops.
    ColorChange { old: f32, new: f32 },
    /// Rotation and/or flip change.
    TransformChange {
        old: TransformState,
        new: TransformState,
    },
    /// A stroke was drawn. Holds the full stroke so undo removes exactly it.
    AnnotationAdd { annotation: Annotation },
    /// A stroke was erased. Holds the full stroke so undo restores it.
    AnnotationRemove { annotation: Annotation },
    /// Playback speed multiplier change.
    SpeedChange { old: f64, new: f64 },
    /// Sub-frame interpolation switched on or off.
    InterpolationToggle { old: bool, new: bool },
    /// Several commands applied as one history entry.
    Batch(Vec<SessionCommand>),
}

impl SessionCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::ColorChange { old, new } => Self::ColorChange {
                old: *new,
                new: *old,
            },
            Self::TransformChange { old, new } => Self::TransformChange {
                old: *new,
                new: *old,
            },
            Self::AnnotationAdd { annotation } => Self::AnnotationRemove {
                annotation: annotation.clone(),
            },
            Self::AnnotationRemove { annotation } => Self::AnnotationAdd {
                annotation: annotation.clone(),
            },
            Self::SpeedChange { old, new } => Self::SpeedChange {
                old: *new,
                new: *old,
            },
            Self::InterpolationToggle { old, new } => Self::InterpolationToggle {
                old: *new,
                new: *old,
            },
            Self::Batch(commands) => {
                Self::Batch(commands.iter().rev().map(|c| c.inverse()).collect())
            }
        }
    }

    /// True when applying the command would change nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            Self::ColorChange { old, new } => old == new,
            Self::TransformChange { old, new } => old == new,
            Self::SpeedChange { old, new } => old == new,
            Self::InterpolationToggle { old, new } => old == new,
            Self::AnnotationAdd { .. } | Self::AnnotationRemove { .. } => false,
            Self::Batch(commands) => commands.iter().all(|c| c.is_noop()),
        }
    }

    /// Field this command coalesces on, if it is a debounced scalar edit.
    pub fn coalesce_key(&self) -> Option<CoalesceKey> {
        match self {
            Self::ColorChange { .. } => Some(CoalesceKey::Exposure),
            Self::SpeedChange { .. } => Some(CoalesceKey::PlaybackSpeed),
            _ => None,
        }
    }

    /// Combine this command with a later edit of the same field: keep our
    /// starting value, take the later end value.
    pub fn merge(&self, later: &Self) -> Option<Self> {
        match (self, later) {
            (Self::ColorChange { old, .. }, Self::ColorChange { new, .. }) => {
                Some(Self::ColorChange {
                    old: *old,
                    new: *new,
                })
            }
            (Self::SpeedChange { old, .. }, Self::SpeedChange { new, .. }) => {
                Some(Self::SpeedChange {
                    old: *old,
                    new: *new,
                })
            }
            _ => None,
        }
    }

    /// Human-readable label for the history panel.
    pub fn label(&self) -> String {
        match self {
            Self::ColorChange { new, .. } => format!("Exposure {new:+.2}"),
            Self::TransformChange { old, new } => {
                if old.rotation != new.rotation {
                    format!("Rotate {}", new.rotation)
                } else if old.flip_horizontal != new.flip_horizontal {
                    "Flip horizontal".to_string()
                } else if old.flip_vertical != new.flip_vertical {
                    "Flip vertical".to_string()
                } else {
                    "Transform".to_string()
                }
            }
            Self::AnnotationAdd { annotation } => format!("Draw stroke (frame {})", annotation.frame),
            Self::AnnotationRemove { annotation } => {
                format!("Erase stroke (frame {})", annotation.frame)
            }
            Self::SpeedChange { new, .. } => format!("Playback speed {new}x"),
            Self::InterpolationToggle { new, .. } => {
                if *new {
                    "Interpolation on".to_string()
                } else {
                    "Interpolation off".to_string()
                }
            }
            Self::Batch(commands) => match commands.first() {
                Some(Self::AnnotationRemove { annotation }) => format!(
                    "Erase {} strokes (frame {})",
                    commands.len(),
                    annotation.frame
                ),
                _ => format!("{} changes", commands.len()),
            },
        }
    }
}
