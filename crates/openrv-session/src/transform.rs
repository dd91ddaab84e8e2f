//! Display transform of the viewed frame: rotation and mirroring.

use glam::{Mat3, Vec2};
use openrv_core::Rotation;
use serde::{Deserialize, Serialize};

/// Rotation and flip parameters. A plain value; the session replaces it
/// wholesale on every change so undo can restore it in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformState {
    pub rotation: Rotation,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl TransformState {
    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    pub fn with_flip_horizontal(self, flip: bool) -> Self {
        Self {
            flip_horizontal: flip,
            ..self
        }
    }

    pub fn with_flip_vertical(self, flip: bool) -> Self {
        Self {
            flip_vertical: flip,
            ..self
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Size of the frame on screen after rotation.
    pub fn display_size(&self, width: u32, height: u32) -> (u32, u32) {
        if self.rotation.is_quarter_turn() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Matrix mapping centered image coordinates to centered display
    /// coordinates. Mirroring happens before rotation.
    pub fn to_matrix(&self) -> Mat3 {
        let flip = Vec2::new(
            if self.flip_horizontal { -1.0 } else { 1.0 },
            if self.flip_vertical { -1.0 } else { 1.0 },
        );
        self.rotation.to_matrix() * Mat3::from_scale(flip)
    }
}
