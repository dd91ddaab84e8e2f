//! Input messages delivered to a session.
//!
//! Everything that can change a session (user input, page visibility,
//! scheduler ticks) arrives as a [`SessionEvent`] so it can travel through
//! one serialized queue.

use serde::{Deserialize, Serialize};

// ── Shortcut representation ─────────────────────────────────────

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: bool, // ⌘ on macOS
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        command: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
        command: false,
    };
    pub const CMD: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        command: true,
    };
    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        alt: false,
        command: false,
    };
    pub const CMD_SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
        command: true,
    };

    /// Ctrl on Linux/Windows or ⌘ on macOS.
    #[inline]
    pub fn primary(&self) -> bool {
        self.ctrl || self.command
    }
}

/// A keyboard chord (modifiers + key name as reported by the host).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shortcut {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub key: String,
}

impl Shortcut {
    pub fn new(modifiers: Modifiers, key: impl Into<String>) -> Self {
        Self {
            modifiers,
            key: key.into(),
        }
    }

    /// Session action bound to this chord, if any.
    pub fn action(&self) -> Option<SessionEvent> {
        let key = self.key.to_ascii_lowercase();
        let m = self.modifiers;
        match key.as_str() {
            " " | "space" if !m.primary() => Some(SessionEvent::TogglePlay),
            "arrowright" | "right" if !m.primary() => Some(SessionEvent::StepFrame { delta: 1 }),
            "arrowleft" | "left" if !m.primary() => Some(SessionEvent::StepFrame { delta: -1 }),
            "z" if m.primary() && m.shift => Some(SessionEvent::Redo),
            "z" if m.primary() => Some(SessionEvent::Undo),
            "y" if m.primary() && !m.shift => Some(SessionEvent::Redo),
            _ => None,
        }
    }
}

// ── Events ──────────────────────────────────────────────────────

fn full_pressure() -> f32 {
    1.0
}

/// A message for the session. Serializes as `{"type": "set_exposure", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    TogglePlay,
    Play,
    Pause,
    Stop,
    StepFrame {
        delta: i64,
    },
    Seek {
        frame: i64,
    },
    Undo,
    Redo,
    SetExposure {
        value: f32,
    },
    ResetColor,
    SetRotation {
        degrees: u32,
    },
    RotateClockwise,
    RotateCounterClockwise,
    FlipHorizontal,
    FlipVertical,
    ResetTransform,
    SetTool {
        name: String,
    },
    SetGhost {
        enabled: bool,
    },
    ClearFrameAnnotations,
    SetSpeed {
        speed: f64,
    },
    SetInterpolation {
        enabled: bool,
    },
    PointerDown {
        x: f32,
        y: f32,
        #[serde(default = "full_pressure")]
        pressure: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
        #[serde(default = "full_pressure")]
        pressure: f32,
    },
    PointerUp,
    /// Host page became visible (`true`) or hidden (`false`).
    Visibility {
        visible: bool,
    },
    Key(Shortcut),
    /// Scheduling tick: fire due debounce timers and advance playback.
    Tick,
    /// Stop the driver loop.
    Shutdown,
}
