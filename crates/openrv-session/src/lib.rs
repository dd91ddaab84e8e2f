//! OpenRV Session - the review session state engine
//!
//! A [`Session`] owns the per-document state of a review player:
//! - Color (exposure) and display transform (rotation, flips)
//! - Annotation strokes with pen/eraser tools and ghosting
//! - The playback clock, sub-frame interpolation and page visibility
//! - One chronological undo/redo history across all of the above
//!
//! [`SessionDriver`] runs a session on its own thread, fed by a channel of
//! [`SessionEvent`]s.

pub mod clock;
pub mod command;
pub mod driver;
pub mod event;
pub mod history;
pub mod interpolation;
pub mod paint;
pub mod playback;
pub mod session;
pub mod snapshot;
pub mod transform;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{CoalesceKey, CommandTarget, SessionCommand};
pub use driver::{EventSender, SessionDriver};
pub use event::{Modifiers, SessionEvent, Shortcut};
pub use history::{HistoryEntry, HistoryManager, PendingCommand};
pub use interpolation::{blend_weights, compute_sub_frame};
pub use paint::{Annotation, Brush, PaintLayer, Tool};
pub use playback::{PlaybackController, PlaybackMode};
pub use session::{Session, SessionState};
pub use snapshot::{
    ColorSnapshot, HistoryPanelState, PaintSnapshot, SessionSnapshot, TransformSnapshot,
};
pub use transform::TransformState;
