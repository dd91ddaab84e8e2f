//! The review session: one owner for every piece of per-document state.
//!
//! Every public setter builds a [`SessionCommand`] from the pre-mutation
//! value and hands it to the [`HistoryManager`], which applies it through
//! [`SessionState`]'s [`CommandTarget`] impl. Undo and redo use that same
//! path, so forward edits and replays have identical side effects.
//!
//! Transport (play/pause, stepping, visibility) and the active tool are
//! transient and bypass history.

use std::fmt;
use std::sync::Arc;

use openrv_color::{ColorPipeline, ColorState};
use openrv_core::{
    LoopMode, MediaInfo, Result, Rotation, RvError, SessionConfig, StrokePoint, Vec2,
};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::command::{CommandTarget, SessionCommand};
use crate::event::SessionEvent;
use crate::history::HistoryManager;
use crate::paint::{Annotation, Brush, PaintLayer, Tool};
use crate::playback::PlaybackController;
use crate::snapshot::{
    ColorSnapshot, HistoryPanelState, PaintSnapshot, SessionSnapshot, TransformSnapshot,
};
use crate::transform::TransformState;

/// The mutable sub-states of a session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub media: MediaInfo,
    pub color: ColorState,
    pub transform: TransformState,
    pub paint: PaintLayer,
    pub playback: PlaybackController,
}

impl SessionState {
    pub fn new(media: MediaInfo, config: &SessionConfig) -> Self {
        Self {
            playback: PlaybackController::new(&media, config.loop_mode),
            paint: PaintLayer::new(config.ghost_frames),
            color: ColorState::default(),
            transform: TransformState::default(),
            media,
        }
    }
}

impl CommandTarget for SessionState {
    fn apply_command(&mut self, command: &SessionCommand) {
        match command {
            SessionCommand::ColorChange { new, .. } => {
                if let Err(err) = self.color.set_exposure(*new) {
                    warn!(%err, "Exposure command skipped");
                }
            }
            SessionCommand::TransformChange { new, .. } => self.transform = *new,
            SessionCommand::AnnotationAdd { annotation } => self.paint.insert(annotation.clone()),
            SessionCommand::AnnotationRemove { annotation } => {
                if !self.paint.remove(annotation.id) {
                    warn!(id = %annotation.id, "Erased stroke not found");
                }
            }
            SessionCommand::SpeedChange { new, .. } => {
                if let Err(err) = self.playback.set_speed(*new) {
                    warn!(%err, "Speed command skipped");
                }
            }
            SessionCommand::InterpolationToggle { new, .. } => {
                self.playback.set_interpolation(*new);
            }
            SessionCommand::Batch(commands) => {
                for c in commands {
                    self.apply_command(c);
                }
            }
        }
    }
}

/// A review session for one loaded media item.
pub struct Session {
    state: SessionState,
    history: HistoryManager,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    /// Eraser is held down; moves keep erasing.
    erasing: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session on `media` driven by wall-clock time.
    pub fn new(media: MediaInfo, config: SessionConfig) -> Self {
        Self::with_clock(media, config, Arc::new(SystemClock))
    }

    /// Create a session that reads time from `clock`.
    pub fn with_clock(media: MediaInfo, config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        info!(
            media = %media.name,
            frames = media.frames.len(),
            fps = media.frame_rate.to_fps_f64(),
            "Session created"
        );
        Self {
            state: SessionState::new(media, &config),
            history: HistoryManager::new(config.history_depth, config.debounce_window()),
            clock,
            config,
            erasing: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn media(&self) -> &MediaInfo {
        &self.state.media
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Replace the media. All sub-states return to their defaults and
    /// history is cleared; page visibility carries over.
    pub fn load(&mut self, media: MediaInfo) {
        let hidden = self.state.playback.is_hidden();
        info!(
            media = %media.name,
            frames = media.frames.len(),
            "Media loaded"
        );
        self.state = SessionState::new(media, &self.config);
        if hidden {
            self.state.playback.set_visibility(false);
        }
        self.history.clear();
        self.erasing = false;
    }

    /// Close the media, leaving an empty single-frame placeholder.
    pub fn unload(&mut self) {
        info!(media = %self.state.media.name, "Media unloaded");
        self.load(MediaInfo::image("", 0, 0));
    }

    // ── Color ───────────────────────────────────────────────────

    /// Set exposure in stops. Rapid changes merge into one history entry.
    pub fn set_exposure(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() {
            warn!(value, "Rejected non-finite exposure");
            return Err(RvError::invalid(format!(
                "exposure must be finite, got {value}"
            )));
        }
        let old = self.state.color.exposure;
        if old == value {
            return Ok(());
        }
        let now = self.clock.now();
        self.history.record(
            SessionCommand::ColorChange { old, new: value },
            &mut self.state,
            now,
        );
        Ok(())
    }

    pub fn exposure(&self) -> f32 {
        self.state.color.exposure
    }

    /// Restore default exposure as one undoable step.
    pub fn reset_color(&mut self) {
        let old = self.state.color.exposure;
        if old == ColorState::DEFAULT_EXPOSURE {
            return;
        }
        self.history.commit(
            SessionCommand::ColorChange {
                old,
                new: ColorState::DEFAULT_EXPOSURE,
            },
            &mut self.state,
        );
    }

    /// Pixel pipeline for the current color state, from the media encoding
    /// to the configured display encoding.
    pub fn color_pipeline(&self) -> ColorPipeline {
        ColorPipeline::for_display(
            self.state.media.transfer,
            self.config.display_transfer,
            &self.state.color,
        )
    }

    // ── Transform ───────────────────────────────────────────────

    pub fn set_rotation(&mut self, degrees: u32) -> Result<()> {
        let rotation = Rotation::from_degrees(degrees).map_err(|err| {
            warn!(degrees, %err, "Rejected rotation");
            err
        })?;
        self.change_transform(self.state.transform.with_rotation(rotation));
        Ok(())
    }

    pub fn rotate_cw(&mut self) {
        let t = self.state.transform;
        self.change_transform(t.with_rotation(t.rotation.clockwise()));
    }

    pub fn rotate_ccw(&mut self) {
        let t = self.state.transform;
        self.change_transform(t.with_rotation(t.rotation.counter_clockwise()));
    }

    pub fn toggle_flip_horizontal(&mut self) {
        let t = self.state.transform;
        self.change_transform(t.with_flip_horizontal(!t.flip_horizontal));
    }

    pub fn toggle_flip_vertical(&mut self) {
        let t = self.state.transform;
        self.change_transform(t.with_flip_vertical(!t.flip_vertical));
    }

    /// Back to no rotation and no flips, as one undoable step.
    pub fn reset_transform(&mut self) {
        self.change_transform(TransformState::default());
    }

    pub fn transform(&self) -> TransformState {
        self.state.transform
    }

    fn change_transform(&mut self, new: TransformState) {
        let old = self.state.transform;
        if old == new {
            return;
        }
        self.history
            .commit(SessionCommand::TransformChange { old, new }, &mut self.state);
    }

    // ── Annotations ─────────────────────────────────────────────

    /// Select a tool by name (`none`, `pen`, `eraser`).
    pub fn set_tool(&mut self, name: &str) -> Result<()> {
        let tool: Tool = name.parse().map_err(|err: RvError| {
            warn!(name, %err, "Rejected tool");
            err
        })?;
        self.erasing = false;
        self.state.paint.set_tool(tool);
        debug!(tool = %tool, "Tool selected");
        Ok(())
    }

    pub fn tool(&self) -> Tool {
        self.state.paint.tool()
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.state.paint.set_brush(brush);
    }

    pub fn set_ghost(&mut self, enabled: bool) {
        self.state.paint.set_ghost(enabled);
    }

    /// Strokes drawn on the current frame.
    pub fn visible_annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.state.paint.visible_at(self.current_frame())
    }

    /// Strokes on neighbouring frames shown as ghosts.
    pub fn ghost_annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.state.paint.ghosts_at(self.current_frame())
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, pressure: f32) {
        let point = StrokePoint::new(x, y, pressure);
        match self.state.paint.tool() {
            Tool::Pen => {
                let frame = self.current_frame();
                self.state.paint.begin_stroke(frame, point);
            }
            Tool::Eraser => {
                self.erasing = true;
                self.erase_at(point.position);
            }
            Tool::None => {}
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, pressure: f32) {
        let point = StrokePoint::new(x, y, pressure);
        if self.state.paint.is_drawing() {
            self.state.paint.extend_stroke(point);
        } else if self.erasing {
            self.erase_at(point.position);
        }
    }

    /// Finish the current gesture. A pen stroke becomes one history entry.
    pub fn pointer_up(&mut self) {
        self.erasing = false;
        if let Some(annotation) = self.state.paint.finish_stroke() {
            debug!(
                frame = annotation.frame,
                points = annotation.points.len(),
                "Stroke finished"
            );
            self.history
                .commit(SessionCommand::AnnotationAdd { annotation }, &mut self.state);
        }
    }

    /// Erase the topmost stroke under `pos` on the current frame.
    pub fn erase_at(&mut self, pos: Vec2) -> bool {
        let frame = self.current_frame();
        let Some(annotation) = self
            .state
            .paint
            .pick(frame, pos, self.config.eraser_tolerance)
            .cloned()
        else {
            return false;
        };
        self.history
            .commit(SessionCommand::AnnotationRemove { annotation }, &mut self.state);
        true
    }

    /// Erase every stroke on the current frame as one undoable step.
    /// Returns the number of strokes erased.
    pub fn clear_frame_annotations(&mut self) -> usize {
        let mut removals: Vec<SessionCommand> = self
            .visible_annotations()
            .cloned()
            .map(|annotation| SessionCommand::AnnotationRemove { annotation })
            .collect();
        let count = removals.len();
        let command = match count {
            0 => return 0,
            1 => removals.remove(0),
            _ => SessionCommand::Batch(removals),
        };
        self.history.commit(command, &mut self.state);
        count
    }

    // ── Playback ────────────────────────────────────────────────

    /// Set the speed multiplier. Rapid changes merge into one history entry.
    pub fn set_playback_speed(&mut self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            warn!(speed, "Rejected playback speed");
            return Err(RvError::invalid(format!(
                "playback speed must be positive, got {speed}"
            )));
        }
        let old = self.state.playback.speed();
        if old == speed {
            return Ok(());
        }
        let now = self.clock.now();
        self.history.record(
            SessionCommand::SpeedChange { old, new: speed },
            &mut self.state,
            now,
        );
        Ok(())
    }

    pub fn set_interpolation_enabled(&mut self, enabled: bool) {
        let old = self.state.playback.interpolation_enabled();
        if old == enabled {
            return;
        }
        self.history.commit(
            SessionCommand::InterpolationToggle { old, new: enabled },
            &mut self.state,
        );
    }

    pub fn play(&mut self) {
        self.state.playback.play();
    }

    pub fn pause(&mut self) {
        self.state.playback.pause();
    }

    pub fn stop(&mut self) {
        self.state.playback.stop();
    }

    pub fn toggle_playback(&mut self) {
        self.state.playback.toggle();
    }

    pub fn step_frame(&mut self, delta: i64) {
        self.state.playback.step(delta);
    }

    pub fn seek(&mut self, frame: i64) {
        self.state.playback.seek(frame);
    }

    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.state.playback.set_loop_mode(loop_mode);
    }

    /// Page visibility edge. Returns false when the edge repeats the
    /// current state.
    pub fn set_visibility(&mut self, visible: bool) -> bool {
        self.state.playback.set_visibility(visible)
    }

    pub fn current_frame(&self) -> i64 {
        self.state.playback.current_frame()
    }

    pub fn is_playing(&self) -> bool {
        self.state.playback.is_playing()
    }

    pub fn playback_speed(&self) -> f64 {
        self.state.playback.speed()
    }

    pub fn interpolation_enabled(&self) -> bool {
        self.state.playback.interpolation_enabled()
    }

    pub fn sub_frame_position(&self) -> Option<f64> {
        self.state.playback.sub_frame_position()
    }

    // ── History ─────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.state)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.state)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Scheduling ──────────────────────────────────────────────

    /// Commit a debounced edit whose window has closed, then advance
    /// playback. Returns the number of frames the playhead moved.
    pub fn tick(&mut self) -> i64 {
        let now = self.clock.now();
        self.history.flush_expired(now);
        self.state.playback.tick(now)
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::TogglePlay => self.toggle_playback(),
            SessionEvent::Play => self.play(),
            SessionEvent::Pause => self.pause(),
            SessionEvent::Stop => self.stop(),
            SessionEvent::StepFrame { delta } => self.step_frame(delta),
            SessionEvent::Seek { frame } => self.seek(frame),
            SessionEvent::Undo => {
                self.undo();
            }
            SessionEvent::Redo => {
                self.redo();
            }
            SessionEvent::SetExposure { value } => self.set_exposure(value)?,
            SessionEvent::ResetColor => self.reset_color(),
            SessionEvent::SetRotation { degrees } => self.set_rotation(degrees)?,
            SessionEvent::RotateClockwise => self.rotate_cw(),
            SessionEvent::RotateCounterClockwise => self.rotate_ccw(),
            SessionEvent::FlipHorizontal => self.toggle_flip_horizontal(),
            SessionEvent::FlipVertical => self.toggle_flip_vertical(),
            SessionEvent::ResetTransform => self.reset_transform(),
            SessionEvent::SetTool { name } => self.set_tool(&name)?,
            SessionEvent::SetGhost { enabled } => self.set_ghost(enabled),
            SessionEvent::ClearFrameAnnotations => {
                self.clear_frame_annotations();
            }
            SessionEvent::SetSpeed { speed } => self.set_playback_speed(speed)?,
            SessionEvent::SetInterpolation { enabled } => self.set_interpolation_enabled(enabled),
            SessionEvent::PointerDown { x, y, pressure } => self.pointer_down(x, y, pressure),
            SessionEvent::PointerMove { x, y, pressure } => self.pointer_move(x, y, pressure),
            SessionEvent::PointerUp => self.pointer_up(),
            SessionEvent::Visibility { visible } => {
                self.set_visibility(visible);
            }
            SessionEvent::Key(shortcut) => match shortcut.action() {
                Some(action) => return self.handle(action),
                None => debug!(key = %shortcut.key, "Unbound key"),
            },
            SessionEvent::Tick => {
                self.tick();
            }
            SessionEvent::Shutdown => {}
        }
        Ok(())
    }

    // ── Snapshots ───────────────────────────────────────────────

    pub fn session_state(&self) -> SessionSnapshot {
        let pb = &self.state.playback;
        SessionSnapshot {
            media_name: self.state.media.name.clone(),
            current_frame: pb.current_frame(),
            frame_range: pb.range(),
            fps: pb.frame_rate().to_fps_f64(),
            mode: pb.mode(),
            is_playing: pb.is_playing(),
            playback_speed: pb.speed(),
            interpolation_enabled: pb.interpolation_enabled(),
            sub_frame_position: pb.sub_frame_position(),
            loop_mode: pb.loop_mode(),
            page_visible: !pb.is_hidden(),
        }
    }

    pub fn color_state(&self) -> ColorSnapshot {
        ColorSnapshot {
            exposure: self.state.color.exposure,
        }
    }

    pub fn transform_state(&self) -> TransformSnapshot {
        let t = self.state.transform;
        TransformSnapshot {
            rotation: t.rotation.degrees(),
            flip_h: t.flip_horizontal,
            flip_v: t.flip_vertical,
        }
    }

    pub fn paint_state(&self) -> PaintSnapshot {
        let paint = &self.state.paint;
        PaintSnapshot {
            current_tool: paint.tool(),
            visible_annotation_count: self.visible_annotations().count(),
            ghost_annotation_count: self.ghost_annotations().count(),
            total_annotation_count: paint.live_count(),
            ghost_enabled: paint.ghost(),
            is_drawing: paint.is_drawing(),
        }
    }

    pub fn history_panel_state(&self) -> HistoryPanelState {
        let h = &self.history;
        HistoryPanelState {
            entry_count: h.entry_count(),
            current_index: h.undo_count().checked_sub(1),
            can_undo: h.can_undo(),
            can_redo: h.can_redo(),
            has_pending_edit: h.pending().is_some(),
            undo_label: h.undo_label().map(str::to_owned),
            redo_label: h.redo_label().map(str::to_owned),
            entries: h.labels(),
        }
    }
}
