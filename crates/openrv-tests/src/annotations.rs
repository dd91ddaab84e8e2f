//! Annotation strokes, tools and their history entries.

use openrv_core::Vec2;
use openrv_session::{Brush, SessionEvent, Tool};

use crate::fixtures::session;

fn draw(s: &mut openrv_session::Session, from: (f32, f32), to: (f32, f32)) {
    s.handle(SessionEvent::PointerDown {
        x: from.0,
        y: from.1,
        pressure: 1.0,
    })
    .unwrap();
    s.handle(SessionEvent::PointerMove {
        x: to.0,
        y: to.1,
        pressure: 0.6,
    })
    .unwrap();
    s.handle(SessionEvent::PointerUp).unwrap();
}

#[test]
fn one_stroke_one_undo() {
    let (mut s, _clock) = session();
    s.set_tool("pen").unwrap();
    let before = s.paint_state().visible_annotation_count;

    draw(&mut s, (10.0, 10.0), (200.0, 40.0));
    assert_eq!(s.paint_state().visible_annotation_count, before + 1);

    s.undo();
    assert_eq!(s.paint_state().visible_annotation_count, before);
}

#[test]
fn strokes_interleave_with_other_edits() {
    let (mut s, _clock) = session();
    s.set_tool("pen").unwrap();
    draw(&mut s, (0.0, 0.0), (50.0, 50.0));
    s.rotate_cw();
    draw(&mut s, (0.0, 100.0), (50.0, 150.0));

    s.undo();
    assert_eq!(s.paint_state().visible_annotation_count, 1);
    assert_eq!(s.transform_state().rotation, 90);
    s.undo();
    assert_eq!(s.transform_state().rotation, 0);
    assert_eq!(s.paint_state().visible_annotation_count, 1);
}

#[test]
fn no_tool_draws_nothing() {
    let (mut s, _clock) = session();
    draw(&mut s, (0.0, 0.0), (50.0, 50.0));
    assert_eq!(s.paint_state().total_annotation_count, 0);
    assert!(!s.can_undo());
}

#[test]
fn eraser_drag_removes_each_stroke_it_crosses() {
    let (mut s, _clock) = session();
    s.set_tool("pen").unwrap();
    draw(&mut s, (0.0, 0.0), (0.0, 100.0));
    draw(&mut s, (50.0, 0.0), (50.0, 100.0));
    draw(&mut s, (300.0, 0.0), (300.0, 100.0));

    s.set_tool("eraser").unwrap();
    s.pointer_down(-10.0, 50.0, 1.0);
    s.pointer_move(0.0, 50.0, 1.0);
    s.pointer_move(50.0, 50.0, 1.0);
    s.pointer_up();
    assert_eq!(s.paint_state().visible_annotation_count, 1);

    s.undo();
    s.undo();
    assert_eq!(s.paint_state().visible_annotation_count, 3);
}

#[test]
fn strokes_are_per_frame_with_ghosts() {
    let (mut s, _clock) = session();
    s.set_tool("pen").unwrap();
    s.set_brush(Brush {
        color: [0.1, 0.9, 0.2, 1.0],
        width: 2.0,
    });
    draw(&mut s, (0.0, 0.0), (10.0, 10.0));
    s.seek(3);
    draw(&mut s, (0.0, 0.0), (10.0, 10.0));
    s.seek(2);

    let paint = s.paint_state();
    assert_eq!(paint.visible_annotation_count, 0);
    assert_eq!(paint.total_annotation_count, 2);
    assert_eq!(paint.ghost_annotation_count, 0);

    s.handle(SessionEvent::SetGhost { enabled: true }).unwrap();
    assert_eq!(s.paint_state().ghost_annotation_count, 2);

    s.set_tool("none").unwrap();
    assert_eq!(s.paint_state().ghost_annotation_count, 0);
    assert_eq!(s.paint_state().current_tool, Tool::None);
}

#[test]
fn paint_snapshot_serializes_for_test_hooks() {
    let (mut s, _clock) = session();
    s.set_tool("Pen").unwrap();
    draw(&mut s, (1.0, 1.0), (2.0, 2.0));
    let json = serde_json::to_value(s.paint_state()).unwrap();
    assert_eq!(json["visibleAnnotationCount"], 1);
    assert_eq!(json["currentTool"], "pen");
}

#[test]
fn erase_undo_redo_round_trip() {
    let (mut s, _clock) = session();
    s.set_tool("pen").unwrap();
    draw(&mut s, (0.0, 0.0), (100.0, 0.0));
    draw(&mut s, (0.0, 60.0), (100.0, 60.0));
    let erased = s.visible_annotations().next().unwrap().id;

    s.set_tool("eraser").unwrap();
    assert!(s.erase_at(Vec2::new(50.0, 1.0)));
    let remaining: Vec<_> = s.visible_annotations().map(|a| a.id).collect();
    assert_eq!(remaining.len(), 1);
    assert!(!remaining.contains(&erased));

    s.undo();
    let restored: Vec<_> = s.visible_annotations().map(|a| a.id).collect();
    assert_eq!(restored, vec![erased, remaining[0]]);

    assert!(s.redo());
    let after_redo: Vec<_> = s.visible_annotations().map(|a| a.id).collect();
    assert_eq!(after_redo, remaining);
    assert!(!s.can_redo());

    // The erased stroke comes back once more on a second undo.
    s.undo();
    assert_eq!(s.visible_annotations().next().unwrap().id, erased);
}

#[test]
fn clear_frame_undo_redo_round_trip() {
    let (mut s, _clock) = session();
    s.set_tool("pen").unwrap();
    for y in [0.0, 20.0, 40.0] {
        draw(&mut s, (0.0, y), (30.0, y));
    }
    let ids: Vec<_> = s.visible_annotations().map(|a| a.id).collect();

    assert_eq!(s.clear_frame_annotations(), 3);
    let entries = s.history_panel_state().entry_count;
    assert_eq!(s.paint_state().visible_annotation_count, 0);

    s.undo();
    let restored: Vec<_> = s.visible_annotations().map(|a| a.id).collect();
    assert_eq!(restored, ids);

    assert!(s.redo());
    assert_eq!(s.paint_state().visible_annotation_count, 0);
    assert_eq!(s.paint_state().total_annotation_count, 0);
    assert_eq!(s.history_panel_state().entry_count, entries);
    assert!(!s.can_redo());
}

#[test]
fn redrawing_after_undo_keeps_one_stroke() {
    let (mut s, _clock) = session();
    s.set_tool("pen").unwrap();
    draw(&mut s, (0.0, 0.0), (10.0, 10.0));
    s.undo();
    draw(&mut s, (20.0, 20.0), (30.0, 30.0));

    let paint = s.paint_state();
    assert_eq!(paint.visible_annotation_count, 1);
    assert_eq!(paint.total_annotation_count, 1);
    assert!(!s.can_redo());
}
