//! Sessions running behind the event-loop driver.

use openrv_core::RvError;
use openrv_session::{Modifiers, SessionDriver, SessionEvent, Shortcut};

use crate::fixtures::session;

#[test]
fn queued_events_replay_in_order() {
    let (s, _clock) = session();
    let (tx, handle) = SessionDriver::spawn(s).unwrap();

    let events = [
        SessionEvent::SetExposure { value: 1.0 },
        SessionEvent::SetExposure { value: 2.0 },
        SessionEvent::SetRotation { degrees: 90 },
        SessionEvent::Key(Shortcut::new(Modifiers::CMD, "z")),
        SessionEvent::Key(Shortcut::new(Modifiers::NONE, "ArrowRight")),
        SessionEvent::SetTool {
            name: "pen".to_string(),
        },
        SessionEvent::PointerDown {
            x: 5.0,
            y: 5.0,
            pressure: 1.0,
        },
        SessionEvent::PointerUp,
    ];
    for event in events {
        tx.send(event).unwrap();
    }
    tx.shutdown().unwrap();

    let s = handle.join().unwrap();
    assert_eq!(s.exposure(), 2.0);
    assert_eq!(s.transform_state().rotation, 0);
    assert_eq!(s.current_frame(), 2);
    assert_eq!(s.paint_state().visible_annotation_count, 1);

    // Exposure burst, then the stroke; the rotation was undone and its redo
    // cleared by the stroke.
    assert_eq!(s.history_panel_state().entry_count, 2);
}

#[test]
fn rejected_event_does_not_stop_the_loop() {
    let (s, _clock) = session();
    let (tx, handle) = SessionDriver::spawn(s).unwrap();
    tx.send(SessionEvent::SetSpeed { speed: -2.0 }).unwrap();
    tx.send(SessionEvent::SetSpeed { speed: 2.0 }).unwrap();
    tx.shutdown().unwrap();

    let s = handle.join().unwrap();
    assert_eq!(s.playback_speed(), 2.0);
    assert!(matches!(
        tx.send(SessionEvent::Tick),
        Err(RvError::SessionClosed)
    ));
}
