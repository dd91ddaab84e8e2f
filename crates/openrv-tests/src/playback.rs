//! Playback clock, sub-frame interpolation and page visibility.

use openrv_core::{LoopMode, SessionConfig};
use openrv_session::{compute_sub_frame, SessionEvent};
use proptest::prelude::*;

use crate::fixtures::{session, session_with, settle};

proptest! {
    #[test]
    fn sub_frame_absent_without_interpolation(speed in 0.01f64..8.0, acc in 0.0f64..100.0) {
        prop_assert_eq!(compute_sub_frame(false, speed, acc), None);
    }

    #[test]
    fn sub_frame_presence_follows_speed(speed in 0.01f64..8.0, acc in 0.0f64..100.0) {
        let pos = compute_sub_frame(true, speed, acc);
        if speed >= 1.0 {
            prop_assert_eq!(pos, None);
        } else {
            let p = pos.unwrap();
            prop_assert!((0.0..1.0).contains(&p));
        }
    }

    #[test]
    fn session_projection_matches_fields(
        enabled in any::<bool>(),
        speed in prop::sample::select(vec![0.25f64, 0.5, 0.75, 1.0, 1.5, 2.0]),
        ticks in 0u64..40,
    ) {
        let (mut s, clock) = session();
        s.set_interpolation_enabled(enabled);
        s.set_playback_speed(speed).unwrap();
        s.play();
        s.tick();
        for _ in 0..ticks {
            clock.advance_ms(7);
            s.tick();
        }
        let expected = enabled && speed < 1.0;
        prop_assert_eq!(s.sub_frame_position().is_some(), expected);
        prop_assert_eq!(s.session_state().sub_frame_position.is_some(), expected);
    }
}

#[test]
fn half_speed_advances_half_a_frame_per_period() {
    let (mut s, clock) = session();
    s.set_interpolation_enabled(true);
    s.set_playback_speed(0.5).unwrap();
    settle(&mut s, &clock);

    // 42ms at 24fps and half speed is 0.504 frames.
    let frame_ms = 42;
    s.play();
    s.tick();
    clock.advance_ms(frame_ms);
    s.tick();
    let pos = s.sub_frame_position().unwrap();
    assert!((pos - 0.504).abs() < 1e-6, "position {pos}");
    assert_eq!(s.current_frame(), 1);

    clock.advance_ms(frame_ms);
    s.tick();
    assert_eq!(s.current_frame(), 2);
    assert!(s.sub_frame_position().unwrap() < 0.1);
}

#[test]
fn speed_one_nulls_sub_frame_immediately() {
    let (mut s, _clock) = session();
    s.set_interpolation_enabled(true);
    s.set_playback_speed(0.5).unwrap();
    assert!(s.sub_frame_position().is_some());

    s.set_playback_speed(1.0).unwrap();
    assert_eq!(s.sub_frame_position(), None);

    s.set_playback_speed(0.5).unwrap();
    s.set_interpolation_enabled(false);
    assert_eq!(s.sub_frame_position(), None);
}

#[test]
fn hidden_page_does_not_fast_forward() {
    let (mut s, clock) = session();
    s.play();
    s.tick();
    clock.advance_ms(500);
    s.tick();
    let before = s.current_frame();

    s.set_visibility(false);
    for _ in 0..250 {
        clock.advance_ms(4);
        s.tick();
    }
    s.set_visibility(true);
    s.tick();
    clock.advance_ms(4);
    s.tick();

    assert!(s.is_playing());
    assert!(s.current_frame() - before < 10);
}

#[test]
fn resume_keeps_sub_frame_position() {
    let (mut s, clock) = session();
    s.set_interpolation_enabled(true);
    s.set_playback_speed(0.5).unwrap();
    s.play();
    s.tick();
    clock.advance_ms(30);
    s.tick();
    let frame = s.current_frame();
    let pos = s.sub_frame_position();

    s.handle(SessionEvent::Visibility { visible: false }).unwrap();
    clock.advance_ms(2000);
    s.tick();
    s.handle(SessionEvent::Visibility { visible: true }).unwrap();
    s.tick();

    assert_eq!(s.current_frame(), frame);
    assert_eq!(s.sub_frame_position(), pos);
}

#[test]
fn paused_session_stays_paused_over_visibility_cycles() {
    let (mut s, clock) = session();
    s.play();
    s.pause();
    for _ in 0..5 {
        s.set_visibility(false);
        clock.advance_ms(100);
        s.set_visibility(true);
        s.tick();
    }
    assert!(!s.is_playing());
    assert_eq!(s.current_frame(), 1);
}

#[test]
fn pause_while_hidden_cancels_resume() {
    let (mut s, _clock) = session();
    s.play();
    s.set_visibility(false);
    s.pause();
    s.set_visibility(true);
    assert!(!s.is_playing());

    s.set_visibility(false);
    s.play();
    assert!(!s.is_playing());
    s.set_visibility(true);
    assert!(s.is_playing());
}

#[test]
fn once_mode_stops_on_last_frame() {
    let config = SessionConfig {
        loop_mode: LoopMode::Once,
        ..SessionConfig::default()
    };
    let (mut s, clock) = session_with(config);
    s.seek(235);
    s.play();
    s.tick();
    clock.advance_ms(1000);
    s.tick();
    assert_eq!(s.current_frame(), 240);
    assert!(!s.is_playing());
}

#[test]
fn loop_mode_wraps_and_steps() {
    let (mut s, clock) = session();
    s.seek(239);
    s.play();
    s.tick();
    clock.advance_ms(125);
    s.tick();
    assert_eq!(s.current_frame(), 2);

    s.step_frame(-2);
    assert!(!s.is_playing());
    assert_eq!(s.current_frame(), 240);
}

#[test]
fn extreme_speeds_keep_the_playhead_in_range() {
    for speed in [1e18, f64::MAX] {
        let (mut s, clock) = session();
        s.set_playback_speed(speed).unwrap();
        s.play();
        s.tick();
        clock.advance_ms(1000);
        s.tick();
        assert!((1..=240).contains(&s.current_frame()), "speed {speed}");
        clock.advance_ms(4);
        s.tick();
        assert!((1..=240).contains(&s.current_frame()), "speed {speed}");
    }
}

#[test]
fn extreme_speed_in_once_mode_stops_on_last_frame() {
    let config = SessionConfig {
        loop_mode: LoopMode::Once,
        ..SessionConfig::default()
    };
    let (mut s, clock) = session_with(config);
    s.set_playback_speed(f64::MAX).unwrap();
    s.play();
    s.tick();
    clock.advance_ms(1000);
    s.tick();
    assert_eq!(s.current_frame(), 240);
    assert!(!s.is_playing());
}

#[test]
fn extreme_frame_steps_stay_in_range() {
    let (mut s, _clock) = session();
    s.step_frame(i64::MAX);
    assert!((1..=240).contains(&s.current_frame()));
    s.step_frame(i64::MIN);
    assert!((1..=240).contains(&s.current_frame()));

    s.handle(SessionEvent::StepFrame { delta: i64::MAX }).unwrap();
    assert!((1..=240).contains(&s.current_frame()));
}
