//! Exposure through the session and the pixel pipeline.

use std::sync::Arc;

use openrv_color::{apply_exposure, ColorOp, ColorPipeline, ColorState, TransferFunction};
use openrv_core::SessionConfig;
use openrv_session::{ManualClock, Session};
use proptest::prelude::*;

use crate::fixtures::{media, session, settle};

proptest! {
    #[test]
    fn reset_restores_default_exposure(values in prop::collection::vec(-20.0f32..20.0, 1..12)) {
        let (mut s, clock) = session();
        for v in &values {
            s.set_exposure(*v).unwrap();
            clock.advance_ms(30);
        }
        s.reset_color();
        prop_assert_eq!(s.exposure(), 0.0);
        prop_assert_eq!(s.color_state().exposure, 0.0);

        // Reset is undoable back to the last value set.
        s.undo();
        prop_assert_eq!(s.exposure(), *values.last().unwrap());
    }

    #[test]
    fn displayed_value_stays_in_range(value in 0.0f32..4.0, exposure in -10.0f32..10.0) {
        let shown = apply_exposure(value, exposure, 1.0);
        prop_assert!((0.0..=1.0).contains(&shown));
    }
}

#[test]
fn session_pipeline_tracks_exposure() {
    let (mut s, clock) = session();
    assert_eq!(s.color_pipeline().process_pixel([0.25, 0.5, 2.0]), [0.25, 0.5, 1.0]);

    s.set_exposure(1.0).unwrap();
    settle(&mut s, &clock);
    let [r, g, b] = s.color_pipeline().process_pixel([0.25, 0.1, 0.75]);
    assert!((r - 0.5).abs() < 1e-6);
    assert!((g - 0.2).abs() < 1e-6);
    assert_eq!(b, 1.0);
}

#[test]
fn srgb_round_trip_at_default_exposure() {
    let mut pipe = ColorPipeline::new(TransferFunction::Srgb, TransferFunction::Srgb);
    pipe.build_ops(&ColorState::default());
    let out = pipe.process_pixel([0.2, 0.5, 0.8]);
    for (a, b) in out.iter().zip([0.2, 0.5, 0.8]) {
        assert!((a - b).abs() < 1e-5);
    }
}

#[test]
fn rgba8_alpha_untouched() {
    let (mut s, clock) = session();
    s.set_exposure(-1.0).unwrap();
    settle(&mut s, &clock);

    let mut pixels = [200u8, 100, 50, 77];
    s.color_pipeline().process_rgba8(&mut pixels);
    assert_eq!(pixels[3], 77);
    assert!(pixels[0] < 200);
}

fn srgb_display_session(source: TransferFunction) -> (Session, ManualClock) {
    let clock = ManualClock::new();
    let config = SessionConfig {
        display_transfer: TransferFunction::Srgb,
        ..SessionConfig::default()
    };
    let s = Session::with_clock(
        media(240).with_transfer(source),
        config,
        Arc::new(clock.clone()),
    );
    (s, clock)
}

#[test]
fn srgb_media_gain_applies_in_linear_light() {
    let (mut s, clock) = srgb_display_session(TransferFunction::Srgb);
    let pixel = [0.2, 0.5, 0.8];
    assert_eq!(s.color_pipeline().process_pixel(pixel), pixel);

    s.set_exposure(1.0).unwrap();
    settle(&mut s, &clock);
    let pipe = s.color_pipeline();
    assert_eq!(pipe.ops.first(), Some(&ColorOp::TransferToLinear(TransferFunction::Srgb)));

    let srgb = TransferFunction::Srgb;
    let out = pipe.process_pixel(pixel);
    for (shown, v) in out.iter().zip(pixel) {
        let expected = srgb.from_linear((srgb.to_linear(v) * 2.0).min(1.0));
        assert!((shown - expected).abs() < 1e-5, "{v} -> {shown}, want {expected}");
    }
    // Brighter, but less than a plain 2x on the encoded value.
    assert!(out[0] > 0.2 && out[0] < 0.4);
}

#[test]
fn linear_media_is_encoded_for_an_srgb_display() {
    let (s, _clock) = srgb_display_session(TransferFunction::Linear);
    let [grey, _, _] = s.color_pipeline().process_pixel([0.18, 0.18, 0.18]);
    assert!((grey - 0.461).abs() < 0.01);
}

#[test]
fn loaded_media_encoding_drives_the_pipeline() {
    let (mut s, _clock) = session();
    s.load(media(24).with_transfer(TransferFunction::Rec709));
    let pipe = s.color_pipeline();
    assert_eq!(pipe.input_transfer, TransferFunction::Rec709);
    assert_eq!(pipe.output_transfer, TransferFunction::Linear);
    assert!(matches!(pipe.ops[0], ColorOp::TransferToLinear(TransferFunction::Rec709)));
}
