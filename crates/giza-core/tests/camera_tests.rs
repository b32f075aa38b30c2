// Host-side tests for camera pose, projection and body sway.

use giza_core::breath::LONG_EXHALE;
use giza_core::camera::{CameraPose, Lens, SwayParams};
use giza_core::constants::START_YAW;
use glam::{Quat, Vec3, Vec4};

#[test]
fn yaw_zero_looks_down_negative_z() {
    let pose = CameraPose::from_yaw_pitch_roll(Vec3::ZERO, 0.0, 0.0, 0.0);
    assert!(pose.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    assert!(pose.up().abs_diff_eq(Vec3::Y, 1e-6));
}

#[test]
fn view_direction_matches_steering_direction() {
    let pose = CameraPose::from_yaw_pitch_roll(Vec3::ZERO, START_YAW, 0.0, 0.0);
    let steer = Quat::from_rotation_y(START_YAW) * Vec3::NEG_Z;
    assert!(pose.forward().abs_diff_eq(steer, 1e-6));
    // the start yaw faces the origin from (+x, +z)
    assert!(steer.x < 0.0 && steer.z < 0.0);
}

#[test]
fn positive_pitch_looks_up() {
    let pose = CameraPose::from_yaw_pitch_roll(Vec3::ZERO, 0.3, 0.5, 0.0);
    assert!(pose.forward().y > 0.4);
}

#[test]
fn pose_array_layout() {
    let pose = CameraPose::from_yaw_pitch_roll(Vec3::new(1.0, 2.0, 3.0), 0.0, 0.0, 0.0);
    assert_eq!(pose.to_array(), [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn point_ahead_projects_to_screen_centre() {
    let pose = CameraPose::from_yaw_pitch_roll(Vec3::new(20.0, 4.0, 20.0), START_YAW, 0.0, 0.0);
    let target = pose.position + pose.forward() * 10.0;
    let clip = Lens::default().view_projection(&pose) * Vec4::from((target, 1.0));
    assert!(clip.w > 0.0);
    assert!((clip.x / clip.w).abs() < 1e-4);
    assert!((clip.y / clip.w).abs() < 1e-4);
}

#[test]
fn head_bob_needs_speed() {
    let sway = SwayParams::default();
    for i in 0..50 {
        let t = i as f64 * 0.11;
        assert_eq!(sway.head_bob(t, 0.0, 9.0, false), 0.0);
    }
    let moving = (0..50).any(|i| sway.head_bob(i as f64 * 0.11, 9.0, 9.0, true).abs() > 0.05);
    assert!(moving);
}

#[test]
fn sway_stays_subtle() {
    let sway = SwayParams::default();
    for i in 0..2_000 {
        let t = i as f64 * 0.05;
        let s = sway.sway(&LONG_EXHALE, t, 9.0, 9.0, true);
        assert!((s.vertical as f64).abs() <= sway.max_vertical() + 1e-6);
        assert!(s.pitch.abs() <= 0.001 + 1e-7);
        assert!(s.roll.abs() <= 0.0022 + 1e-7);
    }
}

#[test]
fn breath_lifts_the_eye_at_full_lungs() {
    let sway = SwayParams::default();
    // t = 5 is mid-hold; amplitude is 0.05 + sin(0.25)·0.02
    let expected = 0.05 + (5.0f64 * 0.05).sin() * 0.02;
    assert!((sway.breath_offset(&LONG_EXHALE, 5.0) - expected).abs() < 1e-12);
    assert_eq!(sway.breath_offset(&LONG_EXHALE, 0.0), 0.0);
}
