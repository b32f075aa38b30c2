// Host-side tests for constants and their relationships.

use giza_core::constants::*;
use giza_core::terrain::TerrainHeightField;

#[test]
#[allow(clippy::assertions_on_constants)]
fn movement_constants_are_sane() {
    assert!(RUN_SPEED > WALK_SPEED);
    assert!(WALK_SPEED > 0.0);
    assert!(GRAVITY > 0.0 && JUMP_IMPULSE > 0.0);
    assert!(DAMPING > 0.0);
    assert!(PITCH_LIMIT < std::f32::consts::FRAC_PI_2);
    assert!(ROTATION_SMOOTHING > 0.0 && ROTATION_SMOOTHING <= 1.0);
    assert!(JOYSTICK_DEADZONE < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn timing_constants_are_ordered() {
    assert_eq!(
        BREATH_INHALE_SEC + BREATH_HOLD_SEC + BREATH_EXHALE_SEC + BREATH_PAUSE_SEC,
        12.0
    );
    assert!(GUST_INTERVAL_MIN_SEC < GUST_INTERVAL_MAX_SEC);
    assert!(GUST_DURATION_MIN_SEC < GUST_DURATION_MAX_SEC);
    // a gust always ends before the next can be scheduled
    assert!(GUST_DURATION_MAX_SEC < GUST_INTERVAL_MIN_SEC);
}

#[test]
fn pyramids_do_not_overlap() {
    for (i, a) in PYRAMID_OBSTACLES.iter().enumerate() {
        for b in &PYRAMID_OBSTACLES[i + 1..] {
            let d = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
            assert!(d > a[2] + b[2], "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn spawn_point_is_clear_and_airborne() {
    let [x, y, z] = START_POSITION;
    for [cx, cz, r] in PYRAMID_OBSTACLES {
        assert!(((x - cx).powi(2) + (z - cz).powi(2)).sqrt() > r);
    }
    let ground = TerrainHeightField::default().height_f32(x, z) + PLAYER_HEIGHT;
    assert!(y > ground);
    assert_eq!(start_position_vec3(), glam::Vec3::new(x, y, z));
}

#[test]
fn terrain_fits_inside_its_plane() {
    assert!(TERRAIN_SIZE > 0.0);
    assert!(TERRAIN_SEGMENTS >= 64);
    // the spawn and every pyramid sit well inside the mesh
    let half = TERRAIN_SIZE * 0.5;
    assert!(START_POSITION[0].abs() < half && START_POSITION[2].abs() < half);
}
