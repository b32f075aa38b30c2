// Host-side tests for the breathing oracle.

use giza_core::breath::{breath_phase, BreathPattern, BreathStage, BOX_BREATH, LONG_EXHALE};

fn samples(from: f64, to: f64, step: f64) -> impl Iterator<Item = f64> {
    let n = ((to - from) / step) as usize;
    (0..n).map(move |i| from + i as f64 * step)
}

#[test]
fn default_cycle_is_twelve_seconds() {
    assert_eq!(LONG_EXHALE.period(), 12.0);
    assert_eq!(BOX_BREATH.period(), 12.0);
    assert_eq!(BreathPattern::default(), LONG_EXHALE);
}

#[test]
fn phase_is_periodic() {
    for t in samples(-30.0, 300.0, 0.37) {
        let a = breath_phase(t);
        let b = breath_phase(t + 12.0);
        assert!((a - b).abs() < 1e-9, "t={t}: {a} vs {b}");
    }
}

#[test]
fn phase_stays_in_unit_interval() {
    for t in samples(0.0, 48.0, 0.01) {
        let p = breath_phase(t);
        assert!((0.0..=1.0).contains(&p), "t={t}: {p}");
    }
}

#[test]
fn inhale_rises_and_exhale_falls() {
    let step = 0.005;
    let mut prev = breath_phase(0.0);
    for t in samples(step, 4.0, step) {
        let p = breath_phase(t);
        assert!(p >= prev, "inhale dipped at t={t}");
        prev = p;
    }
    for t in samples(4.0, 6.0, step) {
        assert_eq!(breath_phase(t), 1.0, "hold not flat at t={t}");
    }
    let mut prev = breath_phase(6.0);
    for t in samples(6.0 + step, 12.0, step) {
        let p = breath_phase(t);
        assert!(p <= prev, "exhale rose at t={t}");
        prev = p;
    }
}

#[test]
fn phase_is_continuous_at_stage_boundaries() {
    for pattern in [LONG_EXHALE, BOX_BREATH] {
        let bounds = [
            pattern.period(),
            pattern.inhale,
            pattern.inhale + pattern.hold,
            pattern.inhale + pattern.hold + pattern.exhale,
        ];
        for b in bounds {
            let before = pattern.phase(b - 1e-7);
            let after = pattern.phase(b + 1e-7);
            assert!((before - after).abs() < 1e-4, "{pattern:?} jumps at {b}");
        }
    }
}

#[test]
fn box_breath_rests_empty() {
    assert_eq!(BOX_BREATH.stage_at(11.0).0, BreathStage::Pause);
    assert_eq!(BOX_BREATH.phase(11.0), 0.0);
    assert_eq!(BOX_BREATH.phase(5.0), 1.0);
}

#[test]
fn stage_lookup_reports_progress() {
    assert_eq!(LONG_EXHALE.stage_at(2.0), (BreathStage::Inhale, 0.5));
    assert_eq!(LONG_EXHALE.stage_at(5.0), (BreathStage::Hold, 0.5));
    assert_eq!(LONG_EXHALE.stage_at(9.0), (BreathStage::Exhale, 0.5));
    // negative time wraps into the previous cycle
    assert_eq!(LONG_EXHALE.stage_at(-3.0), (BreathStage::Exhale, 0.5));
    assert_eq!(LONG_EXHALE.cycle_time(25.0), 1.0);
}

#[test]
fn peak_and_trough_values() {
    assert_eq!(breath_phase(0.0), 0.0);
    assert!((breath_phase(4.0) - 1.0).abs() < 1e-12);
    assert!((breath_phase(2.0) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
}

#[test]
fn malformed_patterns_are_rejected() {
    assert!(BreathPattern::new(0.0, 2.0, 6.0, 0.0).is_err());
    assert!(BreathPattern::new(4.0, 2.0, 0.0, 0.0).is_err());
    assert!(BreathPattern::new(4.0, -1.0, 6.0, 0.0).is_err());
    assert!(BreathPattern::new(4.0, f64::NAN, 6.0, 0.0).is_err());
    assert!(BreathPattern::new(3.0, 0.0, 3.0, 0.0).is_ok());
}
