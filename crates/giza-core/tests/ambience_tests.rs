// Host-side tests for gust timing, ambience targets and buffer synthesis.

use giza_core::ambience::{
    noise_samples, reverb_impulse, AmbienceEngine, AmbienceParams, GustMachine, GustParams,
    GustPhase, NoiseColor, PlaybackGate, StopAction,
};
use giza_core::breath::{breath_phase, LONG_EXHALE};
use giza_core::error::ConfigError;
use rand::prelude::*;

/// Every distinct gust the machine produces while scanning `[0, until)`.
fn scan_gusts(machine: &mut GustMachine, until: f64, step: f64) -> Vec<(f64, f64)> {
    let mut gusts: Vec<(f64, f64)> = Vec::new();
    let mut t = 0.0;
    while t < until {
        machine.update(t);
        if let GustPhase::Gusting { start, duration } = machine.phase() {
            if gusts.last() != Some(&(start, duration)) {
                gusts.push((start, duration));
            }
        }
        t += step;
    }
    gusts
}

#[test]
fn machine_starts_calm() {
    let mut m = GustMachine::new(GustParams::default(), 1, 0.0).unwrap();
    let s = m.update(0.0);
    assert!(!s.is_gusting);
    assert_eq!(s.strength, 0.0);
    match m.phase() {
        GustPhase::Calm { next_start } => assert!((20.0..60.0).contains(&next_start)),
        other => panic!("expected calm, got {other:?}"),
    }
}

#[test]
fn gust_timing_stays_in_range() {
    let mut m = GustMachine::new(GustParams::default(), 99, 0.0).unwrap();
    let gusts = scan_gusts(&mut m, 3_000.0, 0.05);
    assert!(gusts.len() >= 20, "only {} gusts", gusts.len());
    assert!((20.0..60.0).contains(&gusts[0].0));
    for pair in gusts.windows(2) {
        let (start, duration) = pair[0];
        assert!((4.0..8.0).contains(&duration), "duration {duration}");
        let gap = pair[1].0 - (start + duration);
        assert!((20.0..60.0).contains(&gap), "calm gap {gap}");
    }
}

#[test]
fn envelope_is_sine_squared() {
    let mut m = GustMachine::new(GustParams::default(), 5, 0.0).unwrap();
    let mut peak: f64 = 0.0;
    let mut t = 0.0;
    while t < 600.0 {
        let s = m.update(t);
        assert!((0.0..=1.0).contains(&s.strength));
        if !s.is_gusting {
            assert_eq!(s.strength, 0.0);
        }
        if let GustPhase::Gusting { start, duration } = m.phase() {
            let u = (t - start) / duration;
            let expected = (std::f64::consts::PI * u).sin().powi(2);
            assert!((s.strength - expected).abs() < 1e-12);
        }
        peak = peak.max(s.strength);
        t += 0.05;
    }
    assert!(peak > 0.99);
}

#[test]
fn same_seed_same_schedule() {
    let mut a = GustMachine::new(GustParams::default(), 1234, 0.0).unwrap();
    let mut b = GustMachine::new(GustParams::default(), 1234, 0.0).unwrap();
    assert_eq!(scan_gusts(&mut a, 1_000.0, 0.1), scan_gusts(&mut b, 1_000.0, 0.1));
}

#[test]
fn long_pause_catches_up() {
    let mut m = GustMachine::new(GustParams::default(), 8, 0.0).unwrap();
    let t = 10_000.0;
    m.update(t);
    match m.phase() {
        GustPhase::Calm { next_start } => assert!(next_start > t),
        GustPhase::Gusting { start, duration } => assert!(start <= t && t < start + duration),
    }
}

#[test]
fn schedule_is_anchored_to_start_time() {
    let mut m = GustMachine::new(GustParams::default(), 3, 500.0).unwrap();
    match m.phase() {
        GustPhase::Calm { next_start } => assert!((520.0..560.0).contains(&next_start)),
        other => panic!("expected calm, got {other:?}"),
    }
    assert!(!m.update(505.0).is_gusting);
}

#[test]
fn inverted_ranges_are_rejected() {
    let bad = GustParams {
        interval_min: 70.0,
        ..GustParams::default()
    };
    assert!(matches!(
        GustMachine::new(bad, 0, 0.0),
        Err(ConfigError::InvertedRange { .. })
    ));
    let bad = GustParams {
        duration_min: 0.0,
        ..GustParams::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn targets_follow_breath_and_stay_in_range() {
    let mut engine =
        AmbienceEngine::new(AmbienceParams::default(), LONG_EXHALE, 77, 0.0).unwrap();
    let mut t = 0.0;
    while t < 400.0 {
        let x = engine.targets(t);
        assert_eq!(x.breath, breath_phase(t));
        assert!((x.rumble_gain - (0.1 + 0.1 * x.breath)).abs() < 1e-12);

        for gain in [x.rumble_gain, x.wind_gain, x.whistle_gain, x.sand_gain] {
            assert!(gain >= 0.0);
        }
        assert!(x.wind_gain <= 0.1 + 0.1 + 0.25 + 1e-12);
        assert!(x.whistle_gain <= 0.15 * 2.0 + 1e-12);
        assert!(x.sand_gain <= (3.0 - 1.2) * 0.08 + 0.005);
        assert!((150.0..=700.0).contains(&x.wind_cutoff_hz));
        assert!((300.0..=1300.0).contains(&x.whistle_center_hz));
        for pan in [x.wind_pan, x.whistle_pan, x.sand_pan] {
            assert!((-1.0..=1.0).contains(&pan));
        }
        if !x.gust.is_gusting {
            assert!(x.wind_gain <= 0.2 + 1e-12);
        }
        t += 0.1;
    }
}

#[test]
fn gusts_lift_wind_and_whistle() {
    let mut engine =
        AmbienceEngine::new(AmbienceParams::default(), LONG_EXHALE, 21, 0.0).unwrap();
    let mut t = 0.0;
    let mut lifted = false;
    while t < 300.0 {
        let x = engine.targets(t);
        if x.gust.strength > 0.9 {
            let calm_cutoff = 300.0 + (t * 0.1).sin() * 100.0 + (t * 0.05).sin() * 50.0;
            assert!(x.wind_cutoff_hz > calm_cutoff + 200.0);
            lifted = true;
        }
        t += 0.05;
    }
    assert!(lifted, "no strong gust within five minutes");
}

#[test]
fn noise_buffers_have_expected_shape() {
    let mut rng = StdRng::seed_from_u64(4);
    let white = noise_samples(NoiseColor::White, 4_096, &mut rng);
    let brown = noise_samples(NoiseColor::Brown, 4_096, &mut rng);
    assert_eq!(white.len(), 4_096);
    assert_eq!(brown.len(), 4_096);
    assert!(white.iter().all(|s| (-1.0..1.0).contains(s)));
    assert!(brown.iter().all(|s| s.abs() <= 3.5 + 1e-3));

    let roughness = |v: &[f32]| {
        v.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f32>() / (v.len() - 1) as f32
    };
    assert!(roughness(&brown[..]) < roughness(&white[..]) * 0.2);
}

#[test]
fn reverb_impulse_decays_to_silence() {
    let mut rng = StdRng::seed_from_u64(6);
    let [left, right] = reverb_impulse(48_000.0, &mut rng);
    assert_eq!(left.len(), 120_000);
    assert_eq!(right.len(), 120_000);
    assert_ne!(left, right);

    let energy = |s: &[f32]| s.iter().map(|x| x * x).sum::<f32>();
    let head = energy(&left[..12_000]);
    let tail = energy(&left[108_000..]);
    assert!(tail < head * 0.01);
    assert!(left.iter().all(|s| s.abs() <= 1.0));
}

#[test]
fn stop_before_the_context_runs_mutes_and_still_suspends() {
    let mut gate = PlaybackGate::default();
    gate.start();
    // resume still pending: the graph must go silent, not wait for a fade
    let (action, stopped_at) = gate.stop(false).expect("stop while playing");
    assert_eq!(action, StopAction::Mute);
    assert!(!gate.is_playing());
    assert!(gate.suspend_allowed(stopped_at));
}

#[test]
fn stop_on_a_running_context_fades_out() {
    let mut gate = PlaybackGate::default();
    gate.start();
    let (action, stopped_at) = gate.stop(true).expect("stop while playing");
    assert_eq!(action, StopAction::FadeOut);
    assert!(gate.suspend_allowed(stopped_at));
    assert_eq!(gate.stop(true), None);
}

#[test]
fn restart_cancels_a_pending_suspend() {
    let mut gate = PlaybackGate::default();
    gate.start();
    let (_, stopped_at) = gate.stop(false).expect("stop while playing");
    gate.start();
    assert!(gate.is_playing());
    assert!(!gate.suspend_allowed(stopped_at));

    // and the next stop arms its own suspend
    let (_, again) = gate.stop(true).expect("second stop");
    assert_ne!(again, stopped_at);
    assert!(gate.suspend_allowed(again));
    assert!(!gate.suspend_allowed(stopped_at));
}

#[test]
fn close_disarms_every_pending_suspend() {
    let mut gate = PlaybackGate::default();
    gate.start();
    let (_, stopped_at) = gate.stop(true).expect("stop while playing");
    gate.close();
    assert!(!gate.is_playing());
    assert!(!gate.suspend_allowed(stopped_at));
}
