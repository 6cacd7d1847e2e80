//! Integration tests for the phase-lock simulator.

use resonance_core::tolerances::INTEGRATOR_EPS;
use resonance_phase::{
    order_parameter, wrap_phase, CouplingMatrix, CouplingSweep, OscillatorEnsemble,
    PhaseLockConfig, PhaseLockSimulator,
};

fn default_simulator() -> PhaseLockSimulator {
    PhaseLockSimulator::new(PhaseLockConfig::default()).unwrap()
}

// ========== Free Rotation Tests ==========

#[test]
fn test_uncoupled_oscillators_rotate_independently() {
    let phases = [0.0, 1.0, -2.0];
    let omegas = [1.0, 1.7, 2.9];
    let k = CouplingMatrix::uniform(3, 0.0).unwrap();
    let sim = default_simulator();
    let run = sim.simulate(&phases, &omegas, &k, 0.0).unwrap();

    let t = sim.config().duration;
    for i in 0..3 {
        let expected = wrap_phase(phases[i] + omegas[i] * t);
        let diff = wrap_phase(run.final_phases[i] - expected);
        assert!(diff.abs() < INTEGRATOR_EPS, "oscillator {i}: off by {diff}");
    }

    let half = run.samples.len() / 2;
    let late_mean =
        run.samples[half..].iter().map(|s| s.r).sum::<f64>() / (run.samples.len() - half) as f64;
    assert!(late_mean < 0.9, "uncoupled R trended to {late_mean}");
    println!("[VERIFIED] K=0 phases follow ω·t, late mean R = {late_mean:.3}");
}

#[test]
fn test_order_parameter_stays_in_unit_interval() {
    let ensemble = OscillatorEnsemble::random(50, 10.0, 2.0, 42).unwrap();
    let sim = default_simulator();
    for strength in [0.0, 0.5, 5.0, 50.0] {
        let k = CouplingMatrix::uniform(50, strength).unwrap();
        let run = sim
            .simulate(&ensemble.initial_phases, &ensemble.natural_frequencies, &k, 0.3)
            .unwrap();
        for s in &run.samples {
            assert!((0.0..=1.0).contains(&s.r), "K={strength} t={} R={}", s.time, s.r);
        }
        assert!(run
            .final_phases
            .iter()
            .all(|p| (-std::f64::consts::PI..std::f64::consts::PI).contains(p)));
    }
}

// ========== Synchronization Tests ==========

#[test]
fn test_strong_coupling_synchronizes() {
    let ensemble = OscillatorEnsemble::random(50, 10.0, 2.0, 42).unwrap();
    let k = CouplingMatrix::uniform(50, 10.0).unwrap();
    let run = default_simulator()
        .simulate(&ensemble.initial_phases, &ensemble.natural_frequencies, &k, 0.0)
        .unwrap();
    let r = run.steady_state_order_parameter(100);
    assert!(r > 0.85, "R_final = {r}");
    assert!(run.information_transfer.bits_per_second > 0.8 * 1000.0 * 10f64.log2());
}

#[test]
fn test_final_sample_matches_final_phases() {
    let ensemble = OscillatorEnsemble::random(8, 1.0, 0.5, 3).unwrap();
    let k = CouplingMatrix::uniform(8, 1.0).unwrap();
    let run = default_simulator()
        .simulate(&ensemble.initial_phases, &ensemble.natural_frequencies, &k, 0.0)
        .unwrap();
    let op = order_parameter(&run.final_phases).unwrap();
    assert!((op.r - run.final_order_parameter()).abs() < 1e-12);
}

#[test]
fn test_sweep_is_deterministic() {
    let config = PhaseLockConfig {
        duration: 10.0,
        ..Default::default()
    };
    let ensemble = OscillatorEnsemble::random(20, 10.0, 2.0, 5).unwrap();
    let sweep = CouplingSweep::new(
        PhaseLockSimulator::new(config).unwrap(),
        vec![0.1, 0.3, 0.5, 0.7, 0.9],
    );
    let a = sweep.run(&ensemble).unwrap();
    let b = sweep.run(&ensemble).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 5);
}

// ========== Validation Tests ==========

#[test]
fn test_empty_system_rejected() {
    let k = CouplingMatrix::uniform(0, 0.0).unwrap();
    let err = default_simulator().simulate(&[], &[], &k, 0.0).unwrap_err();
    assert_eq!(err.kind(), "invalid_parameter");
}

#[test]
fn test_dimension_mismatch_rejected() {
    let k = CouplingMatrix::uniform(2, 1.0).unwrap();
    let sim = default_simulator();
    assert_eq!(
        sim.simulate(&[0.0, 1.0, 2.0], &[1.0, 1.0, 1.0], &k, 0.0)
            .unwrap_err()
            .kind(),
        "invalid_parameter"
    );
    let k3 = CouplingMatrix::uniform(3, 1.0).unwrap();
    assert!(sim.simulate(&[0.0, 1.0, 2.0], &[1.0, 1.0], &k3, 0.0).is_err());
    assert!(sim.simulate(&[0.0, f64::NAN, 2.0], &[1.0; 3], &k3, 0.0).is_err());
}
