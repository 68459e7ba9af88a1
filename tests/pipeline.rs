//! Pipeline Tests - Does the full forward pass hold its properties?
//!
//! Everything here drives the public API only.

use manifold::{
    BranchConfig, BranchEvaluator, DualChannel, DualityConfig, Engine, EngineConfig, HealthModel,
    PhaseLock, StateVector,
};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// P1: A fresh lattice inside a fresh engine carries 27 nodes and the
/// center node has the full six-neighbor complement
#[test]
fn pipeline_lattice_construction_invariants() {
    let engine = Engine::builder(EngineConfig::with_dim(4))
        .with_defaults()
        .build()
        .unwrap();

    let lattice = engine.lattice();
    assert_eq!(lattice.nodes().len(), 27);

    let center = manifold::lattice::node_index(1, 1, 1);
    assert_eq!(lattice.node(center).position(), (1, 1, 1));
    assert_eq!(lattice.neighbor_indices(center).len(), 6);

    // Corners have exactly 3
    let corner = manifold::lattice::node_index(0, 0, 0);
    assert_eq!(lattice.neighbor_indices(corner).len(), 3);
}

/// P2: Injecting [1,0,0,0] at D=4 leaves the center node clearly above
/// every peripheral node in component 0 (the 10x injection asymmetry)
#[test]
fn pipeline_center_injection_asymmetry() {
    let mut config = EngineConfig::with_dim(4);
    config.lattice.init_spread = 0.0; // deterministic start
    let mut engine = Engine::builder(config).with_defaults().build().unwrap();

    let input = StateVector::new(vec![1.0, 0.0, 0.0, 0.0]);
    let previous = StateVector::zeros(4);
    engine.step(&input, &previous).unwrap();

    let lattice = engine.lattice();
    let center = manifold::lattice::node_index(1, 1, 1);
    let center_value = lattice.node(center).state().values()[0];
    for idx in (0..27).filter(|&i| i != center) {
        let peripheral = lattice.node(idx).state().values()[0];
        assert!(
            center_value - peripheral > 0.1,
            "Center ({}) should exceed node {} ({}) by more than the ambient gain",
            center_value,
            idx,
            peripheral
        );
    }
}

/// P3: 100 steps of zero input never blow up the combined state
#[test]
fn pipeline_zero_input_stays_bounded() {
    let mut engine = Engine::builder(EngineConfig::with_dim(8))
        .with_defaults()
        .seed(21)
        .build()
        .unwrap();

    let zero = StateVector::zeros(8);
    let mut state = StateVector::zeros(8);
    for step in 0..100 {
        state = engine.step(&zero, &state).unwrap().state;
        assert!(
            state.max_abs() < 10.0,
            "State magnitude exploded at step {}: {}",
            step,
            state.max_abs()
        );
    }
}

/// P4: The pressure readout stays inside [0.1, 0.3] for the first 50
/// steps and eventually crosses the torsion threshold
#[test]
fn pipeline_pressure_band_then_threshold_crossing() {
    let mut engine = Engine::builder(EngineConfig::with_dim(2))
        .with_defaults()
        .build()
        .unwrap();

    let input = StateVector::zeros(2);
    let mut state = StateVector::zeros(2);
    for step in 0..50 {
        state = engine.step(&input, &state).unwrap().state;
        let p = engine.pressure();
        assert!(
            (0.1..=0.3).contains(&p),
            "Pressure left the band at step {}: {}",
            step,
            p
        );
    }

    let psi_critical = engine.config().branch.psi_critical;
    for _ in 0..50 {
        state = engine.step(&input, &state).unwrap().state;
    }
    assert!(
        engine.pressure() > psi_critical,
        "Pressure should cross the torsion threshold within 100 steps, got {}",
        engine.pressure()
    );
}

/// P5: The dual-channel transform preserves dimensionality across sizes
#[test]
fn pipeline_duality_dimension_preservation() {
    for dim in [1usize, 8, 64] {
        let mut rng = StdRng::seed_from_u64(17);
        let channel = DualChannel::new(dim, DualityConfig::default(), &mut rng);
        let out = channel
            .process(&StateVector::new(vec![0.1; dim]), &mut rng)
            .unwrap();
        assert_eq!(out.len(), dim);
    }
}

/// P6: Below the torsion threshold, the zero-variance branch is the
/// combined state bit for bit
#[test]
fn pipeline_passive_flow_is_bit_exact() {
    struct MiddlePreference;
    impl HealthModel for MiddlePreference {
        fn health(&self, _sigma: f64, rho: f64, _reliability: f64) -> f64 {
            1.0 - (rho - 0.9).abs()
        }
        fn score(&self, health: f64) -> f64 {
            health
        }
    }

    let evaluator = BranchEvaluator::new(BranchConfig::default(), Box::new(MiddlePreference));
    let combined = StateVector::new(vec![0.25, -1.5, 3.75]);
    let input = StateVector::new(vec![0.9, 0.0, 0.0]);

    let winner = evaluator.evaluate(&combined, &input, 0.12, 0.9);
    assert_eq!(winner.index, 1);
    assert_eq!(winner.state, combined);
}

/// P7: Telemetry accrues one record per step, and the summary and JSON
/// export agree with the run
#[test]
fn pipeline_telemetry_accrues_and_exports() {
    let mut engine = Engine::builder(EngineConfig::with_dim(4))
        .with_defaults()
        .seed(5)
        .build()
        .unwrap();

    let input = StateVector::new(vec![0.5, 0.0, 0.0, 0.0]);
    let mut state = StateVector::zeros(4);
    for _ in 0..20 {
        state = engine.step(&input, &state).unwrap().state;
    }

    let log = engine.telemetry();
    assert_eq!(log.len(), 20);

    let summary = log.summary();
    assert_eq!(summary.samples, 20);
    assert!((0.0..=1.0).contains(&summary.mean_health));
    assert_eq!(summary.branch_wins.iter().sum::<usize>(), 20);

    let json = log.to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 20);
}

/// P8: A custom health model wired through the builder decides every
/// arbitration: a flat field always keeps branch 0
#[test]
fn pipeline_injected_model_controls_selection() {
    struct Flat;
    impl HealthModel for Flat {
        fn health(&self, _sigma: f64, _rho: f64, _reliability: f64) -> f64 {
            0.5
        }
        fn score(&self, _health: f64) -> f64 {
            0.5
        }
    }

    let mut engine = Engine::builder(EngineConfig::with_dim(4))
        .health_model(Box::new(Flat))
        .compressor(Box::new(manifold::MeanFieldCompressor))
        .build()
        .unwrap();

    let input = StateVector::new(vec![0.3, 0.0, 0.0, 0.0]);
    let mut state = StateVector::zeros(4);
    for _ in 0..5 {
        let outcome = engine.step(&input, &state).unwrap();
        assert_eq!(
            outcome.metrics.branch_index, 0,
            "Equal scores must keep the earliest branch"
        );
        state = outcome.state;
    }
}

/// P9: A phase-locked scalar stream drives the engine end to end
#[test]
fn pipeline_phase_locked_stream() {
    let mut engine = Engine::builder(EngineConfig::with_dim(8))
        .with_defaults()
        .seed(31)
        .build()
        .unwrap();
    let mut lock = PhaseLock::new();

    let mut state = StateVector::zeros(8);
    for sample in 0..30 {
        let raw = (sample as f64 * 0.25).cos();
        let stimulus = lock.sync(raw, 8);
        let outcome = engine.step(&stimulus, &state).unwrap();
        assert!(
            outcome.state.values().iter().all(|v| v.is_finite()),
            "Non-finite state at sample {}",
            sample
        );
        state = outcome.state;
    }
    assert_eq!(engine.steps(), 30);
}

/// P10: One lattice sweep with a zeroed start keeps the grid-coherence
/// metadata untouched through the whole pipeline
#[test]
fn pipeline_metrics_carry_grid_coherence() {
    let mut config = EngineConfig::with_dim(4);
    config.lattice.init_spread = 0.0;
    let mut engine = Engine::builder(config).with_defaults().build().unwrap();

    let outcome = engine
        .step(&StateVector::zeros(4), &StateVector::zeros(4))
        .unwrap();
    assert_eq!(
        outcome.metrics.lattice_coherence, 1.0,
        "Fresh nodes carry full coherence and diffusion never rewrites it"
    );
}
