use approx::assert_relative_eq;
use eds_maglev::prelude::*;

/// Reference scenario: four 1.5 m train coils at 7e5 A passing at 160 m/s.
fn reference_params() -> SimulationParameters {
    SimulationParameters::builder()
        .train_radius(1.5)
        .guideway_radius(1.0)
        .lateral_spacing(1.2)
        .train_current(7.0e5)
        .resistance(10.0)
        .speed(160.0)
        .duration(0.5)
        .time_step(1.0e-3)
        .build()
        .expect("reference parameters are valid")
}

fn run(params: SimulationParameters) -> SimulationResult {
    EdsPipeline::new(params).run()
}

// ==================================================================================
// Grid invariants
// ==================================================================================

#[test]
fn every_series_shares_the_grid() {
    for (duration, dt) in [(0.5, 1.0e-3), (0.02, 1.0e-3), (0.3, 0.1), (0.0105, 1.0e-3)] {
        let params = SimulationParameters::builder()
            .duration(duration)
            .time_step(dt)
            .build()
            .expect("valid");
        let expected = (duration / dt + 1.0e-9).floor() as usize;
        let result = run(params);
        assert_eq!(result.grid.len(), expected);
        for series in [&result.flux, &result.emf, &result.current, &result.energy, &result.lateral_force] {
            assert_eq!(series.len(), expected);
            assert!(series.is_finite());
        }
        for (i, t) in result.grid.times().iter().enumerate() {
            assert_relative_eq!(*t, i as f64 * dt, epsilon = 1.0e-15);
        }
    }
}

// ==================================================================================
// End-to-end reference scenario
// ==================================================================================

#[test]
fn reference_scenario_peak_follows_coil_crossing() {
    let params = reference_params();
    let result = run(params.clone());
    assert_eq!(result.current.len(), 500);

    let (peak, value) = result.current.peak_abs().expect("non-empty");
    assert_eq!(peak, 11);
    assert_relative_eq!(value, -443.969_106_427_010_7, max_relative = 1.0e-6);

    // The peak lands on the first train coil crossing the far guideway station.
    let geometry = GeometryModel::new(&params);
    let t = result.grid.times()[peak];
    let travel_per_step = params.speed() * params.time_step();
    let (closest_coil, closest) = geometry
        .train_coils_at(t, 0.0)
        .iter()
        .flat_map(|coil| {
            geometry
                .guideway_loops()
                .map(|l| (coil.index, (coil.position.x - l.position.x).abs()))
        })
        .fold((0, f64::INFINITY), |best, c| if c.1 < best.1 { c } else { best });
    assert_eq!(closest_coil, 1);
    assert!(closest <= 2.0 * travel_per_step, "closest approach {closest} m at peak");

    let bound = result.energy.peak_abs().expect("non-empty").1.abs();
    assert!(result.energy.is_finite());
    assert!(bound < 1.0e5, "energy peak {bound} J");
}

#[test]
fn current_decays_once_the_train_has_passed() {
    let result = run(reference_params());
    let tail = result.current.values()[400..].iter().fold(0.0_f64, |m, i| m.max(i.abs()));
    assert!(tail < 1.0e-3, "tail current {tail} A");
}

// ==================================================================================
// Circuit properties
// ==================================================================================

#[test]
fn stationary_train_induces_no_current() {
    let params = reference_params().to_builder().speed(0.0).build().expect("valid");
    let result = run(params);
    let first = result.flux[0];
    assert!(result.flux.iter().all(|&f| f == first));
    assert!(result.current.iter().all(|&i| i == 0.0));
    assert!(result.energy.iter().all(|&u| u == 0.0));
}

#[test]
fn doubling_resistance_halves_current_exactly() {
    let base = run(reference_params());
    let doubled = run(reference_params().to_builder().resistance(20.0).build().expect("valid"));
    for (a, b) in base.current.iter().zip(&doubled.current) {
        assert_eq!(*b, *a / 2.0);
    }
    assert_eq!(base.emf, doubled.emf);
}

#[test]
fn emf_is_negative_flux_derivative() {
    let result = run(reference_params());
    let dt = result.grid.time_step();
    let f = result.flux.values();
    let n = f.len();
    assert_relative_eq!(result.emf[0], -(f[1] - f[0]) / dt, max_relative = 1.0e-12);
    assert_relative_eq!(result.emf[5], -(f[6] - f[4]) / (2.0 * dt), max_relative = 1.0e-12);
    assert_relative_eq!(result.emf[n - 1], -(f[n - 1] - f[n - 2]) / dt, max_relative = 1.0e-12, epsilon = 1.0e-12);
}

// ==================================================================================
// Winding
// ==================================================================================

#[test]
fn differential_winding_cancels_common_mode() {
    let differential = run(reference_params());
    let common = run(reference_params().to_builder().winding(WindingMode::Common).build().expect("valid"));
    assert_relative_eq!(differential.flux[0], -3.219_868_426_113_5, max_relative = 1.0e-9);
    assert_relative_eq!(common.flux[0], -2.606_333_715_931_137_7, max_relative = 1.0e-9);
    assert_relative_eq!(common.flux[11], -8.568_343_496_457_492, max_relative = 1.0e-9);
}

#[test]
fn centred_train_sees_no_common_flux_at_guideway_height() {
    let params = reference_params()
        .to_builder()
        .train_height(0.0)
        .duration(0.02)
        .build()
        .expect("valid");
    let result = run(params);
    assert!(result.flux.iter().all(|f| f.abs() < 1.0e-12));
}

// ==================================================================================
// Configuration errors
// ==================================================================================

#[test]
fn invalid_configuration_aborts_before_running() {
    let cases = [
        SimulationParameters::builder().resistance(0.0),
        SimulationParameters::builder().time_step(0.0),
        SimulationParameters::builder().duration(-1.0),
        SimulationParameters::builder().train_radius(f64::NAN),
        SimulationParameters::builder().duration(1.0e-3).time_step(1.0e-3),
    ];
    for builder in cases {
        let err = builder.build().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)), "{err}");
        let top: EdsError = err.into();
        assert!(top.to_string().starts_with("configuration error"));
    }
}
