use assert_approx_eq::assert_approx_eq;
use proptest::prelude::*;

use forest_rotation_simulator::{
    analysis::{compare_strategies, ResultsAnalyzer, Strategy},
    config::SimulationConfig,
    error::SimulationError,
    io,
    models::{Policy, Species},
    simulate,
    simulation::{generate_stands, SpeciesMix},
    CancellationToken, ExecutionStrategy, GrowthModel, PolicyExhaustion, SimulationDriver,
};

/// The 30-stand, 25-year scenario with conservative catalogs.
fn scenario_config() -> SimulationConfig {
    SimulationConfig {
        pine_policies: vec![Policy::from([11, 22]), Policy::from([12, 24])],
        eucalyptus_policies: vec![Policy::from([11]), Policy::from([12])],
        horizon: 25,
        num_stands: 30,
        seed: 2024,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_same_seed_same_results() {
    let a = simulate(&scenario_config()).unwrap();
    let b = simulate(&scenario_config()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_different_seed_changes_stands() {
    let a = generate_stands(30, 2024, &SpeciesMix::default()).unwrap();
    let b = generate_stands(30, 2025, &SpeciesMix::default()).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_scenario_reproduces_generated_stands() {
    let results = simulate(&scenario_config()).unwrap();
    let stands = generate_stands(30, 2024, &SpeciesMix::default()).unwrap();
    assert_eq!(results.stands, stands);
    assert_eq!(results.stands.len(), 30);
}

#[test]
fn test_scenario_combination_count() {
    let results = simulate(&scenario_config()).unwrap();
    let counts = results.stand_counts();
    let pines = counts.get(&Species::Pine).copied().unwrap_or(0);
    let eucs = counts.get(&Species::Eucalyptus).copied().unwrap_or(0);
    assert_eq!(pines + eucs, 30);
    assert_eq!(results.num_combinations(), 2 * pines + 2 * eucs);
    assert_eq!(results.num_combinations(), 60);
}

#[test]
fn test_scenario_biomass_bounded() {
    let config = scenario_config();
    let results = simulate(&config).unwrap();
    for t in &results.trajectories {
        let max = config.growth.parameters(t.species).max_biomass;
        for p in &t.points {
            assert!(p.biomass >= 0.0);
            assert!(p.biomass <= max);
        }
    }
}

#[test]
fn test_every_combination_present_once() {
    let config = scenario_config();
    let results = simulate(&config).unwrap();
    for stand in &results.stands {
        for policy in config.policies_for(stand.species) {
            assert!(results.final_biomass.contains(stand.id, policy));
            assert!(results.trajectory(stand.id, policy).is_some());
        }
        // policies of the other species never apply
        let other = match stand.species {
            Species::Pine => Species::Eucalyptus,
            Species::Eucalyptus => Species::Pine,
        };
        for policy in config.policies_for(other) {
            assert!(!results.final_biomass.contains(stand.id, policy));
        }
    }
    assert_eq!(results.final_biomass.len(), results.num_combinations());
    assert_eq!(results.summaries.len(), results.num_combinations());
}

#[test]
fn test_trajectories_cover_horizon() {
    let results = simulate(&scenario_config()).unwrap();
    for t in &results.trajectories {
        assert_eq!(t.len(), 26);
        let years: Vec<u32> = t.points.iter().map(|p| p.year).collect();
        assert_eq!(years, (0..=25u32).collect::<Vec<_>>());
    }
}

#[test]
fn test_pooled_dataset_size() {
    let results = simulate(&scenario_config()).unwrap();
    let total: usize = results.trajectories.iter().map(|t| t.len()).sum();
    assert_eq!(results.estimation_points.len(), total);
    assert_eq!(results.estimation_points.len(), 60 * 26);
}

#[test]
fn test_summary_matches_trajectory() {
    let results = simulate(&scenario_config()).unwrap();
    for (s, t) in results.summaries.iter().zip(&results.trajectories) {
        assert_eq!(s.stand_id, t.stand_id);
        assert_eq!(s.policy, t.policy);
        assert_eq!(s.number_of_rotations, t.rotations());
        assert_approx_eq!(s.final_biomass, t.final_biomass().unwrap());
        assert_approx_eq!(
            results.final_biomass.get(t.stand_id, &t.policy).unwrap(),
            s.final_biomass
        );
    }
}

#[test]
fn test_reset_after_harvest() {
    let config = scenario_config();
    let results = simulate(&config).unwrap();
    for t in &results.trajectories {
        let seedling = config.growth.biomass(t.species, 0.0).unwrap();
        for pair in t.points.windows(2) {
            if pair[0].harvested {
                assert_eq!(pair[1].age, 0);
                assert_approx_eq!(pair[1].biomass, seedling);
                assert!(pair[1].biomass < pair[0].biomass);
            }
        }
    }
}

#[test]
fn test_growth_monotonic_within_rotation() {
    let results = simulate(&scenario_config()).unwrap();
    for t in &results.trajectories {
        for pair in t.points.windows(2) {
            if !pair[0].harvested {
                assert!(pair[1].biomass >= pair[0].biomass);
                assert_eq!(pair[1].age, pair[0].age + 1);
            }
        }
    }
}

#[test]
fn test_cycle_harvest_calendar() {
    let results = simulate(&scenario_config()).unwrap();
    for t in &results.trajectories {
        // replanted the year after each harvest, so the second rotation
        // reaches the same age as the first
        let (expected, age) = match t.policy.ages() {
            [11, 22] | [11] => (vec![11, 23], 11),
            [12, 24] | [12] => (vec![12, 25], 12),
            other => panic!("unexpected policy {other:?}"),
        };
        assert_eq!(t.harvest_years(), expected);
        assert!(t.points.iter().filter(|p| p.harvested).all(|p| p.age == age));
    }
}

#[test]
fn test_continue_exhaustion_stops_harvesting() {
    let config = SimulationConfig {
        exhaustion: PolicyExhaustion::Continue,
        ..scenario_config()
    };
    let results = simulate(&config).unwrap();
    for t in &results.trajectories {
        if t.species == Species::Eucalyptus {
            assert_eq!(t.rotations(), 1);
        } else {
            assert_eq!(t.rotations(), 2);
        }
    }
}

#[test]
fn test_parallel_and_sequential_identical() {
    let parallel = simulate(&scenario_config()).unwrap();
    let sequential = simulate(&SimulationConfig {
        execution: ExecutionStrategy::Sequential,
        ..scenario_config()
    })
    .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_cancellation_yields_cancelled() {
    let token = CancellationToken::new();
    token.cancel();
    let result = SimulationDriver::new(scenario_config())
        .with_cancellation(token)
        .run();
    assert!(matches!(result, Err(SimulationError::Cancelled)));
}

#[test]
fn test_cancellation_during_run_yields_cancelled() {
    for execution in [ExecutionStrategy::Parallel, ExecutionStrategy::Sequential] {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let config = SimulationConfig {
            execution,
            ..scenario_config()
        };
        let result = SimulationDriver::new(config)
            .with_cancellation(token)
            .with_progress(move |done, total| {
                if done == total / 2 {
                    trigger.cancel();
                }
            })
            .run();
        assert!(
            matches!(result, Err(SimulationError::Cancelled)),
            "{execution:?}"
        );
    }
}

#[test]
fn test_policy_arity_rejected() {
    let config = SimulationConfig {
        eucalyptus_policies: vec![Policy::from([11, 22])],
        ..scenario_config()
    };
    assert!(matches!(
        simulate(&config),
        Err(SimulationError::ConfigurationError(_))
    ));
}

#[test]
fn test_policy_beyond_horizon_rejected() {
    let config = SimulationConfig {
        horizon: 20,
        ..scenario_config()
    };
    let err = simulate(&config).unwrap_err();
    assert!(err.to_string().contains("exceeds horizon"));
}

#[test]
fn test_statistics_hand_computed() {
    let results = simulate(&scenario_config()).unwrap();
    let values: Vec<f64> = results.final_biomass.values().collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    let stats = ResultsAnalyzer::new(&results)
        .final_biomass_statistics()
        .unwrap();
    assert_approx_eq!(stats.mean, mean);
    assert_approx_eq!(stats.std_dev, var.sqrt());
}

#[test]
fn test_compare_presets_uses_same_forest() {
    let base = scenario_config();
    let comparison = compare_strategies(&base, &Strategy::presets()).unwrap();
    assert_eq!(comparison.outcomes.len(), 3);

    let stands = generate_stands(30, 2024, &SpeciesMix::default()).unwrap();
    let pines = stands.iter().filter(|s| s.species == Species::Pine).count();
    let eucs = stands.len() - pines;
    // intensive: 3 pine and 2 eucalyptus policies
    assert_eq!(comparison.outcomes[1].combinations, 3 * pines + 2 * eucs);
}

#[test]
fn test_json_export_roundtrip() {
    let results = simulate(&scenario_config()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    io::write_json(&results, &path, false).unwrap();
    assert_eq!(io::read_json(&path).unwrap(), results);
}

#[test]
fn test_csv_exports_have_expected_rows() {
    let results = simulate(&scenario_config()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let paths = io::write_all_csv(&results, dir.path()).unwrap();

    let rows = |name: &str| {
        let path = paths.iter().find(|p| p.ends_with(name)).unwrap();
        std::fs::read_to_string(path).unwrap().lines().count() - 1
    };
    assert_eq!(rows("trajectories.csv"), 60 * 26);
    assert_eq!(rows("summaries.csv"), 60);
    assert_eq!(rows("final_biomass.csv"), 60);
    assert_eq!(rows("estimation.csv"), 60 * 26);
}

#[test]
fn test_excel_export() {
    let results = simulate(&scenario_config()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.xlsx");
    io::write_excel(&results, &path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_seed_determinism(seed in any::<u64>(), stands in 1u32..40) {
        let config = SimulationConfig {
            num_stands: stands,
            seed,
            ..SimulationConfig::default()
        };
        let a = simulate(&config).unwrap();
        let b = simulate(&config).unwrap();
        prop_assert_eq!(a.stands.len(), stands as usize);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_growth_never_decreases(age in 0.0f64..80.0, step in 0.0f64..10.0) {
        let model = GrowthModel::default();
        for species in Species::ALL {
            let now = model.biomass(species, age).unwrap();
            let later = model.biomass(species, age + step).unwrap();
            prop_assert!(later >= now);
        }
    }
}
