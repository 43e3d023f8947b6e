//! End-to-end scenario tests for market layout generation.
//!
//! Tests the full pipeline: StallCatalog + SitePlan → LayoutOptimizer.run()
//! → ranked FitnessReports.

use stallplan_layout::{
    FitnessConfig, FitnessEvaluator, GridOccupancy, LayoutOptimizer, OptimizerConfig, Placement,
    RankedLayout, SitePlan, StallCatalog, StallCategory, StallInstance, Strategy,
};

/// Helper: build an optimizer and run it, panicking on configuration errors.
fn run_layouts(catalog: StallCatalog, site: SitePlan, config: OptimizerConfig) -> Vec<RankedLayout> {
    LayoutOptimizer::new(catalog, site, config)
        .run()
        .expect("optimizer run should succeed")
}

/// Helper: distance between the centers of the first two stalls.
fn separation(ranked: &RankedLayout) -> f64 {
    let stalls = ranked.placement.stalls();
    let a = stalls[0].center();
    let b = stalls[1].center();
    (a.x - b.x).hypot(a.y - b.y)
}

#[test]
fn test_market_preset_produces_ranked_layouts() {
    let catalog = StallCatalog::market_preset();
    let site = SitePlan::market_preset();
    let total = catalog.total_count();

    let results = run_layouts(catalog, site, OptimizerConfig::default().with_seed(3));

    assert!(!results.is_empty());
    assert!(results.len() <= 5);

    // Best first, every layout complete and structurally valid.
    for pair in results.windows(2) {
        assert!(pair[0].report.total <= pair[1].report.total);
    }
    for ranked in &results {
        assert!(ranked.report.valid);
        assert_eq!(ranked.placement.stalls().len(), total);
    }
}

#[test]
fn test_single_stall_on_open_site_scores_zero_conflicts() {
    let catalog = StallCatalog::new(vec![StallCategory::new("produce", 3, 3)]);
    let site = SitePlan::new(20, 20);
    let config = OptimizerConfig::default().with_trials(10).with_retain(1);

    let results = run_layouts(catalog, site, config);

    assert_eq!(results.len(), 1);
    let report = &results[0].report;
    assert!(report.valid);
    assert_eq!(report.circulation, 0.0);
    assert_eq!(report.odor, 0.0);
    assert_eq!(report.adjacency, 0.0);
}

#[test]
fn test_oversized_stall_yields_empty_result_not_error() {
    let catalog = StallCatalog::new(vec![StallCategory::new("warehouse", 6, 6)]);
    let site = SitePlan::new(5, 5);

    for strategy in [
        Strategy::MultiRestart,
        Strategy::Annealing,
        Strategy::CellularGrowth,
    ] {
        let config = OptimizerConfig::default()
            .with_strategy(strategy)
            .with_trials(3);
        let results = run_layouts(catalog.clone(), site.clone(), config);
        assert!(
            results.is_empty(),
            "{strategy:?} returned a layout for an impossible request"
        );
    }
}

#[test]
fn test_mutual_repulsion_spreads_stalls_apart() {
    let make_catalog = |preference: f64| {
        StallCatalog::new(vec![
            StallCategory::new("a", 3, 3),
            StallCategory::new("b", 3, 3),
        ])
        .with_adjacency(0, 1, preference)
    };
    // The entry pulls both stalls toward one corner, so any extra spread
    // has to come from the adjacency term.
    let site = SitePlan::new(24, 24).with_entries([(0, 0)]);

    let mean_separation = |preference: f64| {
        let mut sum = 0.0;
        for seed in 1..=5 {
            let config = OptimizerConfig::default()
                .with_trials(40)
                .with_retain(1)
                .with_seed(seed);
            let results = run_layouts(make_catalog(preference), site.clone(), config);
            sum += separation(&results[0]);
        }
        sum / 5.0
    };

    let neutral = mean_separation(0.0);
    let repulsive = mean_separation(-50.0);

    assert!(
        repulsive > neutral,
        "repulsion should spread stalls: neutral {neutral:.2}, repulsive {repulsive:.2}"
    );
}

#[test]
fn test_same_seed_reproduces_full_ranking() {
    let catalog = StallCatalog::market_preset();
    let site = SitePlan::market_preset();
    let config = OptimizerConfig::default().with_trials(10).with_seed(42);

    let first = run_layouts(catalog.clone(), site.clone(), config.clone());
    let second = run_layouts(catalog, site, config);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.report.total, b.report.total);
        assert_eq!(a.placement.stalls(), b.placement.stalls());
    }
}

#[test]
fn test_parallel_run_matches_sequential_run() {
    let catalog = StallCatalog::market_preset();
    let site = SitePlan::market_preset();
    let config = OptimizerConfig::default().with_trials(10).with_seed(11);

    let sequential = run_layouts(catalog.clone(), site.clone(), config.clone());
    let parallel = run_layouts(catalog, site, config.with_parallel(true));

    assert_eq!(sequential.len(), parallel.len());
    for (a, b) in sequential.iter().zip(&parallel) {
        assert_eq!(a.report.total, b.report.total);
        assert_eq!(a.placement.stalls(), b.placement.stalls());
    }
}

#[test]
fn test_retained_layouts_keep_reserved_cells_clear() {
    let catalog = StallCatalog::market_preset();
    let site = SitePlan::market_preset();

    let results = run_layouts(catalog, site.clone(), OptimizerConfig::default());

    assert!(!results.is_empty());
    for ranked in &results {
        // Placers work on grids with reservations applied, so no retained
        // layout can block circulation.
        assert_eq!(ranked.report.circulation, 0.0);
        for &(x, y) in site.paths() {
            for stall in ranked.placement.stalls() {
                assert!(!stall.covers(x, y));
            }
        }
        for &(x, y) in site.drains() {
            for stall in ranked.placement.stalls() {
                assert!(!stall.covers(x, y));
            }
        }
    }
}

#[test]
fn test_overlap_penalty_dwarfs_every_valid_score() {
    let catalog = StallCatalog::market_preset();
    let site = SitePlan::market_preset();

    let results = run_layouts(
        catalog.clone(),
        site.clone(),
        OptimizerConfig::default().with_seed(5),
    );
    let worst_valid = results
        .iter()
        .map(|r| r.report.total.abs())
        .fold(0.0, f64::max);

    let evaluator = FitnessEvaluator::new(&catalog, &site, FitnessConfig::default());
    let overlapping = Placement::new(
        vec![
            StallInstance {
                id: 0,
                category: 0,
                width: 3,
                height: 3,
                x: 1,
                y: 1,
            },
            StallInstance {
                id: 1,
                category: 0,
                width: 3,
                height: 3,
                x: 2,
                y: 2,
            },
        ],
        GridOccupancy::new(20, 20),
    );
    let report = evaluator.evaluate(&overlapping);

    assert!(!report.valid);
    assert!(report.total >= 1000.0 * worst_valid.max(1.0));
}

#[test]
fn test_snapshot_exports_every_stall() {
    let catalog = StallCatalog::market_preset();
    let site = SitePlan::market_preset();

    let results = run_layouts(
        catalog.clone(),
        site,
        OptimizerConfig::default().with_retain(1),
    );
    let best = &results[0];

    let snapshot = best.placement.snapshot(&catalog);

    assert_eq!(snapshot.width, 20);
    assert_eq!(snapshot.height, 20);
    assert_eq!(snapshot.cells.len(), 400);
    assert_eq!(snapshot.stalls.len(), best.placement.stalls().len());

    let names: Vec<&str> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
    for record in &snapshot.stalls {
        assert!(names.contains(&record.category.as_str()));
    }
}

#[test]
fn test_cellular_growth_fills_market_preset() {
    let catalog = StallCatalog::market_preset();
    let site = SitePlan::market_preset();
    let total = catalog.total_count();
    let config = OptimizerConfig::default()
        .with_strategy(Strategy::CellularGrowth)
        .with_trials(10)
        .with_seed(9);

    let results = run_layouts(catalog, site, config);

    assert!(!results.is_empty());
    for ranked in &results {
        assert_eq!(ranked.placement.stalls().len(), total);
        assert!(ranked.report.valid);
    }
}
