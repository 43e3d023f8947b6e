//! Randomized constructive placement.
//!
//! Each trial starts from an empty grid and places every requested stall at
//! an independently sampled position, giving up on the trial as soon as one
//! stall exhausts its attempt budget.

use crate::catalog::{StallCatalog, StallRequest};
use crate::grid::GridOccupancy;
use crate::placement::{Placement, StallInstance};
use crate::site::SitePlan;
use rand::seq::SliceRandom;
use rand::Rng;
use stallplan_core::{Error, Result};

/// Runs one constructive trial, placing all requested stalls on a fresh grid.
///
/// Fails with [`Error::PlacementFailed`] when a stall cannot be placed within
/// `attempts` random positions. Callers treat that as an abandoned trial, not
/// a hard error.
pub fn run_restart_trial<R: Rng>(
    catalog: &StallCatalog,
    site: &SitePlan,
    attempts: usize,
    shuffle: bool,
    rng: &mut R,
) -> Result<Placement> {
    let mut grid = site.build_grid();
    let mut requests = catalog.requests();
    if shuffle {
        requests.shuffle(rng);
    }

    let mut stalls = Vec::with_capacity(requests.len());
    for request in &requests {
        stalls.push(place_one(catalog, &mut grid, request, attempts, rng)?);
    }

    Ok(Placement::new(stalls, grid))
}

/// Places a single stall at a random free position.
///
/// The footprint orientation is chosen once per stall; only the position is
/// re-sampled across attempts.
fn place_one<R: Rng>(
    catalog: &StallCatalog,
    grid: &mut GridOccupancy,
    request: &StallRequest,
    attempts: usize,
    rng: &mut R,
) -> Result<StallInstance> {
    let category = catalog.category(request.category);
    let fitting: Vec<(usize, usize)> = category
        .footprints
        .iter()
        .copied()
        .filter(|&(w, h)| w <= grid.width() && h <= grid.height())
        .collect();

    if fitting.is_empty() {
        return Err(Error::PlacementFailed {
            stall: request.id,
            attempts: 0,
        });
    }

    let (width, height) = fitting[rng.gen_range(0..fitting.len())];

    for _ in 0..attempts {
        let x = rng.gen_range(0..=grid.width() - width);
        let y = rng.gen_range(0..=grid.height() - height);
        if grid.place(request.id, x, y, width, height) {
            return Ok(StallInstance {
                id: request.id,
                category: request.category,
                width,
                height,
                x,
                y,
            });
        }
    }

    Err(Error::PlacementFailed {
        stall: request.id,
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StallCategory;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_places_every_requested_stall() {
        let catalog = StallCatalog::market_preset();
        let site = SitePlan::market_preset();
        let mut rng = StdRng::seed_from_u64(7);

        let placement = run_restart_trial(&catalog, &site, 1000, true, &mut rng)
            .unwrap_or_else(|e| panic!("trial failed: {e}"));

        assert_eq!(placement.stalls().len(), catalog.total_count());
    }

    #[test]
    fn test_placed_stalls_never_overlap() {
        let catalog = StallCatalog::market_preset();
        let site = SitePlan::market_preset();
        let mut rng = StdRng::seed_from_u64(11);

        let placement = run_restart_trial(&catalog, &site, 1000, true, &mut rng)
            .unwrap_or_else(|e| panic!("trial failed: {e}"));

        let stalls = placement.stalls();
        for (i, a) in stalls.iter().enumerate() {
            for b in &stalls[i + 1..] {
                assert!(!a.overlaps(b), "stalls {} and {} overlap", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_placed_stalls_avoid_reserved_cells() {
        let catalog = StallCatalog::market_preset();
        let site = SitePlan::market_preset();
        let mut rng = StdRng::seed_from_u64(13);

        let placement = run_restart_trial(&catalog, &site, 1000, true, &mut rng)
            .unwrap_or_else(|e| panic!("trial failed: {e}"));

        for &(x, y) in site.paths() {
            for stall in placement.stalls() {
                assert!(!stall.covers(x, y), "stall {} covers path cell", stall.id);
            }
        }
    }

    #[test]
    fn test_oversized_stall_fails_without_sampling() {
        let catalog = StallCatalog::new(vec![StallCategory::new("big", 6, 6)]);
        let site = SitePlan::new(5, 5);
        let mut rng = StdRng::seed_from_u64(3);

        let err = run_restart_trial(&catalog, &site, 1000, false, &mut rng)
            .err()
            .unwrap_or_else(|| panic!("expected failure"));

        assert!(matches!(
            err,
            Error::PlacementFailed { stall: 0, attempts: 0 }
        ));
    }

    #[test]
    fn test_crowded_grid_reports_attempt_budget() {
        // Two 3x3 stalls cannot both fit on a 3x3 grid.
        let catalog = StallCatalog::new(vec![StallCategory::new("a", 3, 3).with_count(2)]);
        let site = SitePlan::new(3, 3);
        let mut rng = StdRng::seed_from_u64(5);

        let err = run_restart_trial(&catalog, &site, 50, false, &mut rng)
            .err()
            .unwrap_or_else(|| panic!("expected failure"));

        assert!(matches!(err, Error::PlacementFailed { attempts: 50, .. }));
    }

    #[test]
    fn test_same_seed_reproduces_layout() {
        let catalog = StallCatalog::market_preset();
        let site = SitePlan::market_preset();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        let a = run_restart_trial(&catalog, &site, 1000, true, &mut rng_a)
            .unwrap_or_else(|e| panic!("trial failed: {e}"));
        let b = run_restart_trial(&catalog, &site, 1000, true, &mut rng_b)
            .unwrap_or_else(|e| panic!("trial failed: {e}"));

        assert_eq!(a.stalls(), b.stalls());
    }
}
