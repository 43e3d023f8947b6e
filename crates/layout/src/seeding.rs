//! Cellular-growth placement.
//!
//! Stalls grow from random seed cells. Each seed scores the categories that
//! still have instances outstanding against two precomputed traffic fields
//! and draws uniformly among the best scorers, so declaration order never
//! biases category selection.

use crate::catalog::{Affinity, StallCatalog};
use crate::grid::Cell;
use crate::placement::{Placement, StallInstance};
use crate::site::SitePlan;
use nalgebra::{distance, Point2};
use rand::Rng;
use stallplan_core::{Error, Result};

/// Per-cell scoring fields derived from the site plan.
///
/// Long-stay zones hug circulation; short-stay zones sit deep.
struct TrafficFields {
    width: usize,
    /// Inverse distance to the nearest circulation cell.
    efficiency: Vec<f64>,
    /// Distance to the nearest entry.
    exploration: Vec<f64>,
}

impl TrafficFields {
    fn new(site: &SitePlan) -> Self {
        let paths: Vec<Point2<f64>> = site
            .paths()
            .iter()
            .map(|&(x, y)| Point2::new(x as f64, y as f64))
            .collect();
        let entries = site.entry_points();

        let mut efficiency = Vec::with_capacity(site.width() * site.height());
        let mut exploration = Vec::with_capacity(site.width() * site.height());
        for y in 0..site.height() {
            for x in 0..site.width() {
                let cell = Point2::new(x as f64, y as f64);
                efficiency.push(1.0 / (1.0 + nearest_distance(&cell, &paths)));
                exploration.push(nearest_distance(&cell, &entries));
            }
        }

        // Both fields compete in pick_category, so they must share a scale.
        normalize(&mut efficiency);
        normalize(&mut exploration);

        Self {
            width: site.width(),
            efficiency,
            exploration,
        }
    }

    fn score(&self, affinity: Affinity, x: usize, y: usize) -> f64 {
        let idx = y * self.width + x;
        match affinity {
            Affinity::LongStay => self.efficiency[idx],
            Affinity::ShortStay => self.exploration[idx],
            Affinity::Either => 0.0,
        }
    }
}

/// Distance from `from` to the closest of `targets`, infinite when empty.
fn nearest_distance(from: &Point2<f64>, targets: &[Point2<f64>]) -> f64 {
    targets
        .iter()
        .map(|t| distance(from, t))
        .fold(f64::INFINITY, f64::min)
}

/// Scales a field to [0, 1]. Flat or degenerate fields collapse to zero.
fn normalize(values: &mut [f64]) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        values.iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    values.iter_mut().for_each(|v| *v = (*v - min) / span);
}

/// Runs one cellular-growth trial.
///
/// `attempts` bounds the number of seed cells tried across the whole trial;
/// exhausting it with stalls outstanding fails with
/// [`Error::PlacementFailed`].
pub fn run_seeding_trial<R: Rng>(
    catalog: &StallCatalog,
    site: &SitePlan,
    attempts: usize,
    rng: &mut R,
) -> Result<Placement> {
    let mut grid = site.build_grid();
    let fields = TrafficFields::new(site);

    let mut remaining: Vec<usize> = catalog.categories().iter().map(|c| c.count).collect();
    let mut outstanding: usize = remaining.iter().sum();

    // Footprint options that fit the grid at all, per category.
    let fitting: Vec<Vec<(usize, usize)>> = catalog
        .categories()
        .iter()
        .map(|c| {
            c.footprints
                .iter()
                .copied()
                .filter(|&(w, h)| w <= grid.width() && h <= grid.height())
                .collect()
        })
        .collect();

    let mut stalls = Vec::with_capacity(outstanding);
    let mut next_id = 0;

    for _ in 0..attempts {
        if outstanding == 0 {
            break;
        }

        let x = rng.gen_range(0..grid.width());
        let y = rng.gen_range(0..grid.height());
        if grid.cell(x, y) != Some(Cell::Empty) {
            continue;
        }

        let Some(category) = pick_category(catalog, &remaining, &fitting, &fields, x, y, rng)
        else {
            continue;
        };

        let options = &fitting[category];
        let (width, height) = options[rng.gen_range(0..options.len())];
        if grid.place(next_id, x, y, width, height) {
            stalls.push(StallInstance {
                id: next_id,
                category,
                width,
                height,
                x,
                y,
            });
            remaining[category] -= 1;
            outstanding -= 1;
            next_id += 1;
        }
    }

    if outstanding > 0 {
        return Err(Error::PlacementFailed {
            stall: next_id,
            attempts,
        });
    }

    Ok(Placement::new(stalls, grid))
}

/// Scores outstanding categories at a seed cell and draws uniformly among
/// the highest scorers.
fn pick_category<R: Rng>(
    catalog: &StallCatalog,
    remaining: &[usize],
    fitting: &[Vec<(usize, usize)>],
    fields: &TrafficFields,
    x: usize,
    y: usize,
    rng: &mut R,
) -> Option<usize> {
    let mut best_score = f64::NEG_INFINITY;
    let mut best: Vec<usize> = Vec::new();

    for (index, category) in catalog.categories().iter().enumerate() {
        if remaining[index] == 0 || fitting[index].is_empty() {
            continue;
        }
        let score = fields.score(category.affinity, x, y);
        if score > best_score {
            best_score = score;
            best.clear();
            best.push(index);
        } else if score == best_score {
            best.push(index);
        }
    }

    if best.is_empty() {
        None
    } else {
        Some(best[rng.gen_range(0..best.len())])
    }
}
