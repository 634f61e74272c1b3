//! Property tests for the seeded fills.
//!
//! DEMs are small grids drawn from a handful of elevation levels so that
//! plateaus, ties and nodata holes show up often.

use proptest::prelude::*;
use relieffill_algorithms::fill::{
    altitude_fill, basin_fill, AltitudeFillParams, BasinFillParams, FillDirection,
};
use relieffill_core::raster::{Connectivity, Raster};
use std::collections::VecDeque;

const NODATA_LEVEL: u8 = 6;

fn dem_and_seed() -> impl Strategy<Value = (Raster<f64>, (usize, usize))> {
    (1usize..10, 1usize..10).prop_flat_map(|(rows, cols)| {
        (
            proptest::collection::vec(0u8..=NODATA_LEVEL, rows * cols),
            0..rows,
            0..cols,
        )
            .prop_map(move |(levels, row, col)| {
                let data = levels
                    .into_iter()
                    .map(|l| if l == NODATA_LEVEL { f64::NAN } else { l as f64 })
                    .collect();
                (Raster::from_vec(data, rows, cols).unwrap(), (row, col))
            })
    })
}

fn connectivity() -> impl Strategy<Value = Connectivity> {
    prop_oneof![Just(Connectivity::Four), Just(Connectivity::Eight)]
}

fn direction() -> impl Strategy<Value = FillDirection> {
    prop_oneof![Just(FillDirection::Downstream), Just(FillDirection::Upstream)]
}

fn selected(mask: &Raster<u8>) -> Vec<(usize, usize)> {
    mask.data()
        .indexed_iter()
        .filter(|(_, &v)| v == 1)
        .map(|(idx, _)| idx)
        .collect()
}

fn is_subset(inner: &Raster<u8>, outer: &Raster<u8>) -> bool {
    inner
        .data()
        .iter()
        .zip(outer.data().iter())
        .all(|(&a, &b)| a <= b)
}

/// Number of mask cells reachable from `seed` without leaving the mask
fn reachable_within(mask: &Raster<u8>, seed: (usize, usize), connectivity: Connectivity) -> usize {
    let (rows, cols) = mask.shape();
    let mut seen = vec![false; rows * cols];
    let mut queue = VecDeque::from([seed]);
    seen[seed.0 * cols + seed.1] = true;
    let mut count = 0;

    while let Some((r, c)) = queue.pop_front() {
        count += 1;
        for (nr, nc) in connectivity.neighbors(r, c, rows, cols) {
            if !seen[nr * cols + nc] && mask.get(nr, nc).unwrap() == 1 {
                seen[nr * cols + nc] = true;
                queue.push_back((nr, nc));
            }
        }
    }
    count
}

/// Cells reachable from `seed` along paths that never climb (downstream)
/// or never descend (upstream), skipping NaN cells
fn monotone_reachable(
    dem: &Raster<f64>,
    seed: (usize, usize),
    connectivity: Connectivity,
    direction: FillDirection,
) -> Vec<(usize, usize)> {
    let (rows, cols) = dem.shape();
    let z = |cell: (usize, usize)| dem.get(cell.0, cell.1).unwrap();
    let step_ok = |from: f64, to: f64| match direction {
        FillDirection::Downstream => to <= from,
        FillDirection::Upstream => to >= from,
    };

    let mut seen = vec![false; rows * cols];
    let mut queue = VecDeque::from([seed]);
    seen[seed.0 * cols + seed.1] = true;

    while let Some((r, c)) = queue.pop_front() {
        for (nr, nc) in connectivity.neighbors(r, c, rows, cols) {
            let to = z((nr, nc));
            if !seen[nr * cols + nc] && !to.is_nan() && step_ok(z((r, c)), to) {
                seen[nr * cols + nc] = true;
                queue.push_back((nr, nc));
            }
        }
    }

    let mut cells: Vec<_> = (0..rows * cols)
        .filter(|&i| seen[i])
        .map(|i| (i / cols, i % cols))
        .collect();
    cells.sort_unstable();
    cells
}

proptest! {
    #[test]
    fn altitude_mask_is_component_containing_seed(
        (dem, seed) in dem_and_seed(),
        connectivity in connectivity(),
        direction in direction(),
    ) {
        prop_assume!(!dem.get(seed.0, seed.1).unwrap().is_nan());
        let params = AltitudeFillParams { direction, connectivity, threshold: None };
        let mask = altitude_fill(&dem, seed, params).unwrap();

        prop_assert_eq!(mask.get(seed.0, seed.1).unwrap(), 1);
        prop_assert_eq!(reachable_within(&mask, seed, connectivity), mask.count_equal(1));

        let seed_z = dem.get(seed.0, seed.1).unwrap();
        for (r, c) in selected(&mask) {
            let z = dem.get(r, c).unwrap();
            prop_assert!(!z.is_nan());
            prop_assert!(direction.admits(z, seed_z));
        }
    }

    #[test]
    fn altitude_mask_is_maximal(
        (dem, seed) in dem_and_seed(),
        connectivity in connectivity(),
        direction in direction(),
    ) {
        prop_assume!(!dem.get(seed.0, seed.1).unwrap().is_nan());
        let seed_z = dem.get(seed.0, seed.1).unwrap();
        let params = AltitudeFillParams { direction, connectivity, threshold: None };
        let mask = altitude_fill(&dem, seed, params).unwrap();
        let (rows, cols) = dem.shape();

        // No unselected valid neighbour of the mask passes the threshold test
        for (r, c) in selected(&mask) {
            for (nr, nc) in connectivity.neighbors(r, c, rows, cols) {
                if mask.get(nr, nc).unwrap() == 0 {
                    let z = dem.get(nr, nc).unwrap();
                    prop_assert!(z.is_nan() || !direction.admits(z, seed_z));
                }
            }
        }
    }

    #[test]
    fn reseeding_with_fixed_threshold_is_idempotent(
        (dem, seed) in dem_and_seed(),
        connectivity in connectivity(),
        direction in direction(),
    ) {
        prop_assume!(!dem.get(seed.0, seed.1).unwrap().is_nan());
        let threshold = Some(dem.get(seed.0, seed.1).unwrap());
        let params = AltitudeFillParams { direction, connectivity, threshold };
        let mask = altitude_fill(&dem, seed, params).unwrap();

        for cell in selected(&mask) {
            let again = altitude_fill(&dem, cell, params).unwrap();
            prop_assert_eq!(again.data(), mask.data());
        }
    }

    #[test]
    fn widening_threshold_never_shrinks_mask(
        (dem, seed) in dem_and_seed(),
        connectivity in connectivity(),
        a in -1.0f64..7.0,
        b in -1.0f64..7.0,
    ) {
        prop_assume!(!dem.get(seed.0, seed.1).unwrap().is_nan());
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let run = |direction, threshold| {
            altitude_fill(&dem, seed, AltitudeFillParams {
                direction,
                connectivity,
                threshold: Some(threshold),
            })
            .unwrap()
        };

        let down_low = run(FillDirection::Downstream, low);
        let down_high = run(FillDirection::Downstream, high);
        prop_assert!(is_subset(&down_low, &down_high));

        let up_low = run(FillDirection::Upstream, low);
        let up_high = run(FillDirection::Upstream, high);
        prop_assert!(is_subset(&up_high, &up_low));
    }

    #[test]
    fn eight_connectivity_contains_four(
        (dem, seed) in dem_and_seed(),
        direction in direction(),
    ) {
        prop_assume!(!dem.get(seed.0, seed.1).unwrap().is_nan());
        let four = altitude_fill(&dem, seed, AltitudeFillParams {
            direction,
            connectivity: Connectivity::Four,
            threshold: None,
        })
        .unwrap();
        let eight = altitude_fill(&dem, seed, AltitudeFillParams {
            direction,
            connectivity: Connectivity::Eight,
            threshold: None,
        })
        .unwrap();
        prop_assert!(is_subset(&four, &eight));
    }

    #[test]
    fn basin_mask_is_connected_subset_of_altitude_mask(
        (dem, seed) in dem_and_seed(),
        connectivity in connectivity(),
        direction in direction(),
    ) {
        prop_assume!(!dem.get(seed.0, seed.1).unwrap().is_nan());
        let basin = basin_fill(&dem, seed, BasinFillParams { direction, connectivity }).unwrap();
        let altitude = altitude_fill(&dem, seed, AltitudeFillParams {
            direction,
            connectivity,
            threshold: None,
        })
        .unwrap();

        prop_assert_eq!(basin.get(seed.0, seed.1).unwrap(), 1);
        prop_assert_eq!(reachable_within(&basin, seed, connectivity), basin.count_equal(1));
        prop_assert!(is_subset(&basin, &altitude));
    }

    #[test]
    fn basin_mask_is_monotone_path_reachability(
        (dem, seed) in dem_and_seed(),
        connectivity in connectivity(),
        direction in direction(),
    ) {
        prop_assume!(!dem.get(seed.0, seed.1).unwrap().is_nan());
        let basin = basin_fill(&dem, seed, BasinFillParams { direction, connectivity }).unwrap();
        prop_assert_eq!(selected(&basin), monotone_reachable(&dem, seed, connectivity, direction));
    }

    #[test]
    fn downstream_is_upstream_of_inverted_dem(
        (dem, seed) in dem_and_seed(),
        connectivity in connectivity(),
    ) {
        prop_assume!(!dem.get(seed.0, seed.1).unwrap().is_nan());
        let inverted = Raster::from_array(dem.data().mapv(|z| -z));

        let down = basin_fill(&dem, seed, BasinFillParams {
            direction: FillDirection::Downstream,
            connectivity,
        })
        .unwrap();
        let up = basin_fill(&inverted, seed, BasinFillParams {
            direction: FillDirection::Upstream,
            connectivity,
        })
        .unwrap();
        prop_assert_eq!(down.data(), up.data());
    }
}
