// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam backtracking
//!
//! Find the cheapest cell on the bottom row of a cost table and walk
//! back up it, always stepping to the cheapest of the (up to) three
//! cells above.

use crate::costs::{cheapest, neighbours};
use crate::seam::Seam;
use crate::twodmap::{CostTable, EnergyMap};
use tracing::trace;

/// Trace the minimum-cost seam through `costs`.
///
/// On success every pixel of the seam is set to an infinite energy in
/// `energy`, the map `costs` was computed from.  Recomputing the costs
/// from that map and tracing again yields a seam disjoint from this
/// one, which is how several seams are pulled from a single energy
/// computation.
///
/// Returns `None` when every remaining path has an infinite cost, i.e.
/// the seams are exhausted.  The energy map is untouched in that case.
pub fn trace_seam(energy: &mut EnergyMap, costs: &CostTable) -> Option<Seam> {
    debug_assert_eq!(energy.dimensions(), costs.dimensions());
    let (width, height) = costs.dimensions();

    let (mut seam_col, bottom) = cheapest(costs.row(height - 1), 0, width - 1);
    if bottom.is_infinite() {
        trace!(width, height, "no finite path reaches the bottom row");
        return None;
    }

    // Working backwards, fill in the column of every row above.
    let mut columns = vec![0u32; height as usize];
    columns[height as usize - 1] = seam_col;
    for y in (0..height - 1).rev() {
        let (lo, hi) = neighbours(seam_col, width);
        let (parent, cost) = cheapest(costs.row(y), lo, hi);
        if cost.is_infinite() {
            return None;
        }
        columns[y as usize] = parent;
        seam_col = parent;
    }

    for (y, &x) in columns.iter().enumerate() {
        energy[(x, y as u32)] = f64::INFINITY;
    }
    trace!(cost = bottom, "traced seam");
    Some(Seam::from_traced(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::compute_costs;

    #[rustfmt::skip]
    const ENERGY_DATA: [f64; 20] = [
        9.0, 9.0, 0.0, 9.0, 9.0,
        9.0, 1.0, 9.0, 8.0, 9.0,
        9.0, 9.0, 9.0, 9.0, 0.0,
        9.0, 9.0, 9.0, 0.0, 9.0,
    ];

    fn energy() -> EnergyMap {
        EnergyMap::from_vec(5, 4, ENERGY_DATA.to_vec()).unwrap()
    }

    #[test]
    fn energy_grid_to_vertical_seam() {
        let mut energy = energy();
        let costs = compute_costs(&energy).unwrap();
        let seam = trace_seam(&mut energy, &costs).unwrap();
        assert_eq!(seam.columns(), &[2, 3, 4, 3]);
    }

    #[test]
    fn traced_pixels_become_infinite() {
        let mut energy = energy();
        let costs = compute_costs(&energy).unwrap();
        let seam = trace_seam(&mut energy, &costs).unwrap();
        for (y, &x) in seam.columns().iter().enumerate() {
            assert!(energy[(x, y as u32)].is_infinite());
        }
        let untouched = energy.as_slice().iter().filter(|e| e.is_finite()).count();
        assert_eq!(untouched, 16);
    }

    #[test]
    fn repeated_traces_never_overlap_until_exhausted() {
        let mut energy = energy();
        let mut seen = Vec::new();
        loop {
            let costs = compute_costs(&energy).unwrap();
            match trace_seam(&mut energy, &costs) {
                Some(seam) => {
                    assert!(seam.is_connected());
                    for (y, &x) in seam.columns().iter().enumerate() {
                        assert!(!seen.contains(&(x, y)), "pixel ({}, {}) reused", x, y);
                        seen.push((x, y));
                    }
                }
                None => break,
            }
            assert!(seen.len() <= 20);
        }
        assert!(!seen.is_empty());
    }

    #[test]
    fn exhausted_map_is_left_alone() {
        let mut energy = EnergyMap::from_vec(2, 2, vec![f64::INFINITY; 4]).unwrap();
        let costs = compute_costs(&energy).unwrap();
        assert!(trace_seam(&mut energy, &costs).is_none());
        assert!(energy.as_slice().iter().all(|e| e.is_infinite()));
    }

    #[test]
    fn single_column_seam() {
        let mut energy = EnergyMap::from_vec(1, 3, vec![5.0, 5.0, 5.0]).unwrap();
        let costs = compute_costs(&energy).unwrap();
        assert_eq!(trace_seam(&mut energy, &costs).unwrap().columns(), &[0, 0, 0]);
        let costs = compute_costs(&energy).unwrap();
        assert!(trace_seam(&mut energy, &costs).is_none());
    }
}
