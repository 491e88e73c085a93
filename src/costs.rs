// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cumulative cost table
//!
//! The first row is the energy itself.  For every subsequent row, each
//! cell is its own energy plus the *lowest adjacent upper cost*:
//!
//! ```text
//!            ⎧ C(x−1,y−1)
//! C(x,y)=E + min⎨ C(x,y−1)
//!            ⎩ C(x+1,y−1)
//! ```
//!
//! Neighbours that fall off either edge are simply not considered.  A
//! consumed pixel carries an infinite energy, and so does every path
//! through it.

use crate::error::CarveError;
use crate::twodmap::{CostTable, EnergyMap};

/// The inclusive column range of the up-to-three neighbours of `x` in
/// the adjacent row.
#[inline]
pub(crate) fn neighbours(x: u32, width: u32) -> (u32, u32) {
    (x.saturating_sub(1), (x + 1).min(width - 1))
}

/// The cheapest cell in `row[lo..=hi]`, and its cost.  The leftmost
/// cell wins a tie, which keeps seam paths reproducible.
#[inline]
pub(crate) fn cheapest(row: &[f64], lo: u32, hi: u32) -> (u32, f64) {
    let mut best = (lo, row[lo as usize]);
    for x in (lo + 1)..=hi {
        let cost = row[x as usize];
        if cost < best.1 {
            best = (x, cost);
        }
    }
    best
}

/// Run the forward pass over an energy map.  The map is left alone;
/// the table is a fresh allocation of the same shape.
pub fn compute_costs(energy: &EnergyMap) -> Result<CostTable, CarveError> {
    let (width, height) = energy.dimensions();
    let mut costs = CostTable::filled(width, height, 0.0)?;
    costs.as_mut_slice().copy_from_slice(energy.as_slice());

    let w = width as usize;
    for y in 1..height as usize {
        let (above, below) = costs.as_mut_slice().split_at_mut(y * w);
        let prev = &above[(y - 1) * w..];
        for (x, cell) in below[..w].iter_mut().enumerate() {
            let (lo, hi) = neighbours(x as u32, width);
            *cell += cheapest(prev, lo, hi).1;
        }
    }
    Ok(costs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(width: u32, height: u32, data: &[f64]) -> EnergyMap {
        EnergyMap::from_vec(width, height, data.to_vec()).unwrap()
    }

    #[test]
    fn first_row_is_the_energy() {
        let energy = map(3, 2, &[4.0, 1.0, 7.0, 0.0, 0.0, 0.0]);
        let costs = compute_costs(&energy).unwrap();
        assert_eq!(costs.row(0), energy.row(0));
    }

    #[test]
    fn each_cell_adds_the_cheapest_parent() {
        #[rustfmt::skip]
        let energy = map(5, 4, &[
            9.0, 9.0, 0.0, 9.0, 9.0,
            9.0, 1.0, 9.0, 8.0, 9.0,
            9.0, 9.0, 9.0, 9.0, 0.0,
            9.0, 9.0, 9.0, 0.0, 9.0,
        ]);
        let costs = compute_costs(&energy).unwrap();
        assert_eq!(costs.row(1), &[18.0, 1.0, 9.0, 8.0, 18.0]);
        assert_eq!(costs.row(2), &[10.0, 10.0, 10.0, 17.0, 8.0]);
        assert_eq!(costs.row(3), &[19.0, 19.0, 19.0, 8.0, 17.0]);
    }

    #[test]
    fn single_column_accumulates_straight_down() {
        let energy = map(1, 3, &[1.0, 2.0, 3.0]);
        let costs = compute_costs(&energy).unwrap();
        assert_eq!(costs.as_slice(), &[1.0, 3.0, 6.0]);
    }

    #[test]
    fn consumed_pixels_poison_their_descendants() {
        let energy = map(2, 2, &[f64::INFINITY, f64::INFINITY, 1.0, 1.0]);
        let costs = compute_costs(&energy).unwrap();
        assert!(costs.row(1).iter().all(|c| c.is_infinite()));
    }

    #[test]
    fn ties_go_left() {
        assert_eq!(cheapest(&[3.0, 1.0, 1.0, 1.0], 0, 3), (1, 1.0));
        assert_eq!(cheapest(&[2.0, 2.0], 0, 1), (0, 2.0));
        assert_eq!(neighbours(0, 4), (0, 1));
        assert_eq!(neighbours(3, 4), (2, 3));
        assert_eq!(neighbours(0, 1), (0, 0));
    }
}
