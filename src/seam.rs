// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A single top-to-bottom seam.

use crate::error::CarveError;
use crate::twodmap::SeamMask;

/// The list of x-coordinates that, when mapped with the range
/// (0..height), give the XY coordinates for each pixel in the seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam(Vec<u32>);

impl Seam {
    /// Wrap a column sequence, checking that consecutive rows are no
    /// more than one column apart.
    pub fn new(columns: Vec<u32>) -> Result<Self, CarveError> {
        let seam = Seam(columns);
        if seam.0.is_empty() {
            return Err(CarveError::invalid("a seam needs at least one row"));
        }
        if !seam.is_connected() {
            return Err(CarveError::invalid(format!(
                "seam {:?} jumps more than one column between rows",
                seam.0
            )));
        }
        Ok(seam)
    }

    // Only the tracer builds seams this way, and it walks neighbours.
    pub(crate) fn from_traced(columns: Vec<u32>) -> Self {
        debug_assert!(Seam(columns.clone()).is_connected());
        Seam(columns)
    }

    pub fn columns(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every pair of adjacent rows is at most one column apart.
    pub fn is_connected(&self) -> bool {
        self.0
            .windows(2)
            .all(|pair| (i64::from(pair[0]) - i64::from(pair[1])).abs() <= 1)
    }

    /// Set this seam's pixels in an existing mask.
    pub fn mark(&self, mask: &mut SeamMask) {
        for (y, &x) in self.0.iter().enumerate() {
            mask[(x, y as u32)] = true;
        }
    }

    /// Render the seam as a `width`-wide mask with one selected pixel
    /// per row.
    pub fn to_mask(&self, width: u32) -> Result<SeamMask, CarveError> {
        if let Some(&x) = self.0.iter().find(|&&x| x >= width) {
            return Err(CarveError::invalid(format!(
                "seam column {} lies outside a {}-wide image",
                x, width
            )));
        }
        let mut mask = SeamMask::filled(width, self.0.len() as u32, false)?;
        self.mark(&mut mask);
        Ok(mask)
    }

    /// Recover a seam from a mask holding exactly one selected pixel per
    /// row.
    pub fn from_mask(mask: &SeamMask) -> Result<Self, CarveError> {
        let columns = (0..mask.height)
            .map(|y| {
                let row = mask.row(y);
                let mut selected = row.iter().enumerate().filter(|(_, s)| **s);
                match (selected.next(), selected.next()) {
                    (Some((x, _)), None) => Ok(x as u32),
                    _ => Err(CarveError::invalid(format!(
                        "row {} of the mask does not select exactly one pixel",
                        y
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Seam::new(columns)
    }
}
