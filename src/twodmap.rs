// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::CarveError;
use std::ops::{Index, IndexMut};

/// Defines the basic two-dimensional map: An addressable field
/// containing one value per pixel of the image it was derived from: an
/// f64 for the energy map and the cost table, or a bool for the seam
/// masks.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Copy> {
    pub width: u32,
    pub height: u32,
    data: Vec<P>,
}

/// Per-pixel importance.  Higher means "keep this".
pub type EnergyMap = TwoDimensionalMap<f64>;

/// Minimum cumulative energy of any top-to-this-pixel path.
pub type CostTable = TwoDimensionalMap<f64>;

/// One flag per pixel; `true` marks a pixel selected by a seam.
pub type SeamMask = TwoDimensionalMap<bool>;

impl<P: Copy> TwoDimensionalMap<P> {
    /// Define a new map with every cell set to `value`.  The
    /// allocation is fallible: a table too big for the allocator is
    /// reported rather than aborting the process.
    pub fn filled(width: u32, height: u32, value: P) -> Result<Self, CarveError> {
        let exhausted = || CarveError::ResourceExhaustion { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(exhausted)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| exhausted())?;
        data.resize(len, value);
        Ok(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: u32, height: u32, data: Vec<P>) -> Result<Self, CarveError> {
        if data.len() != width as usize * height as usize {
            return Err(CarveError::invalid(format!(
                "{} cells cannot form a {}x{} map",
                data.len(),
                width,
                height
            )));
        }
        Ok(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    /// (width, height), the same order the image crate uses.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.  This
    // particular variant is the same one used in image.rs.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width as usize]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [P] {
        let start = self.get_index(0, y);
        let end = start + self.width as usize;
        &mut self.data[start..end]
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [P] {
        &mut self.data
    }
}

impl SeamMask {
    /// How many cells are selected.
    pub fn count_selected(&self) -> usize {
        self.data.iter().filter(|selected| **selected).count()
    }
}

impl<P: Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}
