// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Laplacian operator energy
//!
//! A second-derivative measure: the four-neighbour [Laplacian] of each
//! channel.  Flat areas and smooth ramps are cheap; points, lines and
//! corners are expensive.
//!
//! [Laplacian]: https://en.wikipedia.org/wiki/Discrete_Laplace_operator

use crate::energy::{convolve3, energy_from_kernel, EnergyMethod};
use crate::error::CarveError;
use crate::twodmap::EnergyMap;
use image::RgbImage;

const LAPLACIAN: [[i32; 3]; 3] = [[0, -1, 0], [-1, 4, -1], [0, -1, 0]];

// Same reasoning as the Sobel scale: a channel can swing by 4 * 255.
const LAPLACIAN_SCALE: f64 = 0.25;

/// Energy from the 3x3 four-neighbour Laplacian.
#[derive(Debug, Default, Clone, Copy)]
pub struct LaplacianEnergy;

#[inline]
fn laplacian_at(image: &RgbImage, x: u32, y: u32) -> f64 {
    let sum: f64 = convolve3(image, x, y, &LAPLACIAN)
        .iter()
        .map(|&l| {
            let l = f64::from(l) * LAPLACIAN_SCALE;
            l * l
        })
        .sum();
    sum.sqrt()
}

impl EnergyMethod for LaplacianEnergy {
    fn energy(&self, image: &RgbImage) -> Result<EnergyMap, CarveError> {
        energy_from_kernel(image, laplacian_at)
    }

    fn name(&self) -> &'static str {
        "laplacian"
    }
}
