// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sobel operator energy
//!
//! The horizontal and vertical [Sobel] kernels are applied to each
//! channel, and the energy is the magnitude of all six responses.
//!
//! [Sobel]: https://en.wikipedia.org/wiki/Sobel_operator

use crate::energy::{convolve3, energy_from_kernel, EnergyMethod};
use crate::error::CarveError;
use crate::twodmap::EnergyMap;
use image::RgbImage;

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

// The kernels weigh four pixels on each side, so a single channel can
// swing by 4 * 255.  Scaling the response by a quarter puts the
// magnitude on the same footing as the gradient method and keeps it
// under the border energy.
const SOBEL_SCALE: f64 = 0.25;

/// Energy from the 3x3 Sobel operator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SobelEnergy;

#[inline]
fn sobel_at(image: &RgbImage, x: u32, y: u32) -> f64 {
    let gx = convolve3(image, x, y, &SOBEL_X);
    let gy = convolve3(image, x, y, &SOBEL_Y);
    let sum: f64 = gx
        .iter()
        .chain(gy.iter())
        .map(|&g| {
            let g = f64::from(g) * SOBEL_SCALE;
            g * g
        })
        .sum();
    sum.sqrt()
}

impl EnergyMethod for SobelEnergy {
    fn energy(&self, image: &RgbImage) -> Result<EnergyMap, CarveError> {
        energy_from_kernel(image, sobel_at)
    }

    fn name(&self) -> &'static str {
        "sobel"
    }
}
