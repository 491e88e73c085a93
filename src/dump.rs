// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render an energy map as a greyscale image, for eyeballing what the
//! carver thinks is important.

use crate::twodmap::EnergyMap;
use image::{GrayImage, Luma};
use itertools::iproduct;

/// Scale every finite energy against the largest finite *interior*
/// energy, clamping to white.  The border constant would otherwise
/// flatten everything else to black.  Consumed (infinite) pixels are
/// drawn white.
pub fn energy_to_image(energy: &EnergyMap) -> GrayImage {
    let (width, height) = energy.dimensions();
    let interior = |x: u32, y: u32| x > 0 && y > 0 && x + 1 < width && y + 1 < height;
    let factor = iproduct!(0..height, 0..width)
        .filter(|&(y, x)| interior(x, y))
        .map(|(y, x)| energy[(x, y)])
        .filter(|e| e.is_finite())
        .fold(0.0f64, f64::max);

    GrayImage::from_fn(width, height, |x, y| {
        let e = energy[(x, y)];
        let level = if !e.is_finite() || (factor == 0.0 && e > 0.0) {
            255.0
        } else if factor == 0.0 {
            0.0
        } else {
            (e * 255.0 / factor).min(255.0)
        };
        Luma([level.round() as u8])
    })
}
