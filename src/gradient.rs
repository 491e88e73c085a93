// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gradient magnitude energy
//!
//! The default method, and the classic one from Avidan & Shamir
//! (2007).  Takes the channels (R,G,B) of the pixels on either side of
//! the target, horizontally and vertically, squares the differences
//! and sums them all up:
//!
//! ```text
//!        |Δx|² = (Δrx)²+(Δgx)²+(Δbx)²
//!        |Δy|² = (Δry)²+(Δgy)²+(Δby)²
//!       e(x,y) = √(|Δx|²+|Δy|²)
//! ```

use crate::energy::{delta_squared, energy_from_kernel, EnergyMethod};
use crate::error::CarveError;
use crate::twodmap::EnergyMap;
use image::RgbImage;

/// Energy from the central difference of the four orthogonal
/// neighbours.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradientEnergy;

#[inline]
fn gradient_at(image: &RgbImage, x: u32, y: u32) -> f64 {
    let dx = delta_squared(image.get_pixel(x + 1, y), image.get_pixel(x - 1, y));
    let dy = delta_squared(image.get_pixel(x, y + 1), image.get_pixel(x, y - 1));
    (dx + dy).sqrt()
}

impl EnergyMethod for GradientEnergy {
    fn energy(&self, image: &RgbImage) -> Result<EnergyMap, CarveError> {
        energy_from_kernel(image, gradient_at)
    }

    fn name(&self) -> &'static str {
        "gradient"
    }
}
