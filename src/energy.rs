// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The energy of a pixel is its importance: seams run through the
//! cheapest pixels, so anything with a high energy survives carving.
//! How the energy is computed is a strategy, the `EnergyMethod`; the
//! rest of the engine only ever sees the map it produces.
//!
//! Every method shares the same border rule.  The kernels need a
//! one-pixel margin, so the outermost rows and columns are given the
//! fixed `BORDER_ENERGY` instead of a computed value.  Without that the
//! edges would look artificially flat and the carver would eat them
//! first.

use crate::error::CarveError;
use crate::gradient::GradientEnergy;
use crate::laplacian::LaplacianEnergy;
use crate::sobel::SobelEnergy;
use crate::twodmap::EnergyMap;
use image::{Rgb, RgbImage};
use std::fmt;
use std::str::FromStr;

/// Energy assigned to every pixel on the edge of the image.  It is
/// larger than anything the shipped methods produce for an interior
/// pixel, so borders resist carving without becoming uncarvable.
pub const BORDER_ENERGY: f64 = 1000.0;

/// A strategy for turning an image into an energy map.
///
/// Implementations must be pure: the same image always yields the same
/// map, nothing is remembered between calls, and the image is never
/// modified.  The returned map has the image's dimensions and every
/// border cell holds `BORDER_ENERGY`.
pub trait EnergyMethod: Send + Sync {
    fn energy(&self, image: &RgbImage) -> Result<EnergyMap, CarveError>;

    /// A short, human-readable name for logging.
    fn name(&self) -> &'static str;
}

impl<M: EnergyMethod + ?Sized> EnergyMethod for Box<M> {
    fn energy(&self, image: &RgbImage) -> Result<EnergyMap, CarveError> {
        (**self).energy(image)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The shipped energy methods, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyKind {
    Gradient,
    Sobel,
    Laplacian,
}

impl EnergyKind {
    pub const NAMES: [&'static str; 3] = ["gradient", "sobel", "laplacian"];

    pub fn method(self) -> Box<dyn EnergyMethod> {
        match self {
            EnergyKind::Gradient => Box::new(GradientEnergy),
            EnergyKind::Sobel => Box::new(SobelEnergy),
            EnergyKind::Laplacian => Box::new(LaplacianEnergy),
        }
    }
}

impl Default for EnergyKind {
    fn default() -> Self {
        EnergyKind::Gradient
    }
}

impl FromStr for EnergyKind {
    type Err = CarveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gradient" => Ok(EnergyKind::Gradient),
            "sobel" => Ok(EnergyKind::Sobel),
            "laplacian" => Ok(EnergyKind::Laplacian),
            other => Err(CarveError::invalid(format!(
                "unknown energy method '{}', expected one of {}",
                other,
                EnergyKind::NAMES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for EnergyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            EnergyKind::Gradient => "gradient",
            EnergyKind::Sobel => "sobel",
            EnergyKind::Laplacian => "laplacian",
        })
    }
}

/// Reject images the engine cannot work with.
pub fn check_image(image: &RgbImage) -> Result<(), CarveError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(CarveError::invalid(format!(
            "image has an empty dimension ({}x{})",
            width, height
        )));
    }
    Ok(())
}

// (Pixel, Pixel) -> squared colour distance
//
//        |Δ|² = (Δr)²+(Δg)²+(Δb)²
#[inline]
pub(crate) fn delta_squared(p1: &Rgb<u8>, p2: &Rgb<u8>) -> f64 {
    p1.0.iter()
        .zip(p2.0.iter())
        .map(|(&c1, &c2)| {
            let d = f64::from(c1) - f64::from(c2);
            d * d
        })
        .sum()
}

/// Apply a 3x3 kernel centred on (x, y) to each channel separately.
/// The caller guarantees (x, y) is an interior pixel.
#[inline]
pub(crate) fn convolve3(image: &RgbImage, x: u32, y: u32, kernel: &[[i32; 3]; 3]) -> [i32; 3] {
    let mut acc = [0i32; 3];
    for (ky, krow) in kernel.iter().enumerate() {
        for (kx, &weight) in krow.iter().enumerate() {
            if weight == 0 {
                continue;
            }
            let pixel = image.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
            for (sum, &channel) in acc.iter_mut().zip(pixel.0.iter()) {
                *sum += weight * i32::from(channel);
            }
        }
    }
    acc
}

/// Build an energy map whose border is `BORDER_ENERGY` and whose
/// interior is `kernel(image, x, y)`.  This is the shared skeleton of
/// every shipped method.
pub(crate) fn energy_from_kernel<F>(image: &RgbImage, kernel: F) -> Result<EnergyMap, CarveError>
where
    F: Fn(&RgbImage, u32, u32) -> f64 + Sync,
{
    check_image(image)?;
    let (width, height) = image.dimensions();
    let mut emap = EnergyMap::filled(width, height, BORDER_ENERGY)?;
    if width > 2 && height > 2 {
        fill_interior(image, &mut emap, &kernel);
    }
    Ok(emap)
}

fn fill_row<F>(image: &RgbImage, kernel: &F, y: u32, row: &mut [f64])
where
    F: Fn(&RgbImage, u32, u32) -> f64,
{
    if y == 0 || y + 1 >= image.height() {
        return;
    }
    let last = row.len() - 1;
    for (x, cell) in row.iter_mut().enumerate().take(last).skip(1) {
        *cell = kernel(image, x as u32, y);
    }
}

#[cfg(not(feature = "threaded"))]
fn fill_interior<F>(image: &RgbImage, emap: &mut EnergyMap, kernel: &F)
where
    F: Fn(&RgbImage, u32, u32) -> f64 + Sync,
{
    let width = emap.width as usize;
    for (y, row) in emap.as_mut_slice().chunks_mut(width).enumerate() {
        fill_row(image, kernel, y as u32, row);
    }
}

// Divvy the map up into bands of whole rows, one per CPU, and fill each
// band in its own scoped thread.  Every cell depends only on the
// source image, so the result is identical to the serial version.
#[cfg(feature = "threaded")]
fn fill_interior<F>(image: &RgbImage, emap: &mut EnergyMap, kernel: &F)
where
    F: Fn(&RgbImage, u32, u32) -> f64 + Sync,
{
    let width = emap.width as usize;
    let height = emap.height as usize;
    let bands = num_cpus::get().max(1);
    let rows_per_band = (height + bands - 1) / bands;

    let outcome = crossbeam::scope(|scope| {
        for (band, chunk) in emap
            .as_mut_slice()
            .chunks_mut(width * rows_per_band)
            .enumerate()
        {
            scope.spawn(move |_| {
                let first_row = band * rows_per_band;
                for (offset, row) in chunk.chunks_mut(width).enumerate() {
                    fill_row(image, kernel, (first_row + offset) as u32, row);
                }
            });
        }
    });
    if let Err(panic) = outcome {
        std::panic::resume_unwind(panic);
    }
}
