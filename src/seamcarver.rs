// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The carving surface
//!
//! `SeamCarver` owns an image and applies seam masks to it: removing
//! the selected pixels, or painting over them.  Horizontal seams are
//! handled by transposing the image, carving vertically, and
//! transposing back; there is exactly one seam algorithm.

use crate::batch::BatchPlanner;
use crate::calculator::{compact, SeamCalculator, SeamSelection};
use crate::energy::{check_image, EnergyMethod};
use crate::error::CarveError;
use crate::flipper::transpose;
use crate::twodmap::{EnergyMap, SeamMask};
use image::{Rgb, RgbImage};
use itertools::iproduct;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Red, the default colour for highlighted seams.
pub const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Which way a seam runs.  A vertical seam runs top to bottom and
/// removing it makes the image narrower; a horizontal seam runs left to
/// right and removing it makes the image shorter.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
    Vertical,
    Horizontal,
}

impl FromStr for Direction {
    type Err = CarveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertical" | "v" => Ok(Direction::Vertical),
            "horizontal" | "h" => Ok(Direction::Horizontal),
            other => Err(CarveError::invalid(format!(
                "unknown seam direction '{}', expected vertical or horizontal",
                other
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Direction::Vertical => "vertical",
            Direction::Horizontal => "horizontal",
        })
    }
}

/// A struct for holding the image to be carved.
pub struct SeamCarver {
    image: RgbImage,
    calculator: SeamCalculator,
    verbose: bool,
}

impl SeamCarver {
    /// Creates a new SeamCarver with an image to be carved, using the
    /// gradient energy and the default batch schedule.
    pub fn new(image: RgbImage) -> Result<Self, CarveError> {
        check_image(&image)?;
        Ok(SeamCarver {
            image,
            calculator: SeamCalculator::default(),
            verbose: false,
        })
    }

    /// Build the image from rows of RGB triples.  Every row must have
    /// the same, non-zero, length.
    pub fn from_rows(rows: &[Vec<[u8; 3]>]) -> Result<Self, CarveError> {
        let width = match rows.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(CarveError::invalid("image has no pixels")),
        };
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(CarveError::invalid(format!(
                "row {} has {} pixels, expected {}",
                y,
                row.len(),
                width
            )));
        }
        let data: Vec<u8> = rows.iter().flatten().flat_map(|p| p.iter().copied()).collect();
        let image = RgbImage::from_raw(width as u32, rows.len() as u32, data)
            .ok_or_else(|| CarveError::invalid("pixel rows do not fill the image"))?;
        SeamCarver::new(image)
    }

    /// Load any format the image crate can decode, as 8-bit RGB.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CarveError> {
        let image = image::open(path.as_ref())?.to_rgb8();
        debug!(path = %path.as_ref().display(), width = image.width(), height = image.height(), "image loaded");
        SeamCarver::new(image)
    }

    pub fn with_method<M: EnergyMethod + 'static>(self, method: M) -> Self {
        self.map_calculator(|calculator| calculator.with_method(method))
    }

    pub fn with_calculator(mut self, calculator: SeamCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_planner<B: BatchPlanner + 'static>(self, planner: B) -> Self {
        self.map_calculator(|calculator| calculator.with_planner(planner))
    }

    fn map_calculator<F: FnOnce(SeamCalculator) -> SeamCalculator>(self, f: F) -> Self {
        SeamCarver {
            calculator: f(self.calculator),
            ..self
        }
    }

    /// Report every carving operation at info level instead of debug.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// The current image's energy, as the configured method sees it.
    pub fn energy_map(&self) -> Result<EnergyMap, CarveError> {
        self.calculator.method().energy(&self.image)
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CarveError> {
        self.image.save(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "image saved");
        Ok(())
    }

    fn oriented(&self, direction: Direction) -> Cow<RgbImage> {
        match direction {
            Direction::Vertical => Cow::Borrowed(&self.image),
            Direction::Horizontal => Cow::Owned(transpose(&self.image)),
        }
    }

    fn select(&self, direction: Direction, count: u32) -> Result<(Cow<RgbImage>, SeamSelection), CarveError> {
        let oriented = self.oriented(direction);
        let selection = self.calculator.find_seams(&oriented, count)?;
        Ok((oriented, selection))
    }

    fn report(&self, operation: &str, direction: Direction, selection: &SeamSelection) {
        let (width, height) = self.image.dimensions();
        if self.verbose {
            info!(
                operation,
                %direction,
                requested = selection.requested,
                achieved = selection.achieved,
                batches = selection.batches,
                width,
                height,
                "carving finished"
            );
        } else {
            debug!(
                operation,
                %direction,
                requested = selection.requested,
                achieved = selection.achieved,
                width,
                height,
                "carving finished"
            );
        }
    }

    /// Remove `count` seams running in `direction`.
    ///
    /// If the engine runs out of seams first, the seams it did find are
    /// still removed, and `CarveError::SeamsExhausted` reports how many
    /// that was.
    pub fn remove(&mut self, direction: Direction, count: u32) -> Result<u32, CarveError> {
        if count == 0 {
            return Ok(0);
        }
        let (oriented, selection) = self.select(direction, count)?;
        let carved = compact(&oriented, &selection.mask, selection.achieved)?;
        drop(oriented);
        self.image = match direction {
            Direction::Vertical => carved,
            Direction::Horizontal => transpose(&carved),
        };
        self.report("remove", direction, &selection);
        selection.into_result().map(|s| s.achieved)
    }

    /// Paint `count` seams running in `direction` with `color`, leaving
    /// the image's size alone.  Exhaustion is reported as in `remove`,
    /// after painting whatever was found.
    pub fn highlight(&mut self, direction: Direction, count: u32, color: Rgb<u8>) -> Result<u32, CarveError> {
        if count == 0 {
            return Ok(0);
        }
        let (oriented, selection) = self.select(direction, count)?;
        let mut painted = oriented.into_owned();
        paint(&mut painted, &selection.mask, color);
        self.image = match direction {
            Direction::Vertical => painted,
            Direction::Horizontal => transpose(&painted),
        };
        self.report("highlight", direction, &selection);
        selection.into_result().map(|s| s.achieved)
    }

    /// Carve the image down to `height` x `width`: vertical seams
    /// first, then horizontal ones.  Only shrinking is supported, and
    /// neither dimension may reach zero.
    pub fn resize(&mut self, height: u32, width: u32) -> Result<(), CarveError> {
        let (current_width, current_height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(CarveError::unsupported(format!(
                "cannot carve a {}x{} image down to {}x{}",
                current_width, current_height, width, height
            )));
        }
        if width > current_width || height > current_height {
            return Err(CarveError::unsupported(format!(
                "cannot resize a {}x{} image to {}x{}: seam carving only shrinks",
                current_width, current_height, width, height
            )));
        }
        self.remove(Direction::Vertical, current_width - width)?;
        self.remove(Direction::Horizontal, current_height - height)?;
        Ok(())
    }
}

fn paint(image: &mut RgbImage, mask: &SeamMask, color: Rgb<u8>) {
    let (width, height) = image.dimensions();
    for (y, x) in iproduct!(0..height, 0..width) {
        if mask[(x, y)] {
            image.put_pixel(x, y, color);
        }
    }
}
