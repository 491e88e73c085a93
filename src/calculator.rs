// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The seam calculator
//!
//! Finds `n` vertical seams in an image and reports them as a single
//! boolean mask over the original pixels.  Seams are removed from a
//! private working copy as they are found, in batches, and the
//! original index of every surviving pixel rides along in a parallel
//! array.  Whatever is not in that array at the end was carved away.

use crate::batch::{BatchPlanner, StepSchedule};
use crate::costs::compute_costs;
use crate::energy::{check_image, EnergyMethod};
use crate::error::CarveError;
use crate::gradient::GradientEnergy;
use crate::tracer::trace_seam;
use crate::twodmap::SeamMask;
use image::RgbImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

/// The outcome of a seam search.
#[derive(Debug, Clone, PartialEq)]
pub struct SeamSelection {
    /// `true` for every pixel, in original coordinates, that belongs to
    /// one of the selected seams.
    pub mask: SeamMask,
    pub requested: u32,
    pub achieved: u32,
    /// How many energy computations the search took.
    pub batches: u32,
}

impl SeamSelection {
    pub fn is_complete(&self) -> bool {
        self.achieved == self.requested
    }

    /// Turn a short count into `CarveError::SeamsExhausted`.
    pub fn into_result(self) -> Result<Self, CarveError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(CarveError::SeamsExhausted {
                achieved: self.achieved,
                requested: self.requested,
            })
        }
    }
}

/// Drives the energy, cost and trace cycle.  Only vertical seams are
/// supported here; transpose the image for horizontal ones.
pub struct SeamCalculator {
    method: Box<dyn EnergyMethod>,
    planner: Box<dyn BatchPlanner>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for SeamCalculator {
    fn default() -> Self {
        SeamCalculator::new(GradientEnergy)
    }
}

impl SeamCalculator {
    pub fn new<M: EnergyMethod + 'static>(method: M) -> Self {
        SeamCalculator {
            method: Box::new(method),
            planner: Box::new(StepSchedule::default()),
            cancel: None,
        }
    }

    /// Swap the energy method, keeping the planner and cancel flag.
    pub fn with_method<M: EnergyMethod + 'static>(mut self, method: M) -> Self {
        self.method = Box::new(method);
        self
    }

    pub fn with_planner<B: BatchPlanner + 'static>(mut self, planner: B) -> Self {
        self.planner = Box::new(planner);
        self
    }

    /// Install a flag that aborts the search when raised.  It is
    /// checked once before every seam trace.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn method(&self) -> &dyn EnergyMethod {
        &*self.method
    }

    fn check_cancelled(&self, achieved: u32) -> Result<(), CarveError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(CarveError::Cancelled { achieved }),
            _ => Ok(()),
        }
    }

    /// Select up to `count` vertical seams of `image`.
    ///
    /// The image itself is never modified.  Running out of seams is not
    /// an error at this level: the selection simply reports fewer seams
    /// achieved than requested.  The image always keeps at least one
    /// column, so asking for `width` seams or more comes up short.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height(), method = self.method.name()))]
    pub fn find_seams(&self, image: &RgbImage, count: u32) -> Result<SeamSelection, CarveError> {
        check_image(image)?;
        let (width, height) = image.dimensions();

        let mut working = copy_image(image)?;
        let cells = width as usize * height as usize;
        let mut kept: Vec<usize> = reserve(cells, width, height)?;
        kept.extend(0..cells);
        let mut remaining = count;
        let mut achieved = 0;
        let mut batches = 0;

        while remaining > 0 {
            let current_width = working.width();
            let budget = self
                .planner
                .batch_size(current_width)
                .max(1)
                .min(remaining)
                .min(current_width - 1);
            if budget == 0 {
                break;
            }

            let mut energy = self.method.energy(&working)?;
            let mut batch = SeamMask::filled(current_width, height, false)?;
            let mut traced = 0;
            while traced < budget {
                self.check_cancelled(achieved + traced)?;
                let costs = compute_costs(&energy)?;
                match trace_seam(&mut energy, &costs) {
                    Some(seam) => {
                        seam.mark(&mut batch);
                        traced += 1;
                    }
                    None => break,
                }
            }
            batches += 1;
            debug!(batch = batches, width = current_width, budget, traced, "batch done");
            if traced == 0 {
                break;
            }

            working = compact(&working, &batch, traced)?;
            // retain visits in order, so the mask lines up with `kept`.
            let mut removed = batch.as_slice().iter();
            kept.retain(|_| !removed.next().copied().unwrap_or(false));
            remaining -= traced;
            achieved += traced;
        }

        let mut mask = SeamMask::filled(width, height, true)?;
        {
            let cells = mask.as_mut_slice();
            for index in kept {
                cells[index] = false;
            }
        }
        debug!(requested = count, achieved, batches, "seam search finished");
        Ok(SeamSelection {
            mask,
            requested: count,
            achieved,
            batches,
        })
    }
}

/// An empty vector with room for `len` items, or `ResourceExhaustion`
/// naming the image being worked on.
fn reserve<T>(len: usize, width: u32, height: u32) -> Result<Vec<T>, CarveError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| CarveError::ResourceExhaustion { width, height })?;
    Ok(data)
}

fn copy_image(image: &RgbImage) -> Result<RgbImage, CarveError> {
    let (width, height) = image.dimensions();
    let mut data = reserve(image.as_raw().len(), width, height)?;
    data.extend_from_slice(image.as_raw());
    RgbImage::from_raw(width, height, data).ok_or(CarveError::ResourceExhaustion { width, height })
}

/// Copy every pixel not selected in `removed` into an image `seams`
/// columns narrower.  Each row of the mask selects exactly `seams`
/// pixels.
pub(crate) fn compact(image: &RgbImage, removed: &SeamMask, seams: u32) -> Result<RgbImage, CarveError> {
    let (width, height) = image.dimensions();
    let narrower = width - seams;
    let row_len = narrower as usize * 3;
    let uneven = || CarveError::invalid(format!("seam mask does not remove {} pixels from every row", seams));
    let mut data = reserve(row_len * height as usize, width, height)?;
    for y in 0..height {
        let start = data.len();
        for (x, &gone) in removed.row(y).iter().enumerate() {
            if !gone {
                data.extend_from_slice(&image.get_pixel(x as u32, y).0);
            }
        }
        if data.len() - start != row_len {
            return Err(uneven());
        }
    }
    RgbImage::from_raw(narrower, height, data).ok_or_else(uneven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FixedBatch;
    use crate::seam::Seam;
    use crate::twodmap::EnergyMap;
    use image::Rgb;
    use std::sync::atomic::AtomicU32;

    fn noisy(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = (x * 7919 + y * 104_729 + x * y * 31) % 251;
            Rgb([v as u8, (v * 3 % 256) as u8, (255 - v) as u8])
        })
    }

    fn row_counts(mask: &SeamMask) -> Vec<usize> {
        (0..mask.height)
            .map(|y| mask.row(y).iter().filter(|s| **s).count())
            .collect()
    }

    #[test]
    fn single_seam_is_one_pixel_per_row() {
        let image = noisy(12, 9);
        let selection = SeamCalculator::default().find_seams(&image, 1).unwrap();
        assert_eq!(selection.achieved, 1);
        assert!(selection.is_complete());
        let seam = Seam::from_mask(&selection.mask).unwrap();
        assert_eq!(seam.len(), 9);
        assert!(seam.is_connected());
    }

    #[test]
    fn many_seams_select_that_many_pixels_per_row() {
        let image = noisy(40, 10);
        let selection = SeamCalculator::default().find_seams(&image, 13).unwrap();
        assert_eq!(selection.achieved, 13);
        assert_eq!(selection.mask.dimensions(), (40, 10));
        assert!(row_counts(&selection.mask).iter().all(|&n| n == 13));
        assert!(selection.batches > 1);
    }

    #[test]
    fn zero_seams_selects_nothing() {
        let image = noisy(5, 5);
        let selection = SeamCalculator::default().find_seams(&image, 0).unwrap();
        assert_eq!(selection.achieved, 0);
        assert_eq!(selection.batches, 0);
        assert_eq!(selection.mask.count_selected(), 0);
    }

    #[test]
    fn asking_for_the_whole_width_comes_up_short() {
        let image = noisy(6, 4);
        let selection = SeamCalculator::default().find_seams(&image, 6).unwrap();
        assert_eq!(selection.achieved, 5);
        assert!(!selection.is_complete());
        assert!(row_counts(&selection.mask).iter().all(|&n| n == 5));
        match selection.into_result() {
            Err(CarveError::SeamsExhausted { achieved, requested }) => {
                assert_eq!((achieved, requested), (5, 6))
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn one_column_image_has_no_seams_to_give() {
        let image = noisy(1, 7);
        let selection = SeamCalculator::default().find_seams(&image, 1).unwrap();
        assert_eq!(selection.achieved, 0);
        assert_eq!(selection.mask.count_selected(), 0);
    }

    #[test]
    fn results_are_deterministic() {
        let image = noisy(33, 21);
        let calculator = SeamCalculator::default();
        let first = calculator.find_seams(&image, 9).unwrap();
        let second = calculator.find_seams(&image, 9).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn caller_image_is_untouched() {
        let image = noisy(16, 8);
        let copy = image.clone();
        SeamCalculator::default().find_seams(&image, 4).unwrap();
        assert_eq!(image, copy);
    }

    #[test]
    fn planner_controls_batches() {
        let image = noisy(30, 6);
        let per_seam = SeamCalculator::default()
            .with_planner(FixedBatch(1))
            .find_seams(&image, 4)
            .unwrap();
        assert_eq!(per_seam.batches, 4);
        let all_at_once = SeamCalculator::default()
            .with_planner(FixedBatch(4))
            .find_seams(&image, 4)
            .unwrap();
        assert_eq!(all_at_once.batches, 1);
        assert_eq!(all_at_once.achieved, 4);
    }

    #[test]
    fn low_energy_column_goes_first() {
        // A flat stripe down column 3 of an otherwise busy image.
        let image = RgbImage::from_fn(8, 6, |x, y| {
            if (2..=4).contains(&x) {
                Rgb([50, 50, 50])
            } else if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let selection = SeamCalculator::default().find_seams(&image, 1).unwrap();
        let seam = Seam::from_mask(&selection.mask).unwrap();
        assert!(seam.columns()[1..5].iter().all(|&x| x == 3));
    }

    struct Saturated;

    impl EnergyMethod for Saturated {
        fn energy(&self, image: &RgbImage) -> Result<EnergyMap, CarveError> {
            EnergyMap::filled(image.width(), image.height(), f64::INFINITY)
        }

        fn name(&self) -> &'static str {
            "saturated"
        }
    }

    #[test]
    fn saturated_energy_exhausts_immediately() {
        let image = noisy(10, 10);
        let selection = SeamCalculator::new(Saturated).find_seams(&image, 3).unwrap();
        assert_eq!(selection.achieved, 0);
        assert_eq!(selection.requested, 3);
        assert_eq!(selection.batches, 1);
    }

    #[test]
    fn raised_flag_cancels() {
        let flag = Arc::new(AtomicBool::new(true));
        let image = noisy(10, 10);
        let result = SeamCalculator::default()
            .with_cancel_flag(flag)
            .find_seams(&image, 2);
        match result {
            Err(CarveError::Cancelled { achieved }) => assert_eq!(achieved, 0),
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    // Sets the flag the second time it is asked for a batch size, so the
    // search is cancelled after one full batch.
    struct CancelAfterFirstBatch {
        flag: Arc<AtomicBool>,
        calls: AtomicU32,
    }

    impl BatchPlanner for CancelAfterFirstBatch {
        fn batch_size(&self, _width: u32) -> u32 {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                self.flag.store(true, Ordering::SeqCst);
            }
            2
        }
    }

    #[test]
    fn cancellation_mid_search_reports_traced_seams() {
        let flag = Arc::new(AtomicBool::new(false));
        let planner = CancelAfterFirstBatch {
            flag: flag.clone(),
            calls: AtomicU32::new(0),
        };
        let result = SeamCalculator::default()
            .with_planner(planner)
            .with_cancel_flag(flag)
            .find_seams(&noisy(20, 8), 6);
        match result {
            Err(CarveError::Cancelled { achieved }) => assert_eq!(achieved, 2),
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[test]
    fn with_method_keeps_planner() {
        let image = noisy(30, 6);
        let selection = SeamCalculator::default()
            .with_planner(FixedBatch(1))
            .with_method(crate::sobel::SobelEnergy)
            .find_seams(&image, 4)
            .unwrap();
        assert_eq!(selection.batches, 4);
        assert_eq!(selection.achieved, 4);
    }

    #[test]
    fn oversized_reservation_is_resource_exhaustion() {
        match reserve::<usize>(usize::MAX, 7, 9) {
            Err(CarveError::ResourceExhaustion { width, height }) => {
                assert_eq!((width, height), (7, 9))
            }
            other => panic!("expected resource exhaustion, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn compact_rejects_uneven_mask() {
        let image = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
        let mut removed = SeamMask::filled(3, 2, false).unwrap();
        removed[(1, 0)] = true;
        assert!(compact(&image, &removed, 1).is_err());
    }

    #[test]
    fn compact_drops_selected_pixels() {
        let image = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 0]));
        let mut removed = SeamMask::filled(3, 2, false).unwrap();
        removed[(1, 0)] = true;
        removed[(0, 1)] = true;
        let out = compact(&image, &removed, 1).unwrap();
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(1, 0), &Rgb([2, 0, 0]));
        assert_eq!(out.get_pixel(0, 1), &Rgb([1, 1, 0]));
    }
}
