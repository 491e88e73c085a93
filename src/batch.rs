// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Batch planning
//!
//! Recomputing the energy after every seam is accurate but slow.
//! Tracing many seams against one energy map is fast, but the map goes
//! stale: seams start to bunch up next to each other, since marking a
//! seam consumed only blocks its exact pixels.  A planner decides how
//! many seams each energy computation has to pay for.

use crate::error::CarveError;

/// Decides how many seams to trace per energy computation.  The answer
/// is a heuristic; the engine is correct for any positive value.
pub trait BatchPlanner: Send + Sync {
    fn batch_size(&self, width: u32) -> u32;
}

impl<B: BatchPlanner + ?Sized> BatchPlanner for Box<B> {
    fn batch_size(&self, width: u32) -> u32 {
        (**self).batch_size(width)
    }
}

/// (minimum width, divisor) steps, widest first.  Wider images can
/// afford a larger share of their width per batch.
pub const DEFAULT_STEPS: [(u32, u32); 5] = [
    (1000, 8), // 12.5% per batch
    (500, 10), // 10.0%
    (100, 12), // ~8.3%
    (20, 15),  // ~6.7%
    (0, 20),   //  5.0%
];

/// A descending step table: the first step whose minimum width the
/// image reaches gives the divisor, and the batch is `width / divisor`,
/// never less than one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSchedule {
    steps: Vec<(u32, u32)>,
}

impl StepSchedule {
    /// Build a schedule from (minimum width, divisor) pairs in any
    /// order.  Divisors must be positive.
    pub fn new(mut steps: Vec<(u32, u32)>) -> Result<Self, CarveError> {
        if let Some(&(min_width, _)) = steps.iter().find(|(_, divisor)| *divisor == 0) {
            return Err(CarveError::invalid(format!(
                "batch step for widths >= {} has a zero divisor",
                min_width
            )));
        }
        steps.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(StepSchedule { steps })
    }

    pub fn steps(&self) -> &[(u32, u32)] {
        &self.steps
    }
}

impl Default for StepSchedule {
    fn default() -> Self {
        StepSchedule {
            steps: DEFAULT_STEPS.to_vec(),
        }
    }
}

impl BatchPlanner for StepSchedule {
    fn batch_size(&self, width: u32) -> u32 {
        self.steps
            .iter()
            .find(|(min_width, _)| width >= *min_width)
            .map_or(1, |(_, divisor)| (width / divisor).max(1))
    }
}

/// The same batch size for every width.  `FixedBatch(1)` recomputes the
/// energy after every single seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBatch(pub u32);

impl BatchPlanner for FixedBatch {
    fn batch_size(&self, _width: u32) -> u32 {
        self.0.max(1)
    }
}
