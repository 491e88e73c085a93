// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image resizing by seam carving.
//!
//! ```no_run
//! use seamcarver::{Direction, SeamCarver, SobelEnergy};
//!
//! # fn main() -> Result<(), seamcarver::CarveError> {
//! let mut carver = SeamCarver::open("sample.jpg")?.with_method(SobelEnergy);
//! carver.remove(Direction::Vertical, 40)?;
//! carver.save("narrower.png")?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod calculator;
pub mod costs;
pub mod dump;
pub mod energy;
pub mod error;
pub mod flipper;
pub mod gradient;
pub mod laplacian;
pub mod logging;
pub mod seam;
pub mod seamcarver;
pub mod sobel;
pub mod tracer;
pub mod twodmap;

pub use batch::{BatchPlanner, FixedBatch, StepSchedule};
pub use calculator::{SeamCalculator, SeamSelection};
pub use costs::compute_costs;
pub use dump::energy_to_image;
pub use energy::{EnergyKind, EnergyMethod, BORDER_ENERGY};
pub use error::CarveError;
pub use gradient::GradientEnergy;
pub use laplacian::LaplacianEnergy;
pub use seam::Seam;
pub use seamcarver::{Direction, SeamCarver, HIGHLIGHT_COLOR};
pub use sobel::SobelEnergy;
pub use tracer::trace_seam;
pub use twodmap::{CostTable, EnergyMap, SeamMask, TwoDimensionalMap};
