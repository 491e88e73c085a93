// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Carving errors
//!
//! Every way a carving request can fail.  The kinds are kept distinct
//! because the command line front end picks its exit status from them.

use failure::Fail;

/// The error type for every fallible operation in this crate.
#[derive(Debug, Fail)]
pub enum CarveError {
    /// The image (or a table derived from it) has an empty dimension,
    /// or its rows are not all the same length.
    #[fail(display = "invalid input image: {}", reason)]
    InvalidInput { reason: String },

    /// The requested target would enlarge the image, or shrink it to
    /// nothing.  Only shrinking is supported.
    #[fail(display = "unsupported target: {}", reason)]
    UnsupportedTarget { reason: String },

    /// No further finite-cost seam could be found.  Whatever was
    /// achieved before the engine ran dry is reported alongside.
    #[fail(display = "seams exhausted: carved {} of {} requested seams", achieved, requested)]
    SeamsExhausted { achieved: u32, requested: u32 },

    /// A working table could not be allocated.
    #[fail(display = "not enough memory for a {}x{} working table", width, height)]
    ResourceExhaustion { width: u32, height: u32 },

    /// The caller raised the cancellation flag between two seam traces.
    #[fail(display = "carving cancelled after {} seams", achieved)]
    Cancelled { achieved: u32 },

    #[fail(display = "image codec error: {}", _0)]
    Image(#[cause] image::ImageError),

    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] std::io::Error),
}

impl CarveError {
    pub(crate) fn invalid<S: Into<String>>(reason: S) -> Self {
        CarveError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported<S: Into<String>>(reason: S) -> Self {
        CarveError::UnsupportedTarget {
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for CarveError {
    fn from(err: image::ImageError) -> Self {
        CarveError::Image(err)
    }
}

impl From<std::io::Error> for CarveError {
    fn from(err: std::io::Error) -> Self {
        CarveError::Io(err)
    }
}
