// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image dimensional flipper
//!
//! A proxy for the ImageRS `GenericImageView` trait that maps the width
//! to the original height, and vice versa, as well as every x to y and
//! vice versa.
//!
//! The seam engine only knows about vertical seams.  By virtually
//! "flipping" the image across its diagonal, a horizontal seam becomes
//! a vertical one; flip the result back and the carve is done.

use image::{GenericImageView, ImageBuffer, Pixel};

/// A transposed, read-only view of another image.
pub struct Flipper<'a, I: GenericImageView> {
    pub image: &'a I,
}

impl<'a, I: GenericImageView> Flipper<'a, I> {
    pub fn new(image: &'a I) -> Self {
        Flipper { image }
    }
}

impl<'a, I: GenericImageView> GenericImageView for Flipper<'a, I> {
    type Pixel = I::Pixel;
    type InnerImageView = I;

    fn dimensions(&self) -> (u32, u32) {
        let (x, y) = self.image.dimensions();
        (y, x)
    }

    fn bounds(&self) -> (u32, u32, u32, u32) {
        let (x, y, w, h) = self.image.bounds();
        (y, x, h, w)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        self.image.get_pixel(y, x)
    }

    fn inner(&self) -> &Self::InnerImageView {
        self.image
    }
}

/// Materialise the transpose of an image.  Applying it twice gives back
/// the original.
pub fn transpose<I, P>(image: &I) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    let flipped = Flipper::new(image);
    let (width, height) = flipped.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| flipped.get_pixel(x, y))
}
