//! Foundational primitives for retinal vessel analysis.
//!
//! ## Images and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`.
//! Owned images always have `stride == width`; `ImageView::from_slice`
//! borrows row-padded buffers without copying.
//!
//! ## Binary Convention
//! Any pixel type works as a binary mask: a pixel is set (vessel) iff it is
//! not equal to `T::default()`. For `u8` images this means "non-zero".
//!
//! ## Coordinates
//! Pixel coordinates are `(row, col)` pairs. Rows index the image height,
//! columns the width. Image accessors keep the `(x, y)` = `(col, row)` order.

mod error;
mod geom;
mod image;
mod roi;

pub use error::Error;
pub use geom::{NEIGHBORS_8, PixelCoord};
pub use image::{Image, ImageView, ImageViewMut};
pub use roi::{Roi, RoiMask, RoiMembership};
