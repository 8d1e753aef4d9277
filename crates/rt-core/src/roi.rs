use crate::Error;
use crate::geom::PixelCoord;
use crate::image::Image;

/// Capability to answer "is this pixel inside a region of interest".
///
/// Coordinates outside the backing grid are never inside.
pub trait RoiMembership {
    fn is_in_roi(&self, p: PixelCoord) -> bool;
}

/// Axis-aligned rectangular region of interest, half-open on the bottom and
/// right edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roi {
    pub name: String,
    pub description: String,
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Roi {
    pub fn new(
        name: impl Into<String>,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
    ) -> Result<Self, Error> {
        let name = name.into();
        if bottom <= top || right <= left {
            return Err(Error::InvalidRoi(name));
        }

        Ok(Self {
            name,
            description: String::new(),
            top,
            left,
            bottom,
            right,
        })
    }

    /// Smallest rectangle covering all `points` (inclusive). At least two
    /// points are required to span an area.
    pub fn from_points(name: impl Into<String>, points: &[PixelCoord]) -> Result<Self, Error> {
        let name = name.into();
        if points.len() < 2 {
            return Err(Error::InvalidRoi(name));
        }

        let top = points.iter().map(|p| p.row).min().unwrap_or(0);
        let left = points.iter().map(|p| p.col).min().unwrap_or(0);
        let bottom = points.iter().map(|p| p.row).max().unwrap_or(0) + 1;
        let right = points.iter().map(|p| p.col).max().unwrap_or(0) + 1;

        Self::new(name, top, left, bottom, right)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    pub fn width(&self) -> usize {
        self.right - self.left
    }

    /// Corner points in clockwise order starting at the top-left, inclusive.
    pub fn corners(&self) -> [PixelCoord; 4] {
        [
            PixelCoord::new(self.top, self.left),
            PixelCoord::new(self.top, self.right - 1),
            PixelCoord::new(self.bottom - 1, self.right - 1),
            PixelCoord::new(self.bottom - 1, self.left),
        ]
    }
}

impl RoiMembership for Roi {
    fn is_in_roi(&self, p: PixelCoord) -> bool {
        (self.top..self.bottom).contains(&p.row) && (self.left..self.right).contains(&p.col)
    }
}

/// Rasterized union of several [`Roi`]s over an image grid.
#[derive(Debug, Clone)]
pub struct RoiMask {
    mask: Image<bool>,
    rois: Vec<Roi>,
}

impl RoiMask {
    pub fn new(width: usize, height: usize, rois: Vec<Roi>) -> Self {
        let mut mask = Image::new_fill(width, height, false);
        {
            let mut view = mask.as_view_mut();
            for roi in &rois {
                let bottom = roi.bottom.min(height);
                let right = roi.right.min(width);
                for row in roi.top.min(bottom)..bottom {
                    view.row_mut(row)[roi.left.min(right)..right].fill(true);
                }
            }
        }

        Self { mask, rois }
    }

    pub fn rois(&self) -> &[Roi] {
        &self.rois
    }

    pub fn covered_pixels(&self) -> usize {
        self.mask.as_view().count_set()
    }
}

impl RoiMembership for RoiMask {
    fn is_in_roi(&self, p: PixelCoord) -> bool {
        self.mask.as_view().is_set(p)
    }
}

impl<R: RoiMembership + ?Sized> RoiMembership for &R {
    fn is_in_roi(&self, p: PixelCoord) -> bool {
        (**self).is_in_roi(p)
    }
}
