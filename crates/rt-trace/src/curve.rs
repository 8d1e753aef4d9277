use rt_core::{PixelCoord, RoiMembership};

/// One traced vessel: every pixel of an 8-connected skeleton component plus
/// its function-like projection `y = f(x)`.
///
/// The projection uses `x = row`, `y = col`. It is built by stable-sorting
/// the pixels by row and keeping the first pixel of each row, so `xs` is
/// strictly increasing and each `x` has exactly one `y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VesselCurve {
    points: Vec<PixelCoord>,
    xs: Vec<usize>,
    ys: Vec<usize>,
}

impl VesselCurve {
    /// Builds a curve from pixels in discovery order.
    pub fn from_pixels(points: Vec<PixelCoord>) -> Self {
        let mut sorted = points.clone();
        sorted.sort_by_key(|p| p.row);

        let mut xs = Vec::with_capacity(sorted.len());
        let mut ys = Vec::with_capacity(sorted.len());
        for p in &sorted {
            if xs.last() == Some(&p.row) {
                continue;
            }
            xs.push(p.row);
            ys.push(p.col);
        }

        Self { points, xs, ys }
    }

    /// Raw component pixels in discovery order.
    pub fn points(&self) -> &[PixelCoord] {
        &self.points
    }

    pub fn pixel_count(&self) -> usize {
        self.points.len()
    }

    pub fn xs(&self) -> &[usize] {
        &self.xs
    }

    pub fn ys(&self) -> &[usize] {
        &self.ys
    }

    /// Number of projected points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs_f64(&self) -> Vec<f64> {
        self.xs.iter().map(|&v| v as f64).collect()
    }

    pub fn ys_f64(&self) -> Vec<f64> {
        self.ys.iter().map(|&v| v as f64).collect()
    }

    pub fn projected(&self) -> impl Iterator<Item = PixelCoord> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(&row, &col)| PixelCoord { row, col })
    }

    pub fn touches_roi(&self, roi: &impl RoiMembership) -> bool {
        self.points.iter().any(|&p| roi.is_in_roi(p))
    }
}
