//! Box-counting (Minkowski–Bouligand) dimension of binary patterns.

use rt_core::{Image, ImageView, PixelCoord};

use crate::error::{Result, TortuosityError, check_curve};
use crate::metric::Estimator;

/// Smallest box side used for counting.
const MIN_BOX: usize = 4;

/// Largest canvas side [`rasterize_curve`] allocates.
pub const MAX_CANVAS_SIDE: usize = 1 << 14;

/// Box-counting dimension of the set pixels of `img`.
///
/// Box sides run over the powers of two from `2^⌊log2 min(w, h)⌋` down to 4.
/// A box counts when it is partially covered: at least one set pixel but
/// fewer than `side²`. Boxes on the right and bottom edges are clipped to
/// the image, so a clipped box is never complete.
///
/// The dimension is the negated slope of the least-squares fit of
/// `ln(count)` against `ln(side)`, using only sides with a non-zero count.
/// With fewer than two such sides the dimension is `0.0`; this is the case
/// for an empty image, a completely filled one and anything smaller than
/// 8 pixels on its short side.
pub fn fractal_dimension<T: Default + PartialEq>(img: &ImageView<'_, T>) -> f64 {
    let (width, height) = (img.width(), img.height());
    let short = width.min(height);
    if short < MIN_BOX {
        return 0.0;
    }

    let table = SummedArea::new(img);
    let mut samples = Vec::new();
    let mut side = 1usize << short.ilog2();
    while side >= MIN_BOX {
        let count = table.partial_boxes(side);
        if count > 0 {
            samples.push(((side as f64).ln(), (count as f64).ln()));
        }
        side /= 2;
    }

    if samples.len() < 2 {
        return 0.0;
    }
    -least_squares_slope(&samples)
}

/// Draws the curve on a square canvas for box counting.
///
/// Points are shifted so the minimum row and column land on 0 and are drawn
/// with value 255. The canvas side is the smallest power of two (at least 2)
/// covering both spans, doubled.
///
/// Fails with [`TortuosityError::NonFiniteCoordinate`] on NaN or infinite
/// input and with [`TortuosityError::CanvasTooLarge`] when the canvas side
/// would exceed [`MAX_CANVAS_SIDE`].
pub fn rasterize_curve(xs: &[f64], ys: &[f64]) -> Result<Image<u8>> {
    let estimator = Estimator::FractalCurve;
    check_curve(estimator, xs, ys, estimator.min_points())?;
    if let Some(index) = xs
        .iter()
        .zip(ys)
        .position(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(TortuosityError::NonFiniteCoordinate { index });
    }

    let (min_x, max_x) = bounds(xs);
    let (min_y, max_y) = bounds(ys);
    // Saturating casts: anything past usize::MAX is rejected below anyway.
    let span_x = (max_x - min_x).round() as usize;
    let span_y = (max_y - min_y).round() as usize;
    let side = canvas_side(span_x, span_y).ok_or(TortuosityError::CanvasTooLarge {
        span_x,
        span_y,
        max_side: MAX_CANVAS_SIDE,
    })?;

    let mut canvas = Image::new_fill(side, side, 0u8);
    let pixels = xs.iter().zip(ys).map(|(&x, &y)| PixelCoord {
        row: (x - min_x).round() as usize,
        col: (y - min_y).round() as usize,
    });
    canvas.paint(pixels, 255);
    Ok(canvas)
}

fn canvas_side(span_x: usize, span_y: usize) -> Option<usize> {
    let mut side = 2usize;
    while side < span_x || side < span_y {
        side = side.checked_mul(2)?;
    }
    let side = side.checked_mul(2)?;
    side.checked_mul(side)?;
    (side <= MAX_CANVAS_SIDE).then_some(side)
}

/// Fractal dimension of the curve drawn by [`rasterize_curve`].
pub fn fractal_tortuosity_curve(xs: &[f64], ys: &[f64]) -> Result<f64> {
    let canvas = rasterize_curve(xs, ys)?;
    Ok(fractal_dimension(&canvas.as_view()))
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn least_squares_slope(samples: &[(f64, f64)]) -> f64 {
    let n = samples.len() as f64;
    let mean_x = samples.iter().map(|s| s.0).sum::<f64>() / n;
    let mean_y = samples.iter().map(|s| s.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for &(x, y) in samples {
        cov += (x - mean_x) * (y - mean_y);
        var += (x - mean_x) * (x - mean_x);
    }
    cov / var
}

/// Inclusive prefix sums of set pixels, padded with a zero row and column.
struct SummedArea {
    width: usize,
    height: usize,
    sums: Vec<u64>,
}

impl SummedArea {
    fn new<T: Default + PartialEq>(img: &ImageView<'_, T>) -> Self {
        let (width, height) = (img.width(), img.height());
        let stride = width + 1;
        let mut sums = vec![0u64; stride * (height + 1)];
        let zero = T::default();

        for y in 0..height {
            let mut row_sum = 0u64;
            for (x, px) in img.row(y).iter().enumerate() {
                row_sum += u64::from(*px != zero);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
            }
        }

        Self {
            width,
            height,
            sums,
        }
    }

    /// Set pixels in rows `y0..y1`, columns `x0..x1`.
    fn area(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        let s = self.width + 1;
        self.sums[y1 * s + x1] + self.sums[y0 * s + x0]
            - self.sums[y0 * s + x1]
            - self.sums[y1 * s + x0]
    }

    fn partial_boxes(&self, side: usize) -> usize {
        let full = (side * side) as u64;
        let mut count = 0;
        for y0 in (0..self.height).step_by(side) {
            let y1 = (y0 + side).min(self.height);
            for x0 in (0..self.width).step_by(side) {
                let x1 = (x0 + side).min(self.width);
                let filled = self.area(x0, y0, x1, y1);
                if filled > 0 && filled < full {
                    count += 1;
                }
            }
        }
        count
    }
}
