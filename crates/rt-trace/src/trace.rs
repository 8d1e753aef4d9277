use std::collections::VecDeque;

use rt_core::{Error, Image, ImageView, PixelCoord};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::curve::VesselCurve;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    /// Pixels this close to any image edge never seed a trace.
    pub border_margin: usize,
    /// Curves with `len() <= min_pixels` projected points are dropped.
    pub min_pixels: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            border_margin: 1,
            min_pixels: 0,
        }
    }
}

/// Per-pixel "already traced" flags, kept apart from the image so tracing
/// never mutates its input.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitMask {
    flags: Image<bool>,
}

impl VisitMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            flags: Image::new_fill(width, height, false),
        }
    }

    pub fn for_view<T>(img: &ImageView<'_, T>) -> Self {
        Self::new(img.width(), img.height())
    }

    pub fn width(&self) -> usize {
        self.flags.width()
    }

    pub fn height(&self) -> usize {
        self.flags.height()
    }

    pub fn is_visited(&self, p: PixelCoord) -> bool {
        self.flags.as_view().is_set(p)
    }

    pub fn visited_count(&self) -> usize {
        self.flags.as_view().count_set()
    }

    pub fn clear(&mut self) {
        self.flags.data_mut().fill(false);
    }

    /// Marks `p`, returning `false` if it was already marked.
    #[inline]
    fn mark(&mut self, p: PixelCoord) -> bool {
        let idx = linear_idx(p, self.flags.width());
        let flag = &mut self.flags.data_mut()[idx];
        !std::mem::replace(flag, true)
    }
}

/// Extracts every vessel reachable from the interior of `img`, using a fresh
/// visit mask and no length filter.
pub fn extract_vessels<T: Default + PartialEq>(
    img: &ImageView<'_, T>,
    border_margin: usize,
) -> Vec<VesselCurve> {
    let mut visited = VisitMask::for_view(img);
    let cfg = TraceConfig {
        border_margin,
        min_pixels: 0,
    };
    trace_pass(img, &mut visited, &cfg)
}

/// Traces all unvisited 8-connected components seeded inside the border
/// margin, marking their pixels in `visited`.
///
/// Seeds are found in row-major order. Each component is drained completely
/// before the scan moves on, so a pixel belongs to at most one curve across
/// this call and any later call sharing the same mask.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(img, visited),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn trace_vessels<T: Default + PartialEq>(
    img: &ImageView<'_, T>,
    visited: &mut VisitMask,
    cfg: &TraceConfig,
) -> Result<Vec<VesselCurve>, Error> {
    if visited.width() != img.width() || visited.height() != img.height() {
        return Err(Error::ShapeMismatch {
            expected: (img.width(), img.height()),
            actual: (visited.width(), visited.height()),
        });
    }

    Ok(trace_pass(img, visited, cfg))
}

fn trace_pass<T: Default + PartialEq>(
    img: &ImageView<'_, T>,
    visited: &mut VisitMask,
    cfg: &TraceConfig,
) -> Vec<VesselCurve> {
    let (width, height) = (img.width(), img.height());
    let margin = cfg.border_margin;

    let mut curves = Vec::new();
    let mut queue = VecDeque::new();

    for row in margin..height.saturating_sub(margin) {
        for col in margin..width.saturating_sub(margin) {
            let seed = PixelCoord { row, col };
            if !img.is_set(seed) || visited.is_visited(seed) {
                continue;
            }

            let pixels = trace_component(img, visited, seed, &mut queue);
            let curve = VesselCurve::from_pixels(pixels);
            if curve.len() > cfg.min_pixels {
                curves.push(curve);
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(vessels = curves.len(), "vessel trace finished");

    curves
}

fn trace_component<T: Default + PartialEq>(
    img: &ImageView<'_, T>,
    visited: &mut VisitMask,
    seed: PixelCoord,
    queue: &mut VecDeque<PixelCoord>,
) -> Vec<PixelCoord> {
    let (width, height) = (img.width(), img.height());

    queue.clear();
    visited.mark(seed);
    queue.push_back(seed);

    let mut pixels = Vec::new();
    while let Some(p) = queue.pop_front() {
        pixels.push(p);
        for nb in p.neighbors8(height, width) {
            if img.is_set(nb) && visited.mark(nb) {
                queue.push_back(nb);
            }
        }
    }

    pixels
}

#[inline]
fn linear_idx(p: PixelCoord, width: usize) -> usize {
    p.row * width + p.col
}
