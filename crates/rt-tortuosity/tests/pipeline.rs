use rt_core::{Image, PixelCoord, Roi, RoiMask};
use rt_tortuosity::{Estimator, ImageSummary, TortuosityParams, fractal_dimension, score_vessels};
use rt_trace::{TraceConfig, VisitMask, trace_vessels};

/// A straight vertical vessel in column 10 and a zig-zag one around column 40.
fn two_vessels() -> Image<u8> {
    let mut img = Image::new_fill(64, 64, 0u8);
    img.paint((4..60).map(|row| PixelCoord::new(row, 10)), 255);
    img.paint(
        (4..60).map(|row| {
            let phase = row % 8;
            let col = if phase < 4 { 40 + phase } else { 48 - phase };
            PixelCoord::new(row, col)
        }),
        255,
    );
    img
}

#[test]
fn traces_and_scores_a_skeleton() {
    let img = two_vessels();
    let view = img.as_view();
    let mut visited = VisitMask::for_view(&view);
    let curves = trace_vessels(&view, &mut visited, &TraceConfig::default()).expect("mask fits");

    assert_eq!(curves.len(), 2);
    assert_eq!(visited.visited_count(), view.count_set());
    assert!(curves.iter().all(|c| c.len() == 56));

    let params = TortuosityParams::default();
    let scores = score_vessels(&curves, &params).expect("long vessels");
    assert_eq!(scores.len(), 2);

    let straight = &scores[0];
    assert!(!straight.is_tortuous());
    assert_eq!(straight.inflection_points, 0);
    let distance = straight.value(Estimator::DistanceMeasure).expect("present");
    assert!((distance - 1.0).abs() < 1e-12);

    let zigzag = &scores[1];
    assert!(zigzag.inflection_points > 0);
    assert!(
        zigzag.value(Estimator::DistanceMeasure).expect("present")
            > straight.value(Estimator::DistanceMeasure).expect("present")
    );
    assert!(zigzag.value(Estimator::SquaredCurvature).expect("present") > 0.0);
    assert!(zigzag.value(Estimator::Density).expect("present") > 0.0);

    let summary = ImageSummary::from_scores(&scores, fractal_dimension(&view));
    assert_eq!(summary.vessel_count, 2);
    assert!(summary.image_fractal > 0.0);
    assert!(summary.tortuous_fraction <= 0.5);
}

#[test]
fn roi_selects_vessels_by_raw_pixels() {
    let img = two_vessels();
    let view = img.as_view();
    let mut visited = VisitMask::for_view(&view);
    let curves = trace_vessels(&view, &mut visited, &TraceConfig::default()).expect("mask fits");

    let mask = RoiMask::new(
        64,
        64,
        vec![Roi::new("left", 0, 0, 64, 20).expect("valid roi")],
    );
    let selected: Vec<_> = curves.into_iter().filter(|c| c.touches_roi(&mask)).collect();
    assert_eq!(selected.len(), 1);
    assert!(selected[0].ys().iter().all(|&col| col == 10));

    let scores = score_vessels(&selected, &TortuosityParams::default()).expect("long vessel");
    let summary = ImageSummary::from_scores(&scores, 0.0);
    assert_eq!(summary.vessel_count, 1);
    assert_eq!(summary.tortuous_fraction, 0.0);
    assert_eq!(summary.mean(Estimator::LinearRegression), Some(1.0));
}
