use crate::geom::{Point2, morph_polylines, point_and_tangent_at_length, resample_by_length, resample_to_count, total_length};

fn l_shape() -> Vec<Point2> {
    vec![Point2::new(0.0, 0.0), Point2::new(3.0, 0.0), Point2::new(3.0, 4.0)]
}

#[test]
fn total_length_of_l_shape() {
    assert!((total_length(&l_shape()) - 7.0).abs() < 1e-12);
}

#[test]
fn resample_by_length_spacing_and_count() {
    let samples = resample_by_length(&l_shape(), 0.5);
    assert_eq!(samples.len(), 15);
    assert_eq!(samples[0], Point2::new(0.0, 0.0));
    for pair in samples.windows(2) {
        assert!(pair[0].distance_to(pair[1]) <= 0.5 + 1e-9);
    }
    // 7.0 is a whole number of steps, so the last input point survives.
    assert!(samples[14].distance_to(Point2::new(3.0, 4.0)) < 1e-9);
}

#[test]
fn resample_by_length_truncates_remainder() {
    let samples = resample_by_length(&l_shape(), 2.0);
    // 0, 2, 4, 6 along the curve; the last 1.0 is dropped.
    assert_eq!(samples.len(), 4);
    assert!(samples[3].distance_to(Point2::new(3.0, 3.0)) < 1e-9);
}

#[test]
fn resample_to_count_hits_arc_length_fractions() {
    let samples = resample_to_count(&l_shape(), 8);
    assert_eq!(samples.len(), 8);
    for (i, p) in samples.iter().enumerate() {
        let expected = point_and_tangent_at_length(&l_shape(), i as f64).expect("frame").origin;
        assert!(p.distance_to(expected) < 1e-9, "sample {i}: {p:?} vs {expected:?}");
    }
}

#[test]
fn morph_between_mirrored_arcs_is_centre_line() {
    let upper = vec![Point2::new(0.0, 1.0), Point2::new(2.0, 2.0), Point2::new(4.0, 1.0)];
    let lower: Vec<Point2> = upper.iter().map(|p| Point2::new(p.x, -p.y)).collect();
    let centre = morph_polylines(&upper, &lower, 0.5, 9);
    assert_eq!(centre.len(), 9);
    assert!(centre.iter().all(|p| p.y.abs() < 1e-12));
}
