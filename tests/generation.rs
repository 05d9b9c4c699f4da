use lathe_engine::geom::{
    CrossSectionTraceConfig, CrossSectionalModel, GeomMesh, LatheModel, MeshModel, Point2, RevolveConfig,
    TopologyCounts, generate_frames, inflate, resample_by_length, resample_to_count, revolve, segments_intersect,
    total_length, trace_segments, value_at,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_polyline(rng: &mut StdRng, len: usize) -> Vec<Point2> {
    (0..len)
        .map(|_| Point2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0)))
        .collect()
}

/// Closed star-shaped outline around the origin with jittered radii.
fn random_outline(rng: &mut StdRng, spokes: usize) -> Vec<Point2> {
    let mut outline: Vec<Point2> = (0..spokes)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / spokes as f64;
            Point2::polar(rng.random_range(1.0..3.0), angle)
        })
        .collect();
    outline.push(outline[0]);
    outline
}

fn assert_index_validity(mesh: &GeomMesh) {
    assert_eq!(mesh.indices.len() % 3, 0);
    let n = mesh.positions.len();
    assert!(mesh.indices.iter().all(|&i| (i as usize) < n));
}

#[test]
fn scenario_total_length_and_function_values() {
    let l_shape = [Point2::new(0.0, 0.0), Point2::new(3.0, 0.0), Point2::new(3.0, 4.0)];
    assert_eq!(total_length(&l_shape), 7.0);

    let ramp = [Point2::new(0.0, 0.0), Point2::new(2.0, 4.0)];
    assert_eq!(value_at(&ramp, 1.0), 2.0);
    assert_eq!(value_at(&ramp, 5.0), 0.0);
}

#[test]
fn resample_by_length_respects_spacing_bound() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    for _ in 0..200 {
        let len = rng.random_range(0..12);
        let points = random_polyline(&mut rng, len);
        let sample_length = rng.random_range(0.05..3.0);
        let samples = resample_by_length(&points, sample_length);

        if points.len() < 2 {
            assert!(samples.is_empty());
            continue;
        }
        assert_eq!(samples[0], points[0]);
        let expected = (total_length(&points) / sample_length).floor() as usize + 1;
        assert_eq!(samples.len(), expected);
        for pair in samples.windows(2) {
            assert!(pair[0].distance_to(pair[1]) <= sample_length + 1e-9);
        }
    }
}

#[test]
fn resample_to_count_is_exact() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);
    for _ in 0..200 {
        let len = rng.random_range(2..12);
        let points = random_polyline(&mut rng, len);
        let n = rng.random_range(2..64);
        let samples = resample_to_count(&points, n);

        assert_eq!(samples.len(), n);
        assert_eq!(samples[0], points[0]);
        assert_eq!(samples[n - 1], points[len - 1]);
    }
}

#[test]
fn traced_segments_never_cross_their_predecessor() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0003);
    for _ in 0..100 {
        let spokes = rng.random_range(5..16);
        let boundary = random_outline(&mut rng, spokes);
        let spine_len = rng.random_range(2..6);
        let spine: Vec<Point2> = (0..spine_len)
            .map(|_| Point2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
            .collect();
        let config = CrossSectionTraceConfig {
            count_per_ring: rng.random_range(3..10),
            sample_length: rng.random_range(0.02..0.5),
            ..CrossSectionTraceConfig::default()
        };

        let segments = trace_segments(&boundary, &spine, &config);
        for pair in segments.windows(2) {
            assert!(!segments_intersect(pair[0].p1, pair[0].p2, pair[1].p1, pair[1].p2));
        }

        let (mesh, counts) = inflate(&segments, &config);
        assert_index_validity(&mesh);
        assert_eq!(mesh.indices.len(), counts.total_triangle_count() * 3);
    }
}

#[test]
fn revolved_meshes_have_valid_indices() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0004);
    for _ in 0..100 {
        let len = rng.random_range(0..20);
        let mut x = 0.0;
        let profile: Vec<Point2> = (0..len)
            .map(|_| {
                x += rng.random_range(0.0..0.5);
                Point2::new(x, rng.random_range(0.0..2.0))
            })
            .collect();
        let config = RevolveConfig {
            count_per_ring: rng.random_range(3..24),
            wrap_start: rng.random_bool(0.5),
            wrap_end: rng.random_bool(0.5),
            lean_scalar: rng.random_range(0.0..1.0),
            graph_y: rng
                .random_bool(0.5)
                .then(|| vec![Point2::new(-1.0, 0.0), Point2::new(x * 0.5, 1.0), Point2::new(x + 1.0, -0.5)]),
            ..RevolveConfig::default()
        };

        let mesh = revolve(&profile, &config);
        assert_index_validity(&mesh);
        if profile.len() < 2 {
            assert!(mesh.is_empty());
        } else {
            assert_eq!(mesh.vertex_count(), profile.len() * config.count_per_ring);
            mesh.validate().expect("mesh validate");
        }
    }
}

#[test]
fn frames_generate_in_order() {
    let frames: Vec<CrossSectionalModel> = (1..=4)
        .map(|k| {
            let half_width = f64::from(k) * 0.5;
            CrossSectionalModel::new(
                vec![
                    Point2::new(0.0, half_width),
                    Point2::new(4.0, half_width),
                    Point2::new(4.0, -half_width),
                    Point2::new(0.0, -half_width),
                ],
                vec![Point2::new(0.5, 0.0), Point2::new(3.5, 0.0)],
                CrossSectionTraceConfig {
                    count_per_ring: 6,
                    sample_length: 0.5,
                    ..CrossSectionTraceConfig::default()
                },
            )
        })
        .collect();

    let outputs = generate_frames(&frames);
    assert_eq!(outputs.len(), 4);
    for (k, output) in outputs.iter().enumerate() {
        let expected = (k + 1) as f64;
        assert!(output.segments.iter().all(|s| (s.length() - expected).abs() < 1e-9));
        assert_index_validity(&output.mesh);
    }
}

#[test]
fn revolve_config_deserializes_with_defaults() {
    let config: RevolveConfig =
        serde_json::from_str(r#"{ "count_per_ring": 6, "wrap_end": true }"#).expect("config json");
    assert_eq!(config.count_per_ring, 6);
    assert!(config.wrap_end);
    assert!(!config.wrap_start);
    assert_eq!(config.lean_scalar, 0.25);
    assert!(config.validate().is_ok());

    let bad: RevolveConfig = serde_json::from_str(r#"{ "count_per_ring": 2 }"#).expect("config json");
    assert!(bad.validate().is_err());
}

#[test]
fn lathe_model_round_trips_through_json() {
    let model = LatheModel {
        profile: vec![Point2::new(0.0, 1.0), Point2::new(1.0, 0.5)],
        sample_length: 0.25,
        config: RevolveConfig::default().with_count_per_ring(5),
    };
    let json = serde_json::to_string(&model).expect("serialize");
    let restored: LatheModel = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, model);
    assert_eq!(restored.generate(), model.generate());

    let counts: TopologyCounts =
        serde_json::from_str(r#"{ "side_quad_triangle_count": 8, "start_cap_point_count": 4, "end_cap_point_count": 0 }"#)
            .expect("counts json");
    assert_eq!(counts.start_cap_triangle_count(), 2);
}
