//! API Regression Tests for the Outline Crate Ecosystem
//!
//! These tests serve as a regression suite to ensure the public API remains
//! stable and the fields it produces stay numerically correct. They are
//! organized in 4 tiers of increasing complexity:
//!
//! - Tier 1: Foundation (outline-types geometry, fill rules, repair)
//! - Tier 2: Coloring (outline-coloring heuristics and assignment)
//! - Tier 3: Fields (outline-sdf generation, sampling, correction)
//! - Tier 4: Pipeline (DistanceFieldJob, metrics, previews)
//!
//! If any of these tests fail after API changes, it indicates a breaking change
//! that needs documentation in CHANGELOG.md and a version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)]

use approx::assert_relative_eq;
use outline::{coloring, prelude::*, sdf, types};

/// Axis-aligned square, wound clockwise in a Y-up frame.
fn square(left: f64, bottom: f64, size: f64) -> Contour {
    Contour::polygon(&[
        Point2::new(left, bottom),
        Point2::new(left, bottom + size),
        Point2::new(left + size, bottom + size),
        Point2::new(left + size, bottom),
    ])
}

/// Circle of four cubic arcs around the origin, wound clockwise.
fn circle(radius: f64) -> Contour {
    let k = 0.552_284_749_831 * radius;
    let p = |x: f64, y: f64| Point2::new(x, y);
    let mut contour = Contour::new();
    contour.push(EdgeSegment::cubic(p(-radius, 0.0), p(-radius, k), p(-k, radius), p(0.0, radius)));
    contour.push(EdgeSegment::cubic(p(0.0, radius), p(k, radius), p(radius, k), p(radius, 0.0)));
    contour.push(EdgeSegment::cubic(p(radius, 0.0), p(radius, -k), p(k, -radius), p(0.0, -radius)));
    contour.push(EdgeSegment::cubic(p(0.0, -radius), p(-k, -radius), p(-radius, -k), p(-radius, 0.0)));
    contour
}

fn median(pixel: &[f32]) -> f32 {
    types::math::median(pixel[0], pixel[1], pixel[2])
}

// =============================================================================
// TIER 1: Foundation - Geometry and Fill Rules
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn segment_evaluation() {
        let line = EdgeSegment::line(Point2::new(0.0, 0.0), Point2::new(2.0, 4.0));
        assert_relative_eq!(line.point(0.5), Point2::new(1.0, 2.0));

        let quad = EdgeSegment::quadratic(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 0.0),
        );
        assert_relative_eq!(quad.point(0.5), Point2::new(1.0, 1.0));
        assert_eq!(quad.start(), Point2::new(0.0, 0.0));
        assert_eq!(quad.end(), Point2::new(2.0, 0.0));
    }

    #[test]
    fn shape_bounds_and_containment() {
        let shape = Shape::from_contours([square(1.0, 2.0, 3.0)]);
        let bounds = shape.bounds();
        assert_relative_eq!(bounds.left, 1.0);
        assert_relative_eq!(bounds.bottom, 2.0);
        assert_relative_eq!(bounds.right, 4.0);
        assert_relative_eq!(bounds.top, 5.0);
        assert!(shape.is_filled(&Point2::new(2.5, 3.5)));
        assert!(!shape.is_filled(&Point2::new(0.5, 3.5)));
    }

    #[test]
    fn fill_rules_on_nested_contours() {
        let nested = Shape::from_contours([square(0.0, 0.0, 10.0), square(3.0, 3.0, 4.0)]);
        let center = Point2::new(5.0, 5.0);
        let ring = Point2::new(1.0, 5.0);

        let nonzero = nested.clone().with_fill_rule(FillRule::NonZero);
        assert!(nonzero.is_filled(&center));
        assert!(nonzero.is_filled(&ring));

        let odd = nested.with_fill_rule(FillRule::Odd);
        assert!(!odd.is_filled(&center));
        assert!(odd.is_filled(&ring));
    }

    #[test]
    fn normalize_closes_open_contours() {
        let mut contour = Contour::new();
        contour.push(EdgeSegment::line(Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)));
        contour.push(EdgeSegment::line(Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)));
        contour.push(EdgeSegment::line(Point2::new(1.0, 1.0), Point2::new(1.0, 0.0)));
        let mut shape = Shape::from_contours([contour]);

        assert!(!shape.validate());
        assert!(shape.report().has_issues());

        let summary = shape.normalize();
        assert_eq!(summary.gaps_bridged, 1);
        assert!(shape.validate());
        assert_eq!(shape.edge_count(), 4);
    }

    #[test]
    fn single_edge_contours_are_split() {
        let mut contour = Contour::new();
        contour.push(EdgeSegment::cubic(
            Point2::new(0.0, 0.0),
            Point2::new(-1.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 0.0),
        ));
        let mut shape = Shape::from_contours([contour]);
        let summary = shape.normalize();
        assert_eq!(summary.contours_split, 1);
        assert_eq!(shape.contours[0].len(), 3);
        assert!(shape.validate());
    }

    #[test]
    fn reversing_a_contour_flips_its_winding() {
        let mut contour = square(0.0, 0.0, 1.0);
        let winding = contour.winding();
        assert_ne!(winding, 0);
        contour.reverse();
        assert_eq!(contour.winding(), -winding);
    }
}

// =============================================================================
// TIER 2: Coloring
// =============================================================================

mod tier2_coloring {
    use super::*;

    #[test]
    fn corners_separate_colors() {
        for config in [ColoringConfig::default(), ColoringConfig::ink_trap()] {
            let mut shape = Shape::from_contours([square(0.0, 0.0, 4.0)]);
            let summary = color_edges(&mut shape, &config);
            assert_eq!(summary.corner_count, 4);

            let edges = &shape.contours[0].edges;
            for (i, edge) in edges.iter().enumerate() {
                let next = &edges[(i + 1) % edges.len()];
                assert!(edge.color.channel_count() >= 2, "edge {i} is {:?}", edge.color);
                // Every corner keeps at most one channel in common.
                assert!(edge.color.intersect(next.color).channel_count() <= 1);
            }
        }
    }

    #[test]
    fn smooth_contours_stay_white() {
        let mut shape = Shape::from_contours([circle(5.0)]);
        let summary = color_edges(&mut shape, &ColoringConfig::default());
        assert_eq!(summary.smooth_contours, 1);
        assert!(shape.edges().all(|e| e.color == EdgeColor::White));
    }

    #[test]
    fn explicit_assignment_overrides() {
        let mut shape = Shape::from_contours([square(0.0, 0.0, 1.0)]);
        let assigned = coloring::apply_color_assignment(&mut shape, "cmyw");
        assert_eq!(assigned, 4);
        let colors: Vec<_> = shape.edges().map(|e| e.color).collect();
        assert_eq!(
            colors,
            [EdgeColor::Cyan, EdgeColor::Magenta, EdgeColor::Yellow, EdgeColor::White]
        );
    }

    #[test]
    fn strategy_lookup() {
        assert_eq!(ColoringStrategy::from_name("simple"), Some(ColoringStrategy::Simple));
        assert_eq!(ColoringStrategy::from_name("inktrap"), Some(ColoringStrategy::InkTrap));
        assert_eq!(ColoringStrategy::from_name("bogus"), None);
    }
}

// =============================================================================
// TIER 3: Fields - Generation, Sampling, Correction
// =============================================================================

mod tier3_fields {
    use super::*;

    #[test]
    fn analytic_circle_distances() {
        let shape = Shape::from_contours([circle(8.0)]);
        let projection = sdf::Projection::new(Vector2::new(1.0, 1.0), Vector2::new(16.5, 16.5));
        let space = FieldSpace::new(projection, 2.0, FieldEncoding::Distance).unwrap();
        let mut field = AnyBitmap::new_float(33, 33, 1).unwrap();
        generate_field(&shape, &space, FieldMode::Single, &GeneratorConfig::default(), &mut field)
            .unwrap();

        let data = field.float_data().unwrap();
        // Pixel 16 is centered on the origin; pixel 25 one unit outside.
        assert_relative_eq!(data[16 * 33 + 16], -8.0, epsilon = 1e-2);
        assert_relative_eq!(data[16 * 33 + 25], 1.0, epsilon = 1e-2);
        assert_relative_eq!(data[25 * 33 + 16], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn square_corner_pixel_is_flat_after_correction() {
        let shape = {
            let mut shape = Shape::from_contours([square(2.5, 2.5, 5.0)]);
            color_edges(&mut shape, &ColoringConfig::default());
            shape
        };
        let space = FieldSpace::new(sdf::Projection::identity(), 2.0, FieldEncoding::Normalized)
            .unwrap();
        let mut field = AnyBitmap::new_float(10, 10, 3).unwrap();
        generate_field(&shape, &space, FieldMode::Multi, &GeneratorConfig::default(), &mut field)
            .unwrap();
        sdf::correct_errors(&mut field, &space, 1.001, true).unwrap();

        let data = field.float_data().unwrap();
        let pixel = |x: usize, y: usize| &data[(y * 10 + x) * 3..][..3];
        // The center of pixel (2, 2) sits exactly on the corner.
        for v in pixel(2, 2) {
            assert_relative_eq!(*v, 0.5, epsilon = 1e-6);
        }
        // Two units from the nearest edges with a range of two.
        assert_relative_eq!(median(pixel(5, 5)), 1.5, epsilon = 1e-6);
        assert!(median(pixel(0, 0)) < 0.5);
    }

    #[test]
    fn clashing_corners_are_equalized() {
        // Two squares whose facing corners share the yellow channels; the
        // rest is blue. Pixels (4, 7) and (4, 8) pick their yellow and blue
        // distances from different corners, so every channel jumps by 3.
        let colored = |left: f64, bottom: f64, yellow: usize| {
            let mut contour = square(left, bottom, 4.0);
            for (i, edge) in contour.edges.iter_mut().enumerate() {
                edge.color = if i == yellow { EdgeColor::Yellow } else { EdgeColor::Blue };
            }
            contour
        };
        let shape = Shape::from_contours([colored(0.0, 0.0, 2), colored(8.0, 9.0, 0)]);
        let space = FieldSpace::new(sdf::Projection::identity(), 2.0, FieldEncoding::Normalized)
            .unwrap();
        let mut field = AnyBitmap::new_float(14, 14, 3).unwrap();
        generate_field(&shape, &space, FieldMode::Multi, &GeneratorConfig::legacy(), &mut field)
            .unwrap();
        let raw = field.float_data().unwrap().to_vec();

        let tau = space.error_threshold(1.001).y as f32;
        let spread = |pixel: [f32; 3]| {
            pixel.iter().copied().fold(f32::MIN, f32::max) - pixel.iter().copied().fold(f32::MAX, f32::min)
        };
        let at = |data: &[f32], x: usize, y: usize| {
            let i = (y * 14 + x) * 3;
            [data[i], data[i + 1], data[i + 2]]
        };
        for (channel, expected) in [(0, 0.25f32), (1, 0.25), (2, -1.25)] {
            assert_relative_eq!(at(&raw[..], 4, 7)[channel], expected, epsilon = 1e-5);
        }
        for (channel, expected) in [(0, -1.25f32), (1, -1.25), (2, 0.25)] {
            assert_relative_eq!(at(&raw[..], 4, 8)[channel], expected, epsilon = 1e-5);
        }
        assert!(spread(at(&raw[..], 4, 7)) > tau);
        assert!(spread(at(&raw[..], 4, 8)) > tau);

        let summary = sdf::correct_errors(&mut field, &space, 1.001, false).unwrap();
        assert!(summary.clashes + summary.diagonal_clashes > 0);
        assert_eq!(summary.channels_replaced, 0);

        let corrected = field.float_data().unwrap();
        assert!(spread(at(corrected, 4, 7)) <= tau || spread(at(corrected, 4, 8)) <= tau);
        // Equalized pixels keep their median in every channel.
        for (before, after) in raw.chunks(3).zip(corrected.chunks(3)) {
            if before != after {
                let m = median(before);
                assert!(after.iter().all(|&v| v == m));
            }
        }

        // Disabling the pass leaves the same field untouched.
        let mut untouched = AnyBitmap::new_float(14, 14, 3).unwrap();
        generate_field(&shape, &space, FieldMode::Multi, &GeneratorConfig::legacy(), &mut untouched)
            .unwrap();
        let summary = sdf::correct_errors(&mut untouched, &space, 0.0, false).unwrap();
        assert!(!summary.changed());
        assert_eq!(untouched.float_data().unwrap(), &raw[..]);
    }

    #[test]
    fn mismatched_bitmap_is_left_untouched() {
        let shape = Shape::from_contours([square(0.0, 0.0, 4.0)]);
        let space = FieldSpace::new(sdf::Projection::identity(), 2.0, FieldEncoding::Normalized)
            .unwrap();
        let mut field = AnyBitmap::new_float(8, 8, 1).unwrap();
        field.float_data_mut().unwrap().fill(0.3);
        let before = field.clone();

        let err = generate_field(&shape, &space, FieldMode::Multi, &GeneratorConfig::default(), &mut field)
            .unwrap_err();
        assert!(err.is_bitmap_mismatch());
        assert_eq!(field, before);
    }

    #[test]
    fn sampler_reports_filled_points_negative() {
        let shape = Shape::from_contours([square(0.0, 0.0, 4.0)]);
        let inside = sdf::pseudo_distance_at(&shape, &Point2::new(1.0, 2.0), false).unwrap();
        assert_relative_eq!(inside.distance, -1.0, epsilon = 1e-9);

        let outside = sdf::true_distance_at(&shape, &Point2::new(7.0, 8.0), false).unwrap();
        assert_relative_eq!(outside.distance, 5.0, epsilon = 1e-9);

        assert!(sdf::pseudo_distance_at(&Shape::new(), &Point2::origin(), false).is_none());
    }

    #[test]
    fn legacy_fields_match_current_after_sign_pass() {
        let shape = {
            let mut shape = Shape::from_contours([square(1.0, 1.0, 6.0)]);
            shape.contours[0].reverse();
            shape
        };
        let space = FieldSpace::new(sdf::Projection::identity(), 2.0, FieldEncoding::Normalized)
            .unwrap();

        let mut current = AnyBitmap::new_float(8, 8, 1).unwrap();
        generate_field(&shape, &space, FieldMode::Single, &GeneratorConfig::default(), &mut current)
            .unwrap();
        let mut legacy = AnyBitmap::new_float(8, 8, 1).unwrap();
        generate_field(&shape, &space, FieldMode::Single, &GeneratorConfig::legacy(), &mut legacy)
            .unwrap();

        let summary = sdf::correct_signs(&mut legacy, &shape, &space, shape.fill_rule, false).unwrap();
        assert!(summary.pixels_flipped > 0);
        for (a, b) in current.float_data().unwrap().iter().zip(legacy.float_data().unwrap()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn bitmap_channel_counts() {
        for channels in 1..=4 {
            let bitmap = AnyBitmap::new_float(3, 2, channels).unwrap();
            assert_eq!(bitmap.channel_count(), channels);
            assert_eq!(bitmap.float_data().unwrap().len(), 3 * 2 * channels);
        }
        assert!(AnyBitmap::new_float(3, 2, 5).is_err());
        assert!(AnyBitmap::new_byte(3, 2, 0).is_err());
    }
}

// =============================================================================
// TIER 4: Pipeline
// =============================================================================

mod tier4_pipeline {
    use super::*;

    fn letter_o() -> Shape {
        let mut hole = circle(4.0);
        hole.reverse();
        Shape::from_contours([circle(8.0), hole])
    }

    #[test]
    fn full_pipeline_every_mode() {
        for mode in FieldMode::ALL {
            let mut job = DistanceFieldJob::new(letter_o(), mode, 24, 24)
                .unwrap()
                .with_settings(JobSettings::default().with_range(Range::Pixels(4.0)));
            let report = job.run().unwrap();
            assert_eq!(report.coloring.is_some(), mode.is_multi_channel());
            assert_eq!(report.errors.is_some(), mode.is_multi_channel());

            let field = job.field();
            let channels = mode.channels();
            let data = field.float_data().unwrap();
            let at = |x: usize, y: usize| {
                let pixel = &data[(y * 24 + x) * channels..][..channels];
                if channels == 1 { pixel[0] } else { median(pixel) }
            };
            assert!(at(12, 12) < 0.5, "{mode}: hole");
            assert!(at(0, 0) < 0.5, "{mode}: outside");
            assert!(at(12, 3) > 0.5, "{mode}: ring");
        }
    }

    #[test]
    fn distance_output_keeps_units() {
        let settings = JobSettings::distance_output()
            .with_scale(Vector2::new(1.0, 1.0))
            .with_translate(Vector2::new(16.5, 16.5));
        let mut job = DistanceFieldJob::new(Shape::from_contours([circle(8.0)]), FieldMode::Single, 33, 33)
            .unwrap()
            .with_settings(settings);
        job.run().unwrap();
        let data = job.field().float_data().unwrap();
        assert_relative_eq!(data[16 * 33 + 16], -8.0, epsilon = 1e-2);
    }

    #[test]
    fn metrics_report_auto_framing() {
        let mut job = DistanceFieldJob::new(Shape::from_contours([square(0.0, 0.0, 10.0)]), FieldMode::Multi, 32, 32)
            .unwrap()
            .with_settings(JobSettings::default().with_range(Range::Pixels(4.0)));
        job.run().unwrap();

        let metrics = job.metrics().unwrap();
        assert!(!metrics.inverse_y);
        assert_relative_eq!(metrics.scale.unwrap(), 2.8, epsilon = 1e-12);
        assert_relative_eq!(metrics.range, 4.0 / 2.8, epsilon = 1e-12);
        let text = metrics.to_string();
        assert!(text.starts_with("bounds = 0, 0, 10, 10\n"));
        assert!(text.contains("translate = "));
        assert!(text.ends_with(&format!("range = {}\n", metrics.range)));
    }

    #[test]
    fn preview_of_single_channel_field() {
        let mut job = DistanceFieldJob::new(Shape::from_contours([square(0.0, 0.0, 4.0)]), FieldMode::Single, 16, 16)
            .unwrap();
        job.run().unwrap();

        let mut preview = AnyBitmap::new_float(16, 16, 3).unwrap();
        job.test_render(&mut preview).unwrap();
        let data = preview.float_data().unwrap();
        let center = &data[(8 * 16 + 8) * 3..][..3];
        assert_eq!(center, [1.0, 1.0, 1.0]);
        assert_eq!(&data[..3], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn byte_export() {
        let mut job = DistanceFieldJob::new(Shape::from_contours([square(0.0, 0.0, 4.0)]), FieldMode::Pseudo, 8, 8)
            .unwrap();
        job.run().unwrap();
        let bytes = job.to_bytes().unwrap();
        assert_eq!(bytes.element_type(), sdf::ElementType::Byte);
        match bytes.pixel_data() {
            sdf::PixelData::Byte(data) => {
                assert_eq!(data.len(), 64);
                assert!(data[4 * 8 + 4] > 128);
                assert!(data[0] < 128);
            }
            sdf::PixelData::Float(_) => panic!("expected bytes"),
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

mod error_handling {
    use super::*;
    use outline::{ErrorLog, LoggedError};

    fn open_shape() -> Shape {
        let mut contour = Contour::new();
        contour.push(EdgeSegment::line(Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)));
        contour.push(EdgeSegment::line(Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)));
        Shape::from_contours([contour])
    }

    #[test]
    fn invalid_geometry_is_reported() {
        let mut job = DistanceFieldJob::new(open_shape(), FieldMode::Single, 8, 8)
            .unwrap()
            .with_settings(JobSettings::default().with_normalize(false));
        let err = job.run().unwrap_err();
        assert!(err.is_invalid_geometry());

        // Normalization repairs the same shape.
        let mut repaired = DistanceFieldJob::new(open_shape(), FieldMode::Single, 8, 8).unwrap();
        assert!(repaired.run().is_ok());
    }

    #[test]
    fn range_too_wide_for_frame() {
        let mut job = DistanceFieldJob::new(Shape::from_contours([square(0.0, 0.0, 1.0)]), FieldMode::Single, 8, 8)
            .unwrap()
            .with_settings(JobSettings::default().with_range(Range::Pixels(8.0)));
        let err = job.run().unwrap_err();
        assert_eq!(err, SdfError::DegenerateFraming { width: 8, height: 8 });
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let settings = JobSettings::default().with_error_correction_threshold(-1.0);
        let mut job = DistanceFieldJob::new(Shape::from_contours([square(0.0, 0.0, 1.0)]), FieldMode::Multi, 8, 8)
            .unwrap()
            .with_settings(settings);
        assert!(matches!(job.run(), Err(SdfError::ArgumentOutOfRange { .. })));
    }

    #[test]
    fn error_log_collects_job_failures() {
        let mut log = ErrorLog::new();
        let bad = DistanceFieldJob::new(open_shape(), FieldMode::Multi, 8, 8)
            .unwrap()
            .with_settings(JobSettings::default().with_normalize(false));
        for _ in 0..40 {
            let mut job = bad.clone();
            assert!(log.record(job.run()).is_none());
        }
        assert!(log.is_full());
        assert_eq!(log.pop(), Some(LoggedError::QueueFull));
        assert!(matches!(
            log.pop(),
            Some(LoggedError::Sdf(SdfError::InvalidGeometry(_)))
        ));
    }
}
