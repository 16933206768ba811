//! Property-based tests for field generation and correction.
//!
//! Run with: cargo test -p outline-sdf -- proptest

use nalgebra::Vector2;
use outline_sdf::{
    AnyBitmap, Bitmap, FieldEncoding, FieldMode, FieldSpace, GeneratorConfig, Projection,
    correct_errors, correct_signs, generate_field, pseudo_distance_at,
};
use outline_types::math::median;
use outline_types::{Contour, FillRule, Point2, Shape};
use proptest::prelude::*;

const SIZE: usize = 12;

// =============================================================================
// Strategies
// =============================================================================

/// Polygons inside the bitmap area; they may self-intersect.
fn arb_shape() -> impl Strategy<Value = Shape> {
    (
        prop::collection::vec(
            prop::array::uniform2(0.5..(SIZE as f64 - 0.5)).prop_map(|[x, y]| Point2::new(x, y)),
            3..9,
        ),
        prop_oneof![
            Just(FillRule::NonZero),
            Just(FillRule::Odd),
            Just(FillRule::Positive),
            Just(FillRule::Negative),
        ],
    )
        .prop_map(|(points, fill_rule)| {
            let mut shape = Shape::from_contours([Contour::polygon(&points)]);
            shape.fill_rule = fill_rule;
            shape
        })
}

fn arb_space() -> impl Strategy<Value = FieldSpace> {
    (
        0.5..4.0f64,
        prop_oneof![Just(FieldEncoding::Normalized), Just(FieldEncoding::Distance)],
    )
        .prop_map(|(range, encoding)| {
            FieldSpace::new(Projection::new(Vector2::new(1.0, 1.0), Vector2::zeros()), range, encoding)
                .unwrap()
        })
}

fn arb_multi_bitmap() -> impl Strategy<Value = AnyBitmap> {
    (2..10usize, 2..10usize, any::<bool>()).prop_flat_map(|(w, h, with_alpha)| {
        prop::collection::vec(prop::array::uniform4(0.0..1.0f32), w * h).prop_map(move |pixels| {
            if with_alpha {
                AnyBitmap::Float4(Bitmap::from_pixels(w, h, pixels).unwrap())
            } else {
                let pixels = pixels.into_iter().map(|p| [p[0], p[1], p[2]]).collect();
                AnyBitmap::Float3(Bitmap::from_pixels(w, h, pixels).unwrap())
            }
        })
    })
}

fn verdict(shape: &Shape, space: &FieldSpace, x: usize, y: usize) -> bool {
    shape.is_filled(&space.projection.pixel_center(x, y))
}

// =============================================================================
// Error Correction
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_error_correction_is_idempotent(
        bitmap in arb_multi_bitmap(),
        threshold in 0.0..3.0f64,
        range in 0.5..8.0f64,
    ) {
        let space = FieldSpace::new(Projection::identity(), range, FieldEncoding::Normalized).unwrap();
        let mut once = bitmap;
        correct_errors(&mut once, &space, threshold, true).unwrap();
        let mut twice = once.clone();
        let summary = correct_errors(&mut twice, &space, threshold, false).unwrap();
        prop_assert_eq!(summary.channels_replaced, 0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn proptest_error_correction_keeps_true_channel(
        bitmap in arb_multi_bitmap(),
        threshold in 0.0..3.0f64,
    ) {
        let space = FieldSpace::new(Projection::identity(), 2.0, FieldEncoding::Normalized).unwrap();
        let before = bitmap.clone();
        let mut after = bitmap;
        correct_errors(&mut after, &space, threshold, true).unwrap();
        if let (AnyBitmap::Float4(a), AnyBitmap::Float4(b)) = (&before, &after) {
            for (p, q) in a.pixels().iter().zip(b.pixels()) {
                prop_assert_eq!(p[3], q[3]);
            }
        }
    }
}

// =============================================================================
// Sign Correction
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_signs_agree_with_fill_rule(
        shape in arb_shape(),
        space in arb_space(),
        mode in prop_oneof![
            Just(FieldMode::Single),
            Just(FieldMode::Pseudo),
            Just(FieldMode::Multi),
            Just(FieldMode::MultiAndTrue),
        ],
    ) {
        let mut field = AnyBitmap::new_float(SIZE, SIZE, mode.channels()).unwrap();
        generate_field(&shape, &space, mode, &GeneratorConfig::legacy(), &mut field).unwrap();
        correct_signs(&mut field, &shape, &space, shape.fill_rule, true).unwrap();

        let mid = space.midpoint();
        let channels = mode.channels();
        let data = field.float_data().unwrap();
        for y in 0..SIZE {
            for x in 0..SIZE {
                let pixel = &data[(y * SIZE + x) * channels..][..channels];
                let fill = verdict(&shape, &space, x, y);
                let sd = if channels == 1 { pixel[0] } else { median(pixel[0], pixel[1], pixel[2]) };
                // Values exactly on the midpoint carry no sign.
                if sd != mid {
                    prop_assert_eq!(space.is_inside(sd), fill, "pixel ({}, {})", x, y);
                }
                if channels == 4 && pixel[3] != mid {
                    prop_assert_eq!(space.is_inside(pixel[3]), fill, "alpha ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn proptest_current_generator_needs_no_sign_fixes(
        shape in arb_shape(),
        space in arb_space(),
    ) {
        let mut field = AnyBitmap::new_float(SIZE, SIZE, 1).unwrap();
        generate_field(&shape, &space, FieldMode::Single, &GeneratorConfig::default(), &mut field).unwrap();
        let summary = correct_signs(&mut field, &shape, &space, shape.fill_rule, false).unwrap();
        prop_assert_eq!(summary.total_flipped(), 0);
    }
}

// =============================================================================
// Generation
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_parallel_matches_sequential(
        shape in arb_shape(),
        space in arb_space(),
        overlap in any::<bool>(),
        legacy in any::<bool>(),
    ) {
        let base = if legacy { GeneratorConfig::legacy() } else { GeneratorConfig::default() };
        let base = base.with_overlap_support(overlap);
        let mut a = AnyBitmap::new_float(SIZE, SIZE, 4).unwrap();
        let mut b = AnyBitmap::new_float(SIZE, SIZE, 4).unwrap();
        generate_field(&shape, &space, FieldMode::MultiAndTrue, &base.with_parallel(true), &mut a).unwrap();
        generate_field(&shape, &space, FieldMode::MultiAndTrue, &base.with_parallel(false), &mut b).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn proptest_sampler_sign_matches_containment(
        shape in arb_shape(),
        x in 0.0..(SIZE as f64),
        y in 0.0..(SIZE as f64),
    ) {
        let point = Point2::new(x, y);
        if let Some(sample) = pseudo_distance_at(&shape, &point, false) {
            if sample.distance != 0.0 {
                prop_assert_eq!(sample.distance < 0.0, shape.is_filled(&point));
            }
        }
    }
}
