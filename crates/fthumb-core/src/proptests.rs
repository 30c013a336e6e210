use crate::layout::{centered_origin, fit_scale, Fit, Inset};
use crate::types::TextExtents;
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

// Property: the scaled ink box never exceeds the target box, and the
// constraining axis is filled exactly
proptest! {
    #[test]
    fn prop_fit_stays_inside_target(
        natural_w in 0.01f64..10_000.0,
        natural_h in 0.01f64..10_000.0,
        target_w in 1u32..10_000,
        target_h in 1u32..10_000,
    ) {
        let natural = TextExtents {
            x_bearing: 0.0,
            y_bearing: -natural_h,
            width: natural_w,
            height: natural_h,
            x_advance: natural_w,
        };
        let (tw, th) = (target_w as f64, target_h as f64);
        let (fit, scale) = fit_scale(&natural, 100.0, tw, th);
        let factor = scale / 100.0;
        let (scaled_w, scaled_h) = (natural_w * factor, natural_h * factor);

        prop_assert!(scaled_w <= tw * (1.0 + EPSILON));
        prop_assert!(scaled_h <= th * (1.0 + EPSILON));
        match fit {
            Fit::Height => prop_assert!((scaled_h - th).abs() <= th * EPSILON),
            Fit::Width => prop_assert!((scaled_w - tw).abs() <= tw * EPSILON),
        }
    }
}

// Property: margin is floor(height / 20) and the inset shrinks both axes by twice that
proptest! {
    #[test]
    fn prop_margin_invariant(width in 1u32..5_000, height in 1u32..5_000) {
        let margin = height / 20;
        match Inset::for_canvas(width, height) {
            Ok(inset) => {
                prop_assert_eq!(inset.margin, margin);
                prop_assert_eq!(inset.width, width - 2 * margin);
                prop_assert_eq!(inset.height, height - 2 * margin);
            },
            Err(_) => prop_assert!(width <= 2 * margin),
        }
    }
}

// Property: the centered origin always puts the ink center on the box center
proptest! {
    #[test]
    fn prop_origin_centers_ink(
        x_bearing in -500.0f64..500.0,
        y_bearing in -500.0f64..500.0,
        width in 0.1f64..1_000.0,
        height in 0.1f64..1_000.0,
        target_w in 1.0f64..2_000.0,
        target_h in 1.0f64..2_000.0,
    ) {
        let ext = TextExtents { x_bearing, y_bearing, width, height, x_advance: width };
        let (x, y) = centered_origin(&ext, target_w, target_h);
        let (cx, cy) = ext.ink_center();
        prop_assert!((x + cx - target_w / 2.0).abs() < 1e-6);
        prop_assert!((y + cy - target_h / 2.0).abs() < 1e-6);
    }
}
