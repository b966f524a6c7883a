//! Aspect-ratio-preserving image fitting.
//!
//! Scales an image of arbitrary intrinsic size into a bounding box and
//! reports the unused margins ("slack") the caller uses to center it.

use serde::{Deserialize, Serialize};

/// Scaled dimensions plus the leftover margins inside the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fit {
    /// Chosen width, never above the box width.
    pub width: f64,
    /// Chosen height, never above the box height.
    pub height: f64,
    /// Box width minus chosen width.
    pub width_slack: f64,
    /// Box height minus chosen height.
    pub height_slack: f64,
}

/// Fit an image of intrinsic size `width x height` into a `max_width x
/// max_height` box, preserving aspect ratio.
///
/// If the image is relatively wider than the box, width is clamped and
/// height derived; otherwise height is clamped and width derived. A second
/// clamping pass re-checks the derived dimension against its own bound in
/// case of floating-point overshoot on degenerate ratios.
pub fn fit(width: f64, height: f64, max_width: f64, max_height: f64) -> Fit {
    debug_assert!(width > 0.0 && height > 0.0);
    debug_assert!(max_width > 0.0 && max_height > 0.0);

    let ratio = width / height;
    let box_ratio = max_width / max_height;

    let (mut w, mut h) = if ratio > box_ratio {
        // Relatively wider: clamp width, derive height.
        (max_width, max_width / ratio)
    } else {
        // Relatively taller (or equal): clamp height, derive width.
        (max_height * ratio, max_height)
    };

    // Second pass: the derived dimension may still overshoot its bound.
    if h > max_height {
        h = max_height;
        w = max_height * ratio;
    }
    if w > max_width {
        w = max_width;
        h = max_width / ratio;
    }

    Fit {
        width: w,
        height: h,
        width_slack: max_width - w,
        height_slack: max_height - h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_landscape_clamps_width() {
        let f = fit(1600.0, 800.0, 4.5, 5.5);
        assert!((f.width - 4.5).abs() < EPS);
        assert!((f.height - 2.25).abs() < EPS);
        assert!((f.width_slack - 0.0).abs() < EPS);
        assert!((f.height_slack - 3.25).abs() < EPS);
    }

    #[test]
    fn test_portrait_clamps_height() {
        let f = fit(800.0, 1600.0, 4.5, 5.5);
        assert!((f.height - 5.5).abs() < EPS);
        assert!((f.width - 2.75).abs() < EPS);
        assert!((f.height_slack - 0.0).abs() < EPS);
        assert!((f.width_slack - 1.75).abs() < EPS);
    }

    #[test]
    fn test_square_image_in_tall_box() {
        let f = fit(500.0, 500.0, 4.5, 5.5);
        // Square is relatively wider than a 4.5x5.5 box.
        assert!((f.width - 4.5).abs() < EPS);
        assert!((f.height - 4.5).abs() < EPS);
    }

    #[test]
    fn test_exact_box_ratio() {
        let f = fit(450.0, 550.0, 4.5, 5.5);
        assert!((f.width - 4.5).abs() < EPS);
        assert!((f.height - 5.5).abs() < EPS);
        assert!(f.width_slack.abs() < EPS);
        assert!(f.height_slack.abs() < EPS);
    }

    #[test]
    fn test_always_within_bounds_and_ratio_preserved() {
        let cases = [
            (1.0, 1000.0),
            (1000.0, 1.0),
            (3.0, 7.0),
            (1234.0, 777.0),
            (0.1, 0.1),
        ];
        for (w, h) in cases {
            let f = fit(w, h, 4.5, 2.6);
            assert!(f.width <= 4.5 + EPS, "width overflow for {}x{}", w, h);
            assert!(f.height <= 2.6 + EPS, "height overflow for {}x{}", w, h);
            let got = f.width / f.height;
            let want = w / h;
            assert!(
                (got - want).abs() / want < 1e-9,
                "ratio drift for {}x{}",
                w,
                h
            );
        }
    }
}
