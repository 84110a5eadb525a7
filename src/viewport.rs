//! Normalized-to-pixel coordinate mapping.
//!
//! The simulation reports every position as a fraction of the world's extent
//! (`[0, 1]` on each axis). The viewport maps those fractions linearly onto a
//! raster surface of fixed pixel dimensions: `pixel = normalized * dimension`.
//! Rotation is dimensionless and passes through untouched.
//!
//! The viewport is built once at driver startup and never changes afterwards;
//! the device scale factor is read at the same time and folded into the pixel
//! dimensions.

/// Map a normalized coordinate onto a surface dimension.
///
/// Pure multiply; no rounding, no clamping. Out-of-range inputs simply map
/// off-surface and get clipped by the surface itself.
#[inline]
pub fn to_pixel(normalized: f32, dimension: f32) -> f32 {
    normalized * dimension
}

/// Food markers span 0.5% of the surface width.
const FOOD_RADIUS_FRACTION: f32 = 0.005;

/// Animal markers span 1% of the surface width.
const ANIMAL_SIZE_FRACTION: f32 = 0.01;

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Pixel dimensions of the drawing surface, fixed at driver initialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Surface width in physical pixels.
    pub width: f32,
    /// Surface height in physical pixels.
    pub height: f32,
    /// Device scale factor captured at startup (1.0 on standard-density
    /// displays). Already folded into `width`/`height` when the viewport is
    /// built via [`from_logical`](Self::from_logical).
    pub scale_factor: f64,
}

impl Viewport {
    /// Build a viewport from physical pixel dimensions.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive and finite.
    pub fn new(width: f32, height: f32, scale_factor: f64) -> Self {
        assert!(
            width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite(),
            "viewport dimensions must be positive and finite, got {width}x{height}"
        );
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Build a viewport from logical dimensions and the device scale factor.
    ///
    /// The scale factor is applied uniformly to both axes, matching how the
    /// windowing system sizes the underlying surface.
    pub fn from_logical(logical_width: u32, logical_height: u32, scale_factor: f64) -> Self {
        Self::new(
            (logical_width as f64 * scale_factor) as f32,
            (logical_height as f64 * scale_factor) as f32,
            scale_factor,
        )
    }

    /// Map a normalized X coordinate to a pixel column.
    #[inline]
    pub fn pixel_x(&self, normalized_x: f32) -> f32 {
        to_pixel(normalized_x, self.width)
    }

    /// Map a normalized Y coordinate to a pixel row.
    #[inline]
    pub fn pixel_y(&self, normalized_y: f32) -> f32 {
        to_pixel(normalized_y, self.height)
    }

    /// Radius of a food marker, derived from the surface width.
    #[inline]
    pub fn food_radius(&self) -> f32 {
        FOOD_RADIUS_FRACTION * self.width
    }

    /// Size of an animal marker, derived from the surface width.
    #[inline]
    pub fn animal_size(&self) -> f32 {
        ANIMAL_SIZE_FRACTION * self.width
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn to_pixel_is_exact_multiplication() {
        assert_eq!(to_pixel(0.5, 800.0), 400.0);
        assert_eq!(to_pixel(0.75, 600.0), 450.0);
        assert_eq!(to_pixel(0.0, 1234.0), 0.0);
        assert_eq!(to_pixel(1.0, 1234.0), 1234.0);
    }

    #[test]
    fn marker_sizes_derive_from_width_only() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        assert_eq!(viewport.food_radius(), 4.0);
        assert_eq!(viewport.animal_size(), 8.0);

        // Height never enters the sizing rule.
        let tall = Viewport::new(800.0, 2000.0, 1.0);
        assert_eq!(tall.food_radius(), 4.0);
        assert_eq!(tall.animal_size(), 8.0);
    }

    #[test]
    fn from_logical_applies_scale_factor_uniformly() {
        let viewport = Viewport::from_logical(800, 600, 2.0);
        assert_eq!(viewport.width, 1600.0);
        assert_eq!(viewport.height, 1200.0);
        assert_eq!(viewport.scale_factor, 2.0);
    }

    #[test]
    fn scale_factor_one_is_identity() {
        let viewport = Viewport::from_logical(800, 600, 1.0);
        assert_eq!(viewport.width, 800.0);
        assert_eq!(viewport.height, 600.0);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn zero_width_panics() {
        let _ = Viewport::new(0.0, 600.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn non_finite_height_panics() {
        let _ = Viewport::new(800.0, f32::NAN, 1.0);
    }

    proptest! {
        /// `pixel = normalized * dimension` holds bit-exactly for every
        /// normalized input and surface dimension.
        #[test]
        fn to_pixel_matches_multiplication(
            normalized in 0.0f32..=1.0,
            dimension in 1.0f32..=8192.0,
        ) {
            prop_assert_eq!(to_pixel(normalized, dimension), normalized * dimension);
        }

        /// Mapping is monotone on each axis for in-range coordinates.
        #[test]
        fn to_pixel_is_monotone(
            a in 0.0f32..=1.0,
            b in 0.0f32..=1.0,
            dimension in 1.0f32..=8192.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(to_pixel(lo, dimension) <= to_pixel(hi, dimension));
        }
    }
}
