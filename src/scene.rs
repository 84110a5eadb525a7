//! Marker geometry -- pure vertex construction for the two entity glyphs.
//!
//! Animals render as a *directional marker*: a closed three-vertex polygon
//! whose nose points along the animal's heading. Food renders as a *point
//! marker*: a filled circle. Both are expressed here as plain triangle lists
//! in pixel space, with no GPU types involved, so the geometry can be
//! verified headlessly.
//!
//! Angles follow the surface convention: measured from the +Y axis rotating
//! toward +X, so a vertex at angle `theta` and distance `r` from the center
//! sits at `(x - sin(theta) * r, y + cos(theta) * r)`.

use std::f32::consts::PI;

use crate::viewport::Viewport;

/// Number of fan segments used to tessellate a point marker.
///
/// 32 segments keep the silhouette visually round at the radii this driver
/// produces (a fraction of a percent of the surface width).
pub const POINT_MARKER_SEGMENTS: usize = 32;

/// The nose vertex sits 1.5x the marker size from the center; the two tail
/// vertices sit at exactly the marker size.
const NOSE_DISTANCE_FACTOR: f32 = 1.5;

/// Angular separation between the three marker vertices.
const VERTEX_SEPARATION: f32 = 2.0 * PI / 3.0;

// ---------------------------------------------------------------------------
// Marker geometry
// ---------------------------------------------------------------------------

/// A vertex at `angle` radians and `distance` pixels from `(x, y)`.
#[inline]
fn radial_vertex(x: f32, y: f32, angle: f32, distance: f32) -> [f32; 2] {
    [x - angle.sin() * distance, y + angle.cos() * distance]
}

/// The three vertices of a directional marker.
///
/// Nose first, then the two tail vertices in increasing angular order. A
/// non-finite input yields non-finite vertices, which the surface clips to
/// nothing; degenerate geometry is not an error.
pub fn directional_marker(x: f32, y: f32, size: f32, rotation: f32) -> [[f32; 2]; 3] {
    [
        radial_vertex(x, y, rotation, size * NOSE_DISTANCE_FACTOR),
        radial_vertex(x, y, rotation + VERTEX_SEPARATION, size),
        radial_vertex(x, y, rotation + 2.0 * VERTEX_SEPARATION, size),
    ]
}

/// Triangle-fan tessellation of a point marker (full circle, 0 to 2pi).
///
/// Returns `3 * POINT_MARKER_SEGMENTS` vertices forming a triangle list:
/// each segment contributes (center, rim_i, rim_i+1).
pub fn point_marker(x: f32, y: f32, radius: f32) -> Vec<[f32; 2]> {
    let mut vertices = Vec::with_capacity(3 * POINT_MARKER_SEGMENTS);
    for segment in 0..POINT_MARKER_SEGMENTS {
        let start = 2.0 * PI * segment as f32 / POINT_MARKER_SEGMENTS as f32;
        let end = 2.0 * PI * (segment + 1) as f32 / POINT_MARKER_SEGMENTS as f32;
        vertices.push([x, y]);
        vertices.push(radial_vertex(x, y, start, radius));
        vertices.push(radial_vertex(x, y, end, radius));
    }
    vertices
}

// ---------------------------------------------------------------------------
// DrawCommand
// ---------------------------------------------------------------------------

/// One entity to paint, in pixel space.
///
/// Produced by the frame driver from a world snapshot, consumed by the GPU
/// layer. Color is keyed off the marker kind, not carried here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// A triangular glyph indicating position and heading (an animal).
    DirectionalMarker {
        x: f32,
        y: f32,
        size: f32,
        rotation: f32,
    },
    /// A circular glyph indicating position only (a food item).
    PointMarker { x: f32, y: f32, radius: f32 },
}

impl DrawCommand {
    /// A directional marker for an animal at normalized coordinates.
    pub fn for_animal(viewport: &Viewport, x: f32, y: f32, rotation: f32) -> Self {
        Self::DirectionalMarker {
            x: viewport.pixel_x(x),
            y: viewport.pixel_y(y),
            size: viewport.animal_size(),
            rotation,
        }
    }

    /// A point marker for a food item at normalized coordinates.
    pub fn for_food(viewport: &Viewport, x: f32, y: f32) -> Self {
        Self::PointMarker {
            x: viewport.pixel_x(x),
            y: viewport.pixel_y(y),
            radius: viewport.food_radius(),
        }
    }

    /// Append this command's triangle-list vertices to `out`.
    pub fn tessellate(&self, out: &mut Vec<[f32; 2]>) {
        match *self {
            Self::DirectionalMarker {
                x,
                y,
                size,
                rotation,
            } => out.extend(directional_marker(x, y, size, rotation)),
            Self::PointMarker { x, y, radius } => out.extend(point_marker(x, y, radius)),
        }
    }

    /// Number of triangle-list vertices this command tessellates into.
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::DirectionalMarker { .. } => 3,
            Self::PointMarker { .. } => 3 * POINT_MARKER_SEGMENTS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
