//! Planar geometry for the tiling: vectors, regular polygons, and the
//! tolerances that decide when two coordinates name the same point.
//!
//! This module provides the foundational types for board generation:
//! - `Vec2`: a point or direction in the plane
//! - `RegularPolygon`: a polygon in plane coordinates, before its vertices are
//!   merged into a tiling
//! - `interior_angle` / `center_distance`: the two constants every growth step
//!   is derived from
//!
//! All boards share one edge length, so polygons of any degree fit together
//! edge to edge.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Mul, Neg, Sub};

/// Length of every polygon edge on the board
pub const EDGE_LEN: f64 = 40.0;

/// Two coordinates closer than this are the same board point
pub const NEARBY_TOLERANCE: f64 = 1e-3;

/// Tolerance for comparing angles and gap/angle ratios
pub const ANGLE_TOLERANCE: f64 = 1e-3;

/// Tolerance for the edge-length test when linking graph neighbors
pub const LINK_TOLERANCE: f64 = 0.01;

/// Fewest sides a polygon can have
pub const MIN_DEGREE: u32 = 3;

/// One full turn in radians
pub const FULL_TURN: f64 = 2.0 * PI;

/// Stable index of a point on the board
pub type PointId = usize;

/// Stable index of a polygon on the board
pub type PolygonId = usize;

/// Absolute-difference comparison
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// Angle a regular n-gon claims around one of its vertices: π − 2π/n.
pub fn interior_angle(degree: u32) -> f64 {
    PI - FULL_TURN / degree as f64
}

/// Distance from a vertex of a regular n-gon to its center.
pub fn center_distance(degree: u32) -> f64 {
    let theta = FULL_TURN / degree as f64;
    (EDGE_LEN * EDGE_LEN / (2.0 * (1.0 - theta.cos()))).sqrt()
}

/// A point or direction in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// The origin
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    /// Create a new vector
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of length `radius` pointing at angle `theta`
    pub fn from_polar(radius: f64, theta: f64) -> Self {
        Self::new(radius * theta.cos(), radius * theta.sin())
    }

    /// Multiply both components by `k`
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    /// Rotate counter-clockwise by `theta` radians
    pub fn rotate(self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Euclidean length
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).magnitude()
    }

    /// Whether two coordinates name the same board point
    pub fn nearby(self, other: Vec2) -> bool {
        self.distance(other) < NEARBY_TOLERANCE
    }

    /// Polar angle in (−π, π]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Polar angle normalized to [0, 2π)
    pub fn heading(self) -> f64 {
        let theta = self.angle();
        if theta < 0.0 {
            theta + FULL_TURN
        } else {
            theta
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, k: f64) -> Vec2 {
        self.scale(k)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Signed area of the triangle (a, b, c), doubled
fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Which side of the line a→b the point c lies on. Collinear counts as negative.
fn side(a: Vec2, b: Vec2, c: Vec2) -> i8 {
    if orientation(a, b, c) > 0.0 {
        1
    } else {
        -1
    }
}

/// A regular polygon in plane coordinates.
///
/// Vertices are listed in walk order starting from the vertex the polygon was
/// built from; edge `i` joins vertex `i` to vertex `i + 1` (wrapping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularPolygon {
    /// Number of sides
    pub degree: u32,
    /// Center of the circumscribed circle
    pub center: Vec2,
    /// Vertices in walk order
    pub vertices: Vec<Vec2>,
}

impl RegularPolygon {
    /// Build a regular polygon from its center, one vertex, and its degree.
    ///
    /// Each step turns the vector toward the center by half the interior angle
    /// and walks one edge length along it.
    pub fn new(center: Vec2, first_vertex: Vec2, degree: u32) -> Self {
        let half_angle = interior_angle(degree) / 2.0;
        let mut vertices = Vec::with_capacity(degree as usize);
        let mut current = first_vertex;
        for _ in 0..degree {
            vertices.push(current);
            let toward_center = center - current;
            let step = toward_center.scale(EDGE_LEN / toward_center.magnitude());
            current = current + step.rotate(half_angle);
        }
        Self {
            degree,
            center,
            vertices,
        }
    }

    /// Edges as coordinate pairs, in walk order
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Whether `p` is one of this polygon's vertices (within tolerance)
    pub fn has_vertex(&self, p: Vec2) -> bool {
        self.vertices.iter().any(|v| v.nearby(p))
    }

    /// Point-in-polygon test.
    ///
    /// Edge winding is not canonical, so every edge is judged against the side
    /// the center falls on.
    pub fn contains(&self, p: Vec2) -> bool {
        self.edges()
            .all(|(a, b)| side(a, b, self.center) == side(a, b, p))
    }
}
