//! 3D polygons with per-corner attribute bundles.

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::triangle::Weights;

/// A triangle in 3D space together with its per-corner attributes.
///
/// This is the unit of work handed to the rasterization pipeline: three
/// positions plus the texture coordinate and normal belonging to each corner.
/// Plain record, freely copied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polygon {
    pub vertices: [Vec3; 3],
    pub texcoords: [Vec2; 3],
    pub normals: [Vec3; 3],
}

impl Default for Polygon {
    fn default() -> Self {
        Self {
            vertices: [Vec3::ZERO; 3],
            texcoords: [Vec2::ZERO; 3],
            normals: [Vec3::ZERO; 3],
        }
    }
}

impl Polygon {
    /// Create a polygon from three vertices, with zeroed attributes.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: [v0, v1, v2],
            ..Self::default()
        }
    }

    /// The vertex centroid of the polygon.
    pub fn center(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    /// Classifies a point against this polygon and recovers its barycentric
    /// weights, using Cramer's rule over the edge vectors.
    ///
    /// The point is assumed to lie in the polygon's plane. The inside test
    /// tolerates a small negative epsilon so points exactly on an edge are not
    /// rejected by rounding. Degenerate polygons (vertices aligned on a line)
    /// classify every point as outside.
    pub fn barycentric_inside(&self, point: Vec3) -> (bool, Weights) {
        let v0v1 = self.vertices[1] - self.vertices[0];
        let v0v2 = self.vertices[2] - self.vertices[0];
        let v0p = point - self.vertices[0];

        let d00 = v0v1.dot(v0v1);
        let d01 = v0v1.dot(v0v2);
        let d11 = v0v2.dot(v0v2);
        let d20 = v0p.dot(v0v1);
        let d21 = v0p.dot(v0v2);

        let denom = d00 * d11 - d01 * d01;
        if denom.abs() < 1e-6 {
            return (false, Weights::ZERO);
        }

        let w1 = (d11 * d20 - d01 * d21) / denom;
        let w2 = (d00 * d21 - d01 * d20) / denom;
        let w0 = 1.0 - w1 - w2;

        const EPSILON: f32 = -1e-6;
        let inside = w0 >= EPSILON && w1 >= EPSILON && w2 >= EPSILON;
        (inside, Weights { w0, w1, w2 })
    }
}
