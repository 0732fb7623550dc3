//! The software rasterization pipeline.
//!
//! A [`Pipeline`] owns a framebuffer and the projection/view/model matrix
//! stack. Each mesh face is transformed to clip space, perspective-divided,
//! mapped to screen space, culled by screen-space winding and scan-converted
//! over its bounding box with per-pixel barycentric coverage tests, z-buffer
//! depth testing and perspective-correct texture sampling.
//!
//! # Depth convention
//!
//! The projection matrix is the standard right-handed OpenGL form, so the
//! clip-space w component equals the view depth of the vertex (positive in
//! front of the camera, `near` at the near plane, `far` at the far plane).
//! The perspective divide is by w; w itself is kept as the vertex depth,
//! interpolated as 1/w across the triangle and stored in the z-buffer. Under
//! an identity matrix stack w is 1, so NDC positions pass through unchanged.
//!
//! # Lifecycle
//!
//! Construction allocates every buffer (failing with [`InitError`] on invalid
//! dimensions); dropping the pipeline releases them. Buffers are recreated
//! only by [`Pipeline::resize`]. All operations are sequential and run to
//! completion; per-primitive failures (degenerate triangles, divides that
//! produce non-finite values) skip the primitive and are never fatal.

use std::path::Path;

use super::{CullMode, FrameBuffer, InitError, Winding};
use crate::color;
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::mesh::{Face, Mesh};
use crate::polygon::Polygon;
use crate::texture::Texture;
use crate::triangle::{signed_area, Triangle2};

/// Default vertical field of view (45 degrees).
pub const DEFAULT_FOV: f32 = std::f32::consts::FRAC_PI_4;
/// Default near clipping distance.
pub const DEFAULT_NEAR: f32 = 0.1;
/// Default far clipping distance.
pub const DEFAULT_FAR: f32 = 1000.0;

/// CPU rasterization pipeline with exclusive ownership of its buffers.
pub struct Pipeline {
    framebuffer: FrameBuffer,
    projection: Mat4,
    view: Mat4,
    model: Mat4,
    pub cull_mode: CullMode,
    pub winding: Winding,
    fov_y: f32,
    near: f32,
    far: f32,
    texture: Option<Texture>,
}

impl Pipeline {
    /// Create a pipeline rendering into a `width` x `height` framebuffer.
    ///
    /// All three matrices start as identity; call [`Pipeline::set_projection`]
    /// to install the perspective projection.
    pub fn new(width: u32, height: u32) -> Result<Self, InitError> {
        Ok(Self {
            framebuffer: FrameBuffer::new(width, height)?,
            projection: Mat4::identity(),
            view: Mat4::identity(),
            model: Mat4::identity(),
            cull_mode: CullMode::default(),
            winding: Winding::default(),
            fov_y: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            texture: None,
        })
    }

    /// Recreate the framebuffer at a new size.
    ///
    /// Matrices are left untouched; call [`Pipeline::set_projection`]
    /// afterwards to refresh the aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), InitError> {
        self.framebuffer = FrameBuffer::new(width, height)?;
        Ok(())
    }

    /// Build the perspective projection from the stored fov/near/far
    /// parameters and the framebuffer's aspect ratio.
    pub fn set_projection(&mut self) {
        let aspect = self.framebuffer.width() as f32 / self.framebuffer.height() as f32;
        self.projection = Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far);
    }

    /// Replace the view matrix.
    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    /// Replace the model matrix.
    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Set the vertical field of view (radians). Takes effect on the next
    /// [`Pipeline::set_projection`].
    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    /// Near clipping distance.
    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near;
    }

    /// Far clipping distance.
    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far;
    }

    /// Bind a texture, replacing and releasing any prior binding.
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    /// Remove the texture binding; fragments render opaque white.
    pub fn clear_texture(&mut self) {
        self.texture = None;
    }

    /// The currently bound texture, if any.
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Decode a texture file and bind it.
    ///
    /// On failure the previous binding is left untouched.
    pub fn load_texture<P: AsRef<Path>>(&mut self, path: P) -> Result<(), image::ImageError> {
        let texture = Texture::from_file(path)?;
        self.texture = Some(texture);
        Ok(())
    }

    /// Fill the color plane with `color` and reset the z-buffer to the far
    /// plane, so any fragment in `[near, far]` passes the next depth test.
    pub fn clear(&mut self, color: u32) {
        self.framebuffer.clear(color, self.far);
    }

    /// The render target.
    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// Copy the color plane into a host surface of matching size.
    pub fn present_to(&self, dest: &mut [u32]) {
        self.framebuffer.present_to(dest);
    }

    /// Rasterize every 3-corner face of the mesh into the framebuffer.
    ///
    /// Faces with any other arity are skipped (run the mesh through
    /// [`Mesh::triangulated`] first to render n-gons). Out-of-range attribute
    /// indices resolve to a zero attribute for that corner.
    pub fn render(&mut self, mesh: &Mesh) {
        // combined matrix; right-to-left, so the model transform applies first
        let matrix = self.projection * self.view * self.model;

        for face in &mesh.faces {
            if face.arity() != 3 {
                continue;
            }
            let polygon = gather_polygon(face, mesh);
            self.draw_polygon(&polygon, &matrix);
        }
    }

    /// Transform a model-space vertex to screen space.
    ///
    /// Returns the screen position and the view depth (clip-space w), or None
    /// when the vertex lands on the camera plane and the divide would blow up.
    fn transform_vertex(&self, vertex: Vec3, matrix: &Mat4) -> Option<(Vec2, f32)> {
        let clip = *matrix * Vec4::from_vec3(vertex, 1.0);
        let depth = clip.w;
        if !depth.is_finite() || depth.abs() < f32::EPSILON {
            return None;
        }

        // perspective divide: clip space -> NDC [-1, 1]
        let ndc_x = clip.x / depth;
        let ndc_y = clip.y / depth;
        if !ndc_x.is_finite() || !ndc_y.is_finite() {
            return None;
        }

        // NDC -> screen space, flipping Y to the top-left origin
        let width = self.framebuffer.width() as f32;
        let height = self.framebuffer.height() as f32;
        let screen = Vec2::new(
            (ndc_x + 1.0) * 0.5 * width,
            (1.0 - ndc_y) * 0.5 * height,
        );
        Some((screen, depth))
    }

    fn draw_polygon(&mut self, polygon: &Polygon, matrix: &Mat4) {
        let mut screen = [Vec2::ZERO; 3];
        let mut depth = [0.0f32; 3];
        for corner in 0..3 {
            match self.transform_vertex(polygon.vertices[corner], matrix) {
                Some((position, view_depth)) => {
                    screen[corner] = position;
                    depth[corner] = view_depth;
                }
                None => return,
            }
        }

        // screen-space winding decides the cull
        match self.cull_mode {
            CullMode::None => {}
            CullMode::Both => return,
            CullMode::Front | CullMode::Back => {
                let cross = signed_area(screen[0], screen[1], screen[2]);
                let rejected = match self.winding {
                    Winding::Cw => cross >= 0.0,
                    Winding::Ccw => cross <= 0.0,
                };
                if rejected {
                    return;
                }
            }
        }

        // invert depths for perspective-correct interpolation, and pre-divide
        // the texcoords by depth so the final multiply by z recovers them
        let mut inv_depth = [0.0f32; 3];
        let mut uv_over_z = [Vec2::ZERO; 3];
        for corner in 0..3 {
            let inv = 1.0 / depth[corner];
            if !inv.is_finite() {
                return;
            }
            inv_depth[corner] = inv;
            uv_over_z[corner] = polygon.texcoords[corner] * inv;
        }

        let tri = Triangle2::new(screen[0], screen[1], screen[2]);
        let bbox = tri.bounding_rect();
        let width = self.framebuffer.width() as f32;
        let height = self.framebuffer.height() as f32;

        // trivially reject triangles entirely outside the framebuffer
        if bbox.max.x < 0.0 || bbox.min.x >= width || bbox.max.y < 0.0 || bbox.min.y >= height {
            return;
        }

        // clamp the bounding box to the framebuffer rectangle
        let x0 = bbox.min.x.floor().max(0.0) as u32;
        let x1 = bbox.max.x.floor().min(width - 1.0).max(0.0) as u32;
        let y0 = bbox.min.y.floor().max(0.0) as u32;
        let y1 = bbox.max.y.floor().min(height - 1.0).max(0.0) as u32;

        let texture = self.texture.as_ref();

        for y in y0..=y1 {
            for x in x0..=x1 {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let (inside, weights) = tri.barycentric_inside(sample);
                if !inside {
                    continue;
                }

                // guard rounding slop on shared edges
                let w0 = weights.w0.clamp(0.0, 1.0);
                let w1 = weights.w1.clamp(0.0, 1.0);
                let w2 = weights.w2.clamp(0.0, 1.0);

                let inv_z = inv_depth[0] * w0 + inv_depth[1] * w1 + inv_depth[2] * w2;
                let z = 1.0 / inv_z;
                if !z.is_finite() || z < self.near || z > self.far {
                    continue;
                }
                if !self.framebuffer.depth_test_and_set(x, y, z) {
                    continue;
                }

                let pixel = match texture {
                    Some(tex) => {
                        let u = ((uv_over_z[0].x * w0 + uv_over_z[1].x * w1 + uv_over_z[2].x * w2)
                            * z)
                            .clamp(0.0, 1.0);
                        let v = ((uv_over_z[0].y * w0 + uv_over_z[1].y * w1 + uv_over_z[2].y * w2)
                            * z)
                            .clamp(0.0, 1.0);
                        let tx = (u * tex.width() as f32).floor() as u32;
                        let ty = (v * tex.height() as f32).floor() as u32;
                        let [r, g, b, _a] = tex.texel(tx, ty);
                        color::pack(r, g, b)
                    }
                    None => color::WHITE,
                };
                self.framebuffer.set_pixel(x, y, pixel);
            }
        }
    }
}

/// Resolve a face's corner indices against the mesh attribute arrays.
///
/// Absent or out-of-range references leave the corner's attribute at zero.
fn gather_polygon(face: &Face, mesh: &Mesh) -> Polygon {
    let mut polygon = Polygon::default();
    for corner in 0..3 {
        if let Some(&position) = face
            .positions
            .get(corner)
            .and_then(|&i| mesh.vertices.get(i))
        {
            polygon.vertices[corner] = position;
        }
        if let Some(&texcoord) = face
            .texcoords
            .get(corner)
            .and_then(|&i| mesh.texcoords.get(i))
        {
            polygon.texcoords[corner] = texcoord;
        }
        if let Some(&normal) = face.normals.get(corner).and_then(|&i| mesh.normals.get(i)) {
            polygon.normals[corner] = normal;
        }
    }
    polygon
}
