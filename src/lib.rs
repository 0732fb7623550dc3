//! A CPU-based software rasterizer.
//!
//! This crate implements a complete software rendering pipeline: meshes are
//! loaded from Wavefront OBJ files, transformed through a model/view/projection
//! matrix stack, projected to screen space and filled pixel by pixel with
//! perspective-correct texture sampling, z-buffer depth testing and back-face
//! culling. SDL2 is used only by the demo shell for window management and
//! display; all rendering happens on the CPU.
//!
//! # Quick Start
//!
//! ```ignore
//! use rastly::prelude::*;
//!
//! let mut pipeline = Pipeline::new(800, 600)?;
//! pipeline.set_projection();
//! let mesh = Mesh::load("assets/model.obj").triangulated();
//!
//! pipeline.clear(color::BACKGROUND);
//! pipeline.render(&mesh);
//! ```

pub mod color;
pub mod math;
pub mod mesh;
pub mod polygon;
pub mod render;
pub mod texture;
pub mod triangle;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use mesh::{Face, Mesh};
pub use render::{CullMode, FrameBuffer, InitError, Pipeline, Winding};
pub use texture::Texture;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use rastly::prelude::*;
/// ```
pub mod prelude {
    // Colors
    pub use crate::color;

    // Geometry
    pub use crate::mesh::{Face, Mesh};
    pub use crate::polygon::Polygon;
    pub use crate::triangle::{Rect, Triangle2, Weights};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::render::{CullMode, FrameBuffer, InitError, Pipeline, Winding};
    pub use crate::texture::Texture;

    // Window
    pub use crate::window::{FpsCounter, FrameLimiter, Window, WindowEvent};
}
