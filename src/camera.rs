use glam::{Mat4, Vec3};

/// Fixed orthographic camera framing the unit plane.
///
/// The plane always fills the frustum; letterboxing is done in the fragment
/// shader through `uResolution`, so resizing never touches this camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            half_extent: 0.5,
            near: -1000.0,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 2.0),
        }
    }
}

impl OrthoCamera {
    pub fn projection(&self) -> Mat4 {
        let e = self.half_extent;
        Mat4::orthographic_rh_gl(-e, e, -e, e, self.near, self.far)
    }

    /// View matrix; the mesh sits at the origin so this is also model-view.
    pub fn model_view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }
}
