//! Viewport state fed to the raymarching shader every frame.
//!
//! [`ViewportSync`] owns the uniform block and keeps it consistent with the
//! window size, the pointer, the clock and the progress control. Nothing here
//! touches the DOM, so the whole module runs (and is tested) on the host.

use glam::{Vec2, Vec4};

/// Aspect ratio of the reference image the shader is authored against.
pub const SQUARE_ASPECT: f32 = 1.0;

/// Scale pair that fits a `target_aspect` frame inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectCorrection {
    pub x: f32,
    pub y: f32,
}

/// Letterbox/pillarbox correction for a `width` x `height` viewport.
///
/// Exactly one component is 1; the other is the proportional scale of the
/// shorter axis. Both dimensions must be positive.
pub fn compute_aspect_correction(width: f32, height: f32, target_aspect: f32) -> AspectCorrection {
    debug_assert!(width > 0.0 && height > 0.0, "viewport must be non-empty");

    if height / width > target_aspect {
        AspectCorrection {
            x: (width / height) * target_aspect,
            y: 1.0,
        }
    } else {
        AspectCorrection {
            x: 1.0,
            y: (height / width) * target_aspect,
        }
    }
}

/// Drawing-buffer size for a CSS-pixel viewport, with the device pixel ratio
/// capped at `max_pixel_ratio`. Never returns a zero dimension.
pub fn drawing_buffer_size(
    css_width: f64,
    css_height: f64,
    device_pixel_ratio: f64,
    max_pixel_ratio: f64,
) -> (u32, u32) {
    let ratio = device_pixel_ratio.min(max_pixel_ratio);
    let scale = |v: f64| ((v * ratio).floor() as u32).max(1);
    (scale(css_width), scale(css_height))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportUniforms {
    pub width: f32,
    pub height: f32,
    pub aspect_x: f32,
    pub aspect_y: f32,
    pub time: f32,
    pub progress: f32,
    pub mouse_x: f32,
    pub mouse_y: f32,
}

impl ViewportUniforms {
    /// `uResolution`: width, height, aspect x, aspect y.
    pub fn resolution(&self) -> Vec4 {
        Vec4::new(self.width, self.height, self.aspect_x, self.aspect_y)
    }

    /// `uMouse`, centred on the viewport with y pointing up.
    pub fn mouse(&self) -> Vec2 {
        Vec2::new(self.mouse_x, self.mouse_y)
    }
}

/// Receives the uniform block once per tick.
pub trait FrameSink {
    fn render(&mut self, uniforms: &ViewportUniforms);
}

impl<F: FnMut(&ViewportUniforms)> FrameSink for F {
    fn render(&mut self, uniforms: &ViewportUniforms) {
        (*self)(uniforms)
    }
}

#[derive(Debug, Clone)]
pub struct ViewportSync {
    uniforms: ViewportUniforms,
    target_aspect: f32,
}

impl ViewportSync {
    pub fn new(width: f32, height: f32, target_aspect: f32) -> Self {
        let mut sync = Self {
            uniforms: ViewportUniforms {
                width,
                height,
                aspect_x: 1.0,
                aspect_y: 1.0,
                time: 0.0,
                progress: 0.0,
                mouse_x: 0.0,
                mouse_y: 0.0,
            },
            target_aspect,
        };
        sync.on_resize(width, height);
        sync
    }

    pub fn uniforms(&self) -> &ViewportUniforms {
        &self.uniforms
    }

    pub fn on_resize(&mut self, width: f32, height: f32) {
        let aspect = compute_aspect_correction(width, height, self.target_aspect);
        self.uniforms.width = width;
        self.uniforms.height = height;
        self.uniforms.aspect_x = aspect.x;
        self.uniforms.aspect_y = aspect.y;
    }

    pub fn on_pointer_move(
        &mut self,
        page_x: f32,
        page_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) {
        self.uniforms.mouse_x = page_x / viewport_width - 0.5;
        self.uniforms.mouse_y = -(page_y / viewport_height) + 0.5;
    }

    /// Advances time and progress, then hands the block to `sink` exactly once.
    pub fn on_tick<S: FrameSink + ?Sized>(&mut self, elapsed: f32, progress: f32, sink: &mut S) {
        self.uniforms.time = elapsed;
        self.uniforms.progress = progress;
        sink.render(&self.uniforms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn landscape_clamps_x() {
        let a = compute_aspect_correction(1920.0, 1080.0, SQUARE_ASPECT);
        assert_eq!(a.x, 1.0);
        assert!(approx(a.y, 0.5625));
    }

    #[test]
    fn portrait_clamps_y() {
        let a = compute_aspect_correction(1080.0, 1920.0, SQUARE_ASPECT);
        assert_eq!(a.y, 1.0);
        assert!(approx(a.x, 0.5625));
    }

    #[test]
    fn square_is_not_portrait() {
        let a = compute_aspect_correction(800.0, 800.0, SQUARE_ASPECT);
        assert_eq!(a, AspectCorrection { x: 1.0, y: 1.0 });
    }

    #[test]
    fn non_square_target_scales_free_axis() {
        // height/width = 1.5 > 1.25, so y is pinned.
        let a = compute_aspect_correction(400.0, 600.0, 1.25);
        assert_eq!(a.y, 1.0);
        assert!(approx(a.x, (400.0 / 600.0) * 1.25));
    }

    #[test]
    fn new_applies_initial_aspect() {
        let sync = ViewportSync::new(1080.0, 1920.0, SQUARE_ASPECT);
        let u = sync.uniforms();
        assert_eq!((u.width, u.height), (1080.0, 1920.0));
        assert_eq!(u.aspect_y, 1.0);
        assert!(approx(u.aspect_x, 0.5625));
        assert_eq!(u.mouse(), Vec2::ZERO);
    }

    #[test]
    fn resize_updates_resolution() {
        let mut sync = ViewportSync::new(1080.0, 1920.0, SQUARE_ASPECT);
        sync.on_resize(1920.0, 1080.0);
        let r = sync.uniforms().resolution();
        assert_eq!(r.x, 1920.0);
        assert_eq!(r.y, 1080.0);
        assert_eq!(r.z, 1.0);
        assert!(approx(r.w, 0.5625));
    }

    #[test]
    fn pointer_is_centred_with_y_up() {
        let mut sync = ViewportSync::new(1000.0, 500.0, SQUARE_ASPECT);
        sync.on_pointer_move(500.0, 250.0, 1000.0, 500.0);
        assert_eq!(sync.uniforms().mouse(), Vec2::ZERO);
        sync.on_pointer_move(750.0, 0.0, 1000.0, 500.0);
        assert!(approx(sync.uniforms().mouse_x, 0.25));
        assert!(approx(sync.uniforms().mouse_y, 0.5));
    }

    #[test]
    fn tick_renders_once_with_fresh_values() {
        let mut sync = ViewportSync::new(640.0, 480.0, SQUARE_ASPECT);
        let mut frames = Vec::new();
        sync.on_tick(1.5, 0.3, &mut |u: &ViewportUniforms| frames.push(*u));
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].time, 1.5);
        assert_eq!(frames[0].progress, 0.3);
    }

    #[test]
    fn buffer_size_caps_pixel_ratio() {
        assert_eq!(drawing_buffer_size(800.0, 600.0, 3.0, 2.0), (1600, 1200));
        assert_eq!(drawing_buffer_size(800.0, 600.0, 1.5, 2.0), (1200, 900));
        assert_eq!(drawing_buffer_size(0.0, 0.4, 1.0, 2.0), (1, 1));
    }
}
