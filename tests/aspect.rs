use raymarch_wasm::viewport::{SQUARE_ASPECT, ViewportUniforms};
use raymarch_wasm::{compute_aspect_correction, ViewportSync};

fn approx_eq2(a: (f32, f32), b: (f32, f32), eps: f32) -> bool {
    (a.0 - b.0).abs() < eps && (a.1 - b.1).abs() < eps
}

fn aspect(w: f32, h: f32) -> (f32, f32) {
    let a = compute_aspect_correction(w, h, SQUARE_ASPECT);
    (a.x, a.y)
}

/// Maps a fragment uv through the letterbox correction the way the shader does.
fn to_square(uv: (f32, f32), res: (f32, f32)) -> (f32, f32) {
    let (ax, ay) = aspect(res.0, res.1);
    ((uv.0 - 0.5) * ax, (uv.1 - 0.5) * ay)
}

#[test]
fn landscape_full_hd() {
    assert!(approx_eq2(aspect(1920.0, 1080.0), (1.0, 0.5625), 1e-6));
}

#[test]
fn portrait_full_hd() {
    assert!(approx_eq2(aspect(1080.0, 1920.0), (0.5625, 1.0), 1e-6));
}

#[test]
fn square_viewport_is_identity() {
    assert_eq!(aspect(1000.0, 1000.0), (1.0, 1.0));
}

#[test]
fn exactly_one_component_is_one() {
    let sizes = [(320.0, 240.0), (240.0, 320.0), (3840.0, 1600.0), (1.0, 7.0), (999.0, 1000.0)];
    for (w, h) in sizes {
        let (ax, ay) = aspect(w, h);
        if h / w > SQUARE_ASPECT {
            assert_eq!(ay, 1.0, "{w}x{h}");
            assert!((ax - w / h).abs() < 1e-6 && ax < 1.0, "{w}x{h}");
        } else {
            assert_eq!(ax, 1.0, "{w}x{h}");
            assert!((ay - h / w).abs() < 1e-6 && ay <= 1.0, "{w}x{h}");
        }
    }
}

#[test]
fn corrected_frame_is_isotropic() {
    // One pixel step covers the same distance on both axes after correction.
    for res in [(1920.0, 1080.0), (1080.0, 1920.0)] {
        let origin = to_square((0.5, 0.5), res);
        let right = to_square((0.5 + 1.0 / res.0, 0.5), res);
        let up = to_square((0.5, 0.5 + 1.0 / res.1), res);
        let dx = right.0 - origin.0;
        let dy = up.1 - origin.1;
        assert!((dx - dy).abs() < 1e-6, "res={res:?} dx={dx} dy={dy}");
    }
}

#[test]
fn resize_is_idempotent() {
    let mut sync = ViewportSync::new(800.0, 600.0, SQUARE_ASPECT);
    sync.on_resize(1280.0, 1920.0);
    let first = *sync.uniforms();
    sync.on_resize(1280.0, 1920.0);
    assert_eq!(first, *sync.uniforms());
}

#[test]
fn pointer_corners() {
    let mut sync = ViewportSync::new(1000.0, 1000.0, SQUARE_ASPECT);
    sync.on_pointer_move(0.0, 0.0, 1000.0, 1000.0);
    assert_eq!((sync.uniforms().mouse_x, sync.uniforms().mouse_y), (-0.5, 0.5));
    sync.on_pointer_move(1000.0, 1000.0, 1000.0, 1000.0);
    assert_eq!((sync.uniforms().mouse_x, sync.uniforms().mouse_y), (0.5, -0.5));
}

#[test]
fn every_tick_renders_once() {
    let mut sync = ViewportSync::new(1920.0, 1080.0, SQUARE_ASPECT);
    sync.on_pointer_move(480.0, 270.0, 1920.0, 1080.0);

    let mut frames: Vec<ViewportUniforms> = Vec::new();
    for i in 0..3 {
        let t = i as f32 / 60.0;
        sync.on_tick(t, 0.5, &mut |u: &ViewportUniforms| frames.push(*u));
    }

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[2].time, 2.0 / 60.0);
    assert!(frames.iter().all(|f| f.progress == 0.5));
    assert!(frames.iter().all(|f| approx_eq2((f.mouse_x, f.mouse_y), (-0.25, 0.25), 1e-6)));
    assert!(frames.iter().all(|f| f.resolution().w == 0.5625));
}
