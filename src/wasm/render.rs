use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    HtmlCanvasElement, MouseEvent, WebGl2RenderingContext as GL, WebGlProgram, WebGlTexture, Window,
};

use super::gl::{
    link_program, load_texture, MaterialUniforms, PlaneMesh, FRAGMENT_SHADER, VERTEX_SHADER,
};
use super::gui;
use crate::camera::OrthoCamera;
use crate::config::DemoConfig;
use crate::debug::ProgressControl;
use crate::error::DemoError;
use crate::viewport::{drawing_buffer_size, FrameSink, ViewportSync, ViewportUniforms};

/// Draws the raymarched plane into the canvas.
struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: WebGlProgram,
    mesh: PlaneMesh,
    uniforms: MaterialUniforms,
    matcaps: [WebGlTexture; 2],
    max_pixel_ratio: f64,
}

impl Renderer {
    fn new(canvas: HtmlCanvasElement, config: &DemoConfig) -> Result<Self, DemoError> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(DemoError::Missing("WebGL2 context"))?
            .dyn_into()
            .map_err(|_| DemoError::Js("webgl2 context has unexpected type".into()))?;

        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let mesh = PlaneMesh::new(&gl, &program)?;
        let uniforms = MaterialUniforms::locate(&gl, &program);
        let matcaps = [
            load_texture(&gl, &config.matcap_one)?,
            load_texture(&gl, &config.matcap_two)?,
        ];

        let camera = OrthoCamera::default();
        gl.use_program(Some(&program));
        uniforms.upload_camera(
            &gl,
            &camera.projection().to_cols_array(),
            &camera.model_view().to_cols_array(),
        );
        // Material is double sided.
        gl.disable(GL::CULL_FACE);

        Ok(Self {
            gl,
            canvas,
            program,
            mesh,
            uniforms,
            matcaps,
            max_pixel_ratio: config.max_pixel_ratio,
        })
    }

    fn set_size(&self, css_width: f64, css_height: f64, device_pixel_ratio: f64) {
        let (w, h) =
            drawing_buffer_size(css_width, css_height, device_pixel_ratio, self.max_pixel_ratio);
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        style.set_property("width", &format!("{css_width}px")).ok();
        style.set_property("height", &format!("{css_height}px")).ok();
        self.gl.viewport(0, 0, w as i32, h as i32);
        log::debug!("canvas {css_width}x{css_height} css, {w}x{h} buffer");
    }
}

impl FrameSink for Renderer {
    fn render(&mut self, u: &ViewportUniforms) {
        let gl = &self.gl;
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        for (unit, texture) in [GL::TEXTURE0, GL::TEXTURE1].into_iter().zip(&self.matcaps) {
            gl.active_texture(unit);
            gl.bind_texture(GL::TEXTURE_2D, Some(texture));
        }
        self.uniforms.upload_frame(gl, u);
        self.mesh.draw(gl);
    }
}

/// Shared between the event listeners and the animation loop.
struct Scene {
    sync: ViewportSync,
    renderer: Renderer,
}

fn inner_size(window: &Window) -> Result<(f64, f64), DemoError> {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok()
            .and_then(|v| v.as_f64())
            .ok_or(DemoError::Missing("window size"))
    };
    Ok((read(window.inner_width())?, read(window.inner_height())?))
}

/// Wire the canvas to the window and start the render loop.
pub fn start(window: Window, canvas: HtmlCanvasElement, config: DemoConfig) -> Result<(), DemoError> {
    let renderer = Renderer::new(canvas, &config)?;
    let (width, height) = inner_size(&window)?;
    renderer.set_size(width, height, window.device_pixel_ratio());
    log::info!(
        "canvas {}x{} (pixel ratio {})",
        width,
        height,
        window.device_pixel_ratio().min(config.max_pixel_ratio)
    );

    let scene = Rc::new(RefCell::new(Scene {
        sync: ViewportSync::new(width as f32, height as f32, config.target_aspect),
        renderer,
    }));

    let progress = Rc::new(RefCell::new(ProgressControl::new(
        0.0,
        1.0,
        0.1,
        config.initial_progress,
    )));
    if config.show_gui {
        let document = window.document().ok_or(DemoError::Missing("document"))?;
        gui::mount(&document, progress.clone())?;
    }

    // Resize: viewport uniforms and drawing buffer follow the window.
    let resize_closure = {
        let scene = scene.clone();
        let window = window.clone();
        Closure::<dyn FnMut()>::new(move || {
            let (w, h) = match inner_size(&window) {
                Ok(size) => size,
                Err(e) => {
                    log::error!("resize: {e}");
                    return;
                }
            };
            let mut scene = scene.borrow_mut();
            scene.sync.on_resize(w as f32, h as f32);
            scene.renderer.set_size(w, h, window.device_pixel_ratio());
        })
    };
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    let mouse_closure = {
        let scene = scene.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            let mut scene = scene.borrow_mut();
            let u = *scene.sync.uniforms();
            scene
                .sync
                .on_pointer_move(e.page_x() as f32, e.page_y() as f32, u.width, u.height);
        })
    };
    window.add_event_listener_with_callback("mousemove", mouse_closure.as_ref().unchecked_ref())?;
    mouse_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let performance = window.performance().ok_or(DemoError::Missing("performance"))?;
    let started = performance.now();
    let loop_window = window.clone();
    *g.borrow_mut() = Some(Closure::new(move || {
        let elapsed = ((performance.now() - started) / 1000.0) as f32;
        let progress = progress.borrow().value();
        {
            let mut scene = scene.borrow_mut();
            let Scene { sync, renderer } = &mut *scene;
            sync.on_tick(elapsed, progress, renderer);
        }

        // schedule next
        if let Some(cb) = f.borrow().as_ref() {
            if let Err(e) = loop_window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::error!("request_animation_frame failed: {e:?}");
            }
        }
    }));

    if let Some(cb) = g.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    fn renderer(max_pixel_ratio: f64) -> Renderer {
        let canvas = web_sys::window()
            .unwrap()
            .document()
            .unwrap()
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        let config = DemoConfig {
            max_pixel_ratio,
            ..DemoConfig::default()
        };
        Renderer::new(canvas, &config).unwrap()
    }

    #[wasm_bindgen_test]
    fn set_size_caps_pixel_ratio() {
        let r = renderer(2.0);
        r.set_size(300.0, 150.0, 3.0);

        assert_eq!((r.canvas.width(), r.canvas.height()), (600, 300));
        assert_eq!((r.gl.drawing_buffer_width(), r.gl.drawing_buffer_height()), (600, 300));
        let style = r.canvas.style();
        assert_eq!(style.get_property_value("width").unwrap(), "300px");
        assert_eq!(style.get_property_value("height").unwrap(), "150px");
    }

    #[wasm_bindgen_test]
    fn set_size_follows_low_pixel_ratio() {
        let r = renderer(2.0);
        r.set_size(401.0, 99.0, 1.5);
        assert_eq!((r.canvas.width(), r.canvas.height()), (601, 148));
    }

    #[wasm_bindgen_test]
    fn configured_cap_applies() {
        let r = renderer(1.0);
        r.set_size(320.0, 240.0, 2.0);
        assert_eq!((r.canvas.width(), r.canvas.height()), (320, 240));
    }

    #[wasm_bindgen_test]
    fn frame_renders_without_gl_errors() {
        let mut r = renderer(2.0);
        r.set_size(64.0, 64.0, 1.0);
        let mut sync = ViewportSync::new(64.0, 64.0, 1.0);
        sync.on_pointer_move(16.0, 16.0, 64.0, 64.0);
        sync.on_tick(0.5, 0.3, &mut r);
        assert_eq!(r.gl.get_error(), GL::NO_ERROR);
    }
}
