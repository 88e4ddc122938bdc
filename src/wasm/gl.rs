use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    HtmlImageElement, WebGl2RenderingContext as GL, WebGlProgram, WebGlShader, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::DemoError;
use crate::viewport::ViewportUniforms;

pub const VERTEX_SHADER: &str = include_str!("../../static/shader/raymarching/vertex.glsl");
pub const FRAGMENT_SHADER: &str = include_str!("../../static/shader/raymarching/fragment.glsl");

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, DemoError> {
    let stage = if kind == GL::VERTEX_SHADER { "vertex" } else { "fragment" };
    let shader = gl.create_shader(kind).ok_or(DemoError::Missing("shader object"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(DemoError::ShaderCompile { stage, log })
    }
}

pub fn link_program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram, DemoError> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl.create_program().ok_or(DemoError::Missing("program object"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    // Shaders are owned by the program once linked.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(DemoError::ProgramLink(log))
    }
}

/// Unit plane in the XY plane, one segment per side, as two triangles.
pub struct PlaneMesh {
    vao: WebGlVertexArrayObject,
    vertex_count: i32,
}

impl PlaneMesh {
    // x, y, z, u, v
    const VERTICES: [f32; 30] = [
        -0.5, -0.5, 0.0, 0.0, 0.0, //
        0.5, -0.5, 0.0, 1.0, 0.0, //
        0.5, 0.5, 0.0, 1.0, 1.0, //
        -0.5, -0.5, 0.0, 0.0, 0.0, //
        0.5, 0.5, 0.0, 1.0, 1.0, //
        -0.5, 0.5, 0.0, 0.0, 1.0, //
    ];
    const STRIDE: i32 = 5 * 4;

    pub fn new(gl: &GL, program: &WebGlProgram) -> Result<Self, DemoError> {
        let vao = gl
            .create_vertex_array()
            .ok_or(DemoError::Missing("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = gl.create_buffer().ok_or(DemoError::Missing("vertex buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(&Self::VERTICES[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);

        for (name, size, offset) in [("position", 3, 0), ("uv", 2, 3 * 4)] {
            let location = gl.get_attrib_location(program, name);
            // The compiler strips unused attributes.
            if location < 0 {
                log::debug!("attribute `{name}` unused by shader");
                continue;
            }
            let location = location as u32;
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_with_i32(location, size, GL::FLOAT, false, Self::STRIDE, offset);
        }

        gl.bind_vertex_array(None);
        Ok(Self {
            vao,
            vertex_count: (Self::VERTICES.len() / 5) as i32,
        })
    }

    pub fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, self.vertex_count);
        gl.bind_vertex_array(None);
    }
}

/// Creates a texture holding a 1x1 placeholder and swaps in the image at
/// `url` once the browser has decoded it.
pub fn load_texture(gl: &GL, url: &str) -> Result<WebGlTexture, DemoError> {
    let texture = gl.create_texture().ok_or(DemoError::Missing("texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        1,
        1,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&[128u8, 128, 128, 255][..]),
    )?;
    set_sampling(gl);

    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));

    let onload = {
        let gl = gl.clone();
        let texture = texture.clone();
        let image = image.clone();
        let url = url.to_owned();
        Closure::once(move || {
            gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
            gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
            let uploaded = gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                &image,
            );
            gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);
            match uploaded {
                Ok(()) => {
                    set_sampling(&gl);
                    log::debug!(
                        "loaded {url} ({}x{})",
                        image.natural_width(),
                        image.natural_height()
                    );
                }
                Err(e) => log::warn!("upload of {url} failed: {e:?}"),
            }
        })
    };
    let onerror = {
        let url = url.to_owned();
        Closure::once(move || log::warn!("could not load {url}; keeping placeholder"))
    };
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    // The image element keeps the callbacks alive for the page lifetime.
    onload.forget();
    onerror.forget();

    image.set_src(url);
    Ok(texture)
}

fn set_sampling(gl: &GL) {
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
}

/// Uniform locations of the raymarching material. Missing entries were
/// optimised out by the driver and are silently skipped on upload.
pub struct MaterialUniforms {
    time: Option<WebGlUniformLocation>,
    mouse: Option<WebGlUniformLocation>,
    resolution: Option<WebGlUniformLocation>,
    progress: Option<WebGlUniformLocation>,
    matcap_one: Option<WebGlUniformLocation>,
    matcap_two: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    model_view: Option<WebGlUniformLocation>,
}

impl MaterialUniforms {
    pub fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        let loc = |name| gl.get_uniform_location(program, name);
        Self {
            time: loc("uTime"),
            mouse: loc("uMouse"),
            resolution: loc("uResolution"),
            progress: loc("uProgress"),
            matcap_one: loc("uMatcapOne"),
            matcap_two: loc("uMatcapTwo"),
            projection: loc("projectionMatrix"),
            model_view: loc("modelViewMatrix"),
        }
    }

    pub fn upload_camera(&self, gl: &GL, projection: &[f32; 16], model_view: &[f32; 16]) {
        gl.uniform_matrix4fv_with_f32_array(self.projection.as_ref(), false, projection);
        gl.uniform_matrix4fv_with_f32_array(self.model_view.as_ref(), false, model_view);
        gl.uniform1i(self.matcap_one.as_ref(), 0);
        gl.uniform1i(self.matcap_two.as_ref(), 1);
    }

    pub fn upload_frame(&self, gl: &GL, u: &ViewportUniforms) {
        let res = u.resolution();
        let mouse = u.mouse();
        gl.uniform1f(self.time.as_ref(), u.time);
        gl.uniform1f(self.progress.as_ref(), u.progress);
        gl.uniform2f(self.mouse.as_ref(), mouse.x, mouse.y);
        gl.uniform4f(self.resolution.as_ref(), res.x, res.y, res.z, res.w);
    }
}
