use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
};

use crate::error::EffectError;
use crate::platform::GpuContext;
use crate::resize::SurfaceSize;
use crate::shader::{POSITION_ATTRIBUTE, TRIANGLE_POSITIONS, TRIANGLE_UVS, UV_ATTRIBUTE};
use crate::uniforms::{UniformValue, Uniforms};

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// WebGL2 context bound to a canvas mounted in the host container.
pub struct WebGlSurface {
    canvas: HtmlCanvasElement,
    gl: GL,
}

pub struct ShaderProgram {
    program: WebGlProgram,
    locations: Vec<Option<WebGlUniformLocation>>,
}

pub struct Triangle {
    positions: WebGlBuffer,
    uvs: WebGlBuffer,
}

pub struct Mesh {
    vao: WebGlVertexArrayObject,
}

impl WebGlSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, EffectError> {
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(|err| EffectError::ContextUnavailable(describe(&err)))?
            .ok_or_else(|| EffectError::ContextUnavailable("WebGL2 not supported".into()))?
            .dyn_into()
            .map_err(|_| EffectError::ContextUnavailable("unexpected context type".into()))?;
        Ok(Self { canvas, gl })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn compile_shader(&self, kind: u32, source: &str) -> Result<WebGlShader, EffectError> {
        let stage = if kind == GL::VERTEX_SHADER { "vertex" } else { "fragment" };
        let shader = self.gl.create_shader(kind).ok_or(EffectError::Resource {
            what: "shader",
            detail: stage.into(),
        })?;
        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        let compiled = self
            .gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if compiled {
            Ok(shader)
        } else {
            let log = self.gl.get_shader_info_log(&shader).unwrap_or_default();
            self.gl.delete_shader(Some(&shader));
            Err(EffectError::ShaderCompile { stage, log })
        }
    }

    fn upload_buffer(&self, data: &[f32]) -> Result<WebGlBuffer, EffectError> {
        let buffer = self.gl.create_buffer().ok_or(EffectError::Resource {
            what: "vertex buffer",
            detail: "create_buffer returned null".into(),
        })?;
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let view = js_sys::Float32Array::from(data);
        self.gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        Ok(buffer)
    }

    fn bind_attribute(&self, program: &WebGlProgram, name: &str, buffer: &WebGlBuffer) {
        let location = self.gl.get_attrib_location(program, name);
        if location < 0 {
            // Optimized away by the compiler.
            return;
        }
        let location = location as u32;
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
        self.gl.enable_vertex_attrib_array(location);
        self.gl.vertex_attrib_pointer_with_i32(location, 2, GL::FLOAT, false, 0, 0);
    }
}

impl GpuContext for WebGlSurface {
    type Program = ShaderProgram;
    type Geometry = Triangle;
    type Mesh = Mesh;

    fn set_clear_color(&mut self, [r, g, b, a]: [f32; 4]) {
        self.gl.clear_color(r, g, b, a);
    }

    fn set_size(&mut self, size: SurfaceSize) {
        let (width, height) = size.backing();
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let style = self.canvas.style();
        for (property, value) in [("width", size.css_width), ("height", size.css_height)] {
            if let Err(err) = style.set_property(property, &format!("{value}px")) {
                log::debug!("canvas {property} not applied: {}", describe(&err));
            }
        }
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn compile_program(
        &mut self,
        vertex: &str,
        fragment: &str,
        uniforms: &Uniforms,
    ) -> Result<ShaderProgram, EffectError> {
        let vertex = self.compile_shader(GL::VERTEX_SHADER, vertex)?;
        let fragment = self.compile_shader(GL::FRAGMENT_SHADER, fragment)?;

        let program = self.gl.create_program().ok_or(EffectError::Resource {
            what: "program",
            detail: "create_program returned null".into(),
        })?;
        self.gl.attach_shader(&program, &vertex);
        self.gl.attach_shader(&program, &fragment);
        self.gl.link_program(&program);
        self.gl.delete_shader(Some(&vertex));
        self.gl.delete_shader(Some(&fragment));

        let linked = self
            .gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let log = self.gl.get_program_info_log(&program).unwrap_or_default();
            self.gl.delete_program(Some(&program));
            return Err(EffectError::ProgramLink(log));
        }

        let locations = uniforms
            .entries()
            .iter()
            .map(|(name, _)| self.gl.get_uniform_location(&program, name))
            .collect();
        Ok(ShaderProgram { program, locations })
    }

    fn create_triangle(&mut self) -> Result<Triangle, EffectError> {
        Ok(Triangle {
            positions: self.upload_buffer(&TRIANGLE_POSITIONS)?,
            uvs: self.upload_buffer(&TRIANGLE_UVS)?,
        })
    }

    fn create_mesh(
        &mut self,
        geometry: &Triangle,
        program: &ShaderProgram,
    ) -> Result<Mesh, EffectError> {
        let vao = self.gl.create_vertex_array().ok_or(EffectError::Resource {
            what: "vertex array",
            detail: "create_vertex_array returned null".into(),
        })?;
        self.gl.bind_vertex_array(Some(&vao));
        self.bind_attribute(&program.program, POSITION_ATTRIBUTE, &geometry.positions);
        self.bind_attribute(&program.program, UV_ATTRIBUTE, &geometry.uvs);
        self.gl.bind_vertex_array(None);
        Ok(Mesh { vao })
    }

    fn draw(
        &mut self,
        mesh: &Mesh,
        program: &ShaderProgram,
        uniforms: &Uniforms,
    ) -> Result<(), EffectError> {
        if self.gl.is_context_lost() {
            return Err(EffectError::ContextLost);
        }

        let gl = &self.gl;
        gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&program.program));

        for ((_, value), location) in uniforms.entries().iter().zip(&program.locations) {
            let Some(location) = location.as_ref() else {
                continue;
            };
            match *value {
                UniformValue::Float(v) => gl.uniform1f(Some(location), v),
                UniformValue::Vec2([x, y]) => gl.uniform2f(Some(location), x, y),
                UniformValue::Vec3([x, y, z]) => gl.uniform3f(Some(location), x, y, z),
            }
        }

        gl.bind_vertex_array(Some(&mesh.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);

        match gl.get_error() {
            GL::NO_ERROR => Ok(()),
            GL::CONTEXT_LOST_WEBGL => Err(EffectError::ContextLost),
            code => Err(EffectError::Draw(format!("GL error 0x{code:04x}"))),
        }
    }

    fn lose_context(&mut self) -> Result<(), EffectError> {
        let extension = self
            .gl
            .get_extension("WEBGL_lose_context")
            .map_err(|err| EffectError::Release(describe(&err)))?
            .ok_or_else(|| EffectError::Release("WEBGL_lose_context unavailable".into()))?;
        extension.unchecked_into::<WebglLoseContext>().lose_context();
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), EffectError> {
        if let Some(parent) = self.canvas.parent_node() {
            parent
                .remove_child(&self.canvas)
                .map_err(|err| EffectError::Release(describe(&err)))?;
        }
        Ok(())
    }
}
