use wasm_bindgen::JsCast;
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject, WebglLoseContext,
};

use crate::error::SurfaceError;
use crate::scene::{CardMesh, INDICES, VERTEX_STRIDE};
use crate::shader::{ProgramDescriptor, UniformValue, Uniforms, ATTRIB_POSITION, ATTRIB_UV};

/// Linked program plus the uniform locations the driver kept.
pub struct GlProgram {
    program: WebGlProgram,
    locations: Vec<(String, WebGlUniformLocation)>,
}

impl GlProgram {
    pub fn build(gl: &GL, desc: &ProgramDescriptor) -> Result<Self, SurfaceError> {
        let vs = compile_shader(gl, GL::VERTEX_SHADER, "vertex", &desc.vertex)?;
        let fs = match compile_shader(gl, GL::FRAGMENT_SHADER, "fragment", &desc.fragment) {
            Ok(fs) => fs,
            Err(e) => {
                gl.delete_shader(Some(&vs));
                return Err(e);
            }
        };
        let program = link_program(gl, &vs, &fs);
        // shaders can go once linked (or failed to)
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));
        let program = program?;

        let mut locations = Vec::with_capacity(desc.uniforms.len());
        for decl in &desc.uniforms {
            match gl.get_uniform_location(&program, &decl.name) {
                Some(loc) => locations.push((decl.name.clone(), loc)),
                None => log::debug!("uniform `{}` inactive in linked program, skipping", decl.name),
            }
        }
        Ok(Self { program, locations })
    }

    pub fn upload(&self, gl: &GL, uniforms: &Uniforms) {
        gl.use_program(Some(&self.program));
        for (name, loc) in &self.locations {
            let Some(value) = uniforms.get(name) else {
                continue;
            };
            match value {
                UniformValue::Float(v) => gl.uniform1f(Some(loc), v),
                UniformValue::Vec2(v) => gl.uniform2f(Some(loc), v.x, v.y),
                UniformValue::Vec3(v) => gl.uniform3f(Some(loc), v.x, v.y, v.z),
                UniformValue::Mat4(m) => {
                    gl.uniform_matrix4fv_with_f32_array(Some(loc), false, &m.to_cols_array())
                }
            }
        }
    }

    pub fn delete(&self, gl: &GL) {
        gl.delete_program(Some(&self.program));
    }
}

fn compile_shader(
    gl: &GL,
    kind: u32,
    stage: &'static str,
    src: &str,
) -> Result<WebGlShader, SurfaceError> {
    let shader = gl
        .create_shader(kind)
        .ok_or(SurfaceError::Allocation("shader"))?;
    gl.shader_source(&shader, src);
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
        Err(SurfaceError::ShaderCompile { stage, log })
    }
}

fn link_program(gl: &GL, vs: &WebGlShader, fs: &WebGlShader) -> Result<WebGlProgram, SurfaceError> {
    let program = gl
        .create_program()
        .ok_or(SurfaceError::Allocation("program"))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(SurfaceError::ProgramLink(log))
    }
}

/// Card plane buffers bound into one vertex array.
pub struct CardGeometry {
    vao: WebGlVertexArrayObject,
    vbo: WebGlBuffer,
    ibo: WebGlBuffer,
    index_count: i32,
}

impl CardGeometry {
    pub fn upload(gl: &GL, mesh: &CardMesh) -> Result<Self, SurfaceError> {
        let vao = gl
            .create_vertex_array()
            .ok_or(SurfaceError::Allocation("vertex array"))?;
        let vbo = gl
            .create_buffer()
            .ok_or(SurfaceError::Allocation("vertex buffer"))?;
        let ibo = gl
            .create_buffer()
            .ok_or(SurfaceError::Allocation("index buffer"))?;

        gl.bind_vertex_array(Some(&vao));

        let vertices = mesh.vertices();
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));
        // SAFETY: the view is consumed by buffer_data before any allocation
        // can grow wasm memory.
        unsafe {
            let view = js_sys::Float32Array::view(&vertices);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        }

        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&ibo));
        unsafe {
            let view = js_sys::Uint16Array::view(&INDICES);
            gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        }

        let stride = (VERTEX_STRIDE * std::mem::size_of::<f32>()) as i32;
        gl.enable_vertex_attrib_array(ATTRIB_POSITION);
        gl.vertex_attrib_pointer_with_i32(ATTRIB_POSITION, 3, GL::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(ATTRIB_UV);
        gl.vertex_attrib_pointer_with_i32(ATTRIB_UV, 2, GL::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            vbo,
            ibo,
            index_count: INDICES.len() as i32,
        })
    }

    pub fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_elements_with_i32(GL::TRIANGLES, self.index_count, GL::UNSIGNED_SHORT, 0);
        gl.bind_vertex_array(None);
    }

    pub fn delete(&self, gl: &GL) {
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.vbo));
        gl.delete_buffer(Some(&self.ibo));
    }
}

/// Asks the browser to drop the context now instead of at GC time.
pub fn lose_context(gl: &GL) {
    match gl.get_extension("WEBGL_lose_context") {
        // the extension object has no global constructor to check against
        Ok(Some(ext)) => ext.unchecked_into::<WebglLoseContext>().lose_context(),
        _ => log::debug!("WEBGL_lose_context unavailable"),
    }
}
