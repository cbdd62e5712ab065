use glow::HasContext;

use crate::{GlslVersion, error::Error};

/// A linked vertex + fragment program.
#[derive(Debug)]
pub(crate) struct ShaderProgram {
    program: glow::Program,
}

impl ShaderProgram {
    /// Compiles both stages with the preambles of `version` and links them.
    pub(crate) fn create(
        gl: &glow::Context,
        version: &GlslVersion,
        vertex_body: &str,
        fragment_body: &str,
    ) -> Result<Self, Error> {
        let vertex_source = format!("{}{vertex_body}", version.vertex_preamble());
        let fragment_source = format!("{}{fragment_body}", version.fragment_preamble());

        let program =
            unsafe { gl.create_program() }.map_err(|_| Error::shader_program_creation_failed())?;

        let stages = [
            (glow::VERTEX_SHADER, vertex_source.as_str()),
            (glow::FRAGMENT_SHADER, fragment_source.as_str()),
        ];
        let mut shaders = Vec::with_capacity(stages.len());
        for (stage, source) in stages {
            match compile_stage(gl, stage, source) {
                Ok(shader) => shaders.push(shader),
                Err(e) => {
                    release(gl, program, &shaders);
                    return Err(e);
                },
            }
        }

        for &shader in &shaders {
            unsafe { gl.attach_shader(program, shader) };
        }
        unsafe { gl.link_program(program) };

        let linked = unsafe { gl.get_program_link_status(program) };
        let link_log = (!linked).then(|| unsafe { gl.get_program_info_log(program) });

        // stages are no longer needed once linking has been attempted
        for &shader in &shaders {
            unsafe {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }
        }

        if let Some(log) = link_log {
            unsafe { gl.delete_program(program) };
            return Err(Error::shader_link_failed(log));
        }

        Ok(Self { program })
    }

    pub(crate) fn use_program(&self, gl: &glow::Context) {
        unsafe { gl.use_program(Some(self.program)) };
    }

    pub(crate) fn uniform_location(
        &self,
        gl: &glow::Context,
        name: &str,
    ) -> Result<glow::UniformLocation, Error> {
        unsafe { gl.get_uniform_location(self.program, name) }
            .ok_or_else(|| Error::uniform_location_failed(name))
    }

    pub(crate) fn delete(&self, gl: &glow::Context) {
        unsafe { gl.delete_program(self.program) };
    }
}

fn compile_stage(gl: &glow::Context, stage: u32, source: &str) -> Result<glow::Shader, Error> {
    let shader = unsafe { gl.create_shader(stage) }.map_err(|e| Error::shader_creation_failed(&e))?;

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    if unsafe { gl.get_shader_compile_status(shader) } {
        Ok(shader)
    } else {
        let log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(Error::shader_compile_failed(log))
    }
}

fn release(gl: &glow::Context, program: glow::Program, shaders: &[glow::Shader]) {
    unsafe {
        for &shader in shaders {
            gl.delete_shader(shader);
        }
        gl.delete_program(program);
    }
}
