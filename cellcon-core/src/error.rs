/// Error categories for the console renderer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Shader compilation, linking, or program creation errors.
    #[error("Shader error: {0}")]
    Shader(String),

    /// GL resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// External data loading or parsing errors.
    #[error("Data error: {0}")]
    Data(String),

    /// Frame protocol violations, such as beginning a frame while one is open.
    #[error("Frame error: {0}")]
    Frame(String),
}

impl Error {
    // Shader errors
    pub(crate) fn shader_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader creation failed: {detail}"))
    }

    pub(crate) fn shader_compile_failed(log: String) -> Self {
        Self::Shader(format!("Shader compilation failed: {log}"))
    }

    pub(crate) fn shader_program_creation_failed() -> Self {
        Self::Shader("Shader program creation failed".to_string())
    }

    pub(crate) fn shader_link_failed(log: String) -> Self {
        Self::Shader(format!("Shader linking failed: {log}"))
    }

    // Resource errors
    pub(crate) fn buffer_creation_failed(buffer_type: &str, detail: String) -> Self {
        Self::Resource(format!("Failed to create {buffer_type} buffer: {detail}"))
    }

    pub(crate) fn vertex_array_creation_failed(detail: String) -> Self {
        Self::Resource(format!("Failed to create vertex array object: {detail}"))
    }

    pub(crate) fn texture_creation_failed(detail: &str) -> Self {
        Self::Resource(format!("Failed to create texture: {detail}"))
    }

    pub(crate) fn uniform_location_failed(name: &str) -> Self {
        Self::Resource(format!("Failed to get uniform location: {name}"))
    }

    pub(crate) fn unknown_texture(id: u32) -> Self {
        Self::Resource(format!("Unknown texture handle: {id}"))
    }

    // Data errors
    pub(crate) fn unknown_sprite(id: usize) -> Self {
        Self::Data(format!("Unknown sprite handle: {id}"))
    }

    // Frame errors
    pub(crate) fn frame_in_progress() -> Self {
        Self::Frame("A frame is already being rendered".to_string())
    }

    /// Wraps a failure reported by the host while presenting a frame.
    pub fn present_failed(detail: impl std::fmt::Display) -> Self {
        Self::Frame(format!("Failed to present frame: {detail}"))
    }
}

impl From<cellcon_data::ImageError> for Error {
    fn from(err: cellcon_data::ImageError) -> Self {
        Self::Data(err.to_string())
    }
}

impl From<cellcon_data::AtlasError> for Error {
    fn from(err: cellcon_data::AtlasError) -> Self {
        Self::Data(err.to_string())
    }
}
