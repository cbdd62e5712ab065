mod buffer;
pub(crate) mod context;
mod program;
pub(crate) mod renderer;
pub(crate) mod texture;

// Crate-internal re-exports
use buffer::*;
pub(crate) use program::*;

pub use context::GlState;
pub use renderer::{GlBackend, GlRenderer, GlTextureLoader, RenderContext};
