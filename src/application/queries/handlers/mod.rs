//! Query Handlers 实现

mod dictionary_handlers;
mod playback_handlers;
mod voice_handlers;

pub use dictionary_handlers::*;
pub use playback_handlers::*;
pub use voice_handlers::*;
