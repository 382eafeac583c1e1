//! HTTP Handlers

mod audio;
mod bridge;
mod dictionary;
mod events;
mod ping;
mod speaker;
mod voice;

pub use audio::*;
pub use bridge::*;
pub use dictionary::*;
pub use events::*;
pub use ping::*;
pub use speaker::*;
pub use voice::*;
