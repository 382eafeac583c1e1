//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod connection_handlers;
mod dictionary_handlers;
mod ingest_handlers;
mod voice_handlers;

pub use connection_handlers::*;
pub use dictionary_handlers::*;
pub use ingest_handlers::*;
pub use voice_handlers::*;
