//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod connection_commands;
mod dictionary_commands;
mod ingest_commands;
mod voice_commands;

pub mod handlers;

pub use connection_commands::*;
pub use dictionary_commands::*;
pub use ingest_commands::*;
pub use voice_commands::*;
