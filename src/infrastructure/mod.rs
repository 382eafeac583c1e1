//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod bridge;
pub mod http;
pub mod memory;
pub mod persistence;
pub mod worker;

pub use bridge::BridgeHub;
pub use memory::InMemorySettingsCache;
pub use worker::{PlaybackEngine, PlaybackEngineConfig};
