//! Memory Layer - In-Memory State Management
//!
//! 设置的读穿缓存

mod settings_cache;

pub use settings_cache::InMemorySettingsCache;
