//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod settings_repo;

pub use database::*;
pub use settings_repo::*;
