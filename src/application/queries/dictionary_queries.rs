//! Dictionary Queries

use crate::domain::GuildId;

/// 列出 Guild 辞书（插入顺序）
#[derive(Debug, Clone)]
pub struct ListWords {
    pub guild_id: GuildId,
}
