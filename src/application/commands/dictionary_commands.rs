//! Dictionary Commands

use crate::domain::GuildId;

/// 登录辞书条目
#[derive(Debug, Clone)]
pub struct RegisterWord {
    pub guild_id: GuildId,
    pub word: String,
    pub pronunciation: String,
    pub author: String,
}

/// 删除辞书条目（按 word，只删第一个匹配）
#[derive(Debug, Clone)]
pub struct RemoveWord {
    pub guild_id: GuildId,
    pub word: String,
}
