//! Voice Queries

use crate::domain::UserId;

/// 获取用户的有效合成配置
#[derive(Debug, Clone)]
pub struct GetVoiceProfile {
    pub user_id: UserId,
}

/// 列出可选话者
#[derive(Debug, Clone)]
pub struct ListSpeakers;
