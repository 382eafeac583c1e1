//! Voice Profile Resolver
//!
//! 用户 ID -> 完整合成配置。缺失即默认，永不失败。

use std::sync::Arc;

use crate::application::ports::SettingsCachePort;
use crate::domain::voice::{StyleId, VoiceProfile};
use crate::domain::UserId;

#[derive(Clone)]
pub struct VoiceProfileResolver {
    cache: Arc<dyn SettingsCachePort>,
    default_style: StyleId,
}

impl VoiceProfileResolver {
    pub fn new(cache: Arc<dyn SettingsCachePort>, default_style: StyleId) -> Self {
        Self {
            cache,
            default_style,
        }
    }

    pub fn default_style(&self) -> StyleId {
        self.default_style
    }

    pub async fn resolve(&self, user_id: UserId) -> VoiceProfile {
        match self.cache.user_settings(user_id).await {
            Some(settings) => settings.resolve(self.default_style),
            None => VoiceProfile::system_default(self.default_style),
        }
    }
}
