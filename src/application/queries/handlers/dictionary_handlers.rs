//! Dictionary Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SettingsCachePort;
use crate::application::queries::ListWords;
use crate::domain::dictionary::DictionaryEntry;

/// ListWords Handler
pub struct ListWordsHandler {
    settings: Arc<dyn SettingsCachePort>,
}

impl ListWordsHandler {
    pub fn new(settings: Arc<dyn SettingsCachePort>) -> Self {
        Self { settings }
    }

    pub async fn handle(&self, query: ListWords) -> Result<Vec<DictionaryEntry>, ApplicationError> {
        let dictionary = self.settings.dictionary(query.guild_id).await;
        Ok(dictionary.entries().to_vec())
    }
}
