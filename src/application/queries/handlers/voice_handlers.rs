//! Voice Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::queries::{GetVoiceProfile, ListSpeakers};
use crate::application::VoiceProfileResolver;
use crate::domain::voice::{SpeakerCatalog, StyleId, VoiceProfile};

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StyleResponse {
    pub name: String,
    pub style_id: StyleId,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakerResponse {
    pub name: String,
    pub styles: Vec<StyleResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetVoiceProfile Handler
pub struct GetVoiceProfileHandler {
    profiles: VoiceProfileResolver,
}

impl GetVoiceProfileHandler {
    pub fn new(profiles: VoiceProfileResolver) -> Self {
        Self { profiles }
    }

    pub async fn handle(&self, query: GetVoiceProfile) -> Result<VoiceProfile, ApplicationError> {
        Ok(self.profiles.resolve(query.user_id).await)
    }
}

/// ListSpeakers Handler
pub struct ListSpeakersHandler {
    catalog: Arc<SpeakerCatalog>,
}

impl ListSpeakersHandler {
    pub fn new(catalog: Arc<SpeakerCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn handle(
        &self,
        _query: ListSpeakers,
    ) -> Result<Vec<SpeakerResponse>, ApplicationError> {
        Ok(self
            .catalog
            .speakers()
            .map(|(name, styles)| SpeakerResponse {
                name: name.to_string(),
                styles: styles
                    .iter()
                    .map(|(style, id)| StyleResponse {
                        name: style.clone(),
                        style_id: *id,
                    })
                    .collect(),
            })
            .collect())
    }
}
