//! Playback Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{PlaybackControlPort, PlaybackStatus};
use crate::application::queries::GetPlaybackStatus;

/// GetPlaybackStatus Handler
pub struct GetPlaybackStatusHandler {
    playback: Arc<dyn PlaybackControlPort>,
}

impl GetPlaybackStatusHandler {
    pub fn new(playback: Arc<dyn PlaybackControlPort>) -> Self {
        Self { playback }
    }

    pub async fn handle(
        &self,
        query: GetPlaybackStatus,
    ) -> Result<PlaybackStatus, ApplicationError> {
        Ok(self.playback.status(query.guild_id).await?)
    }
}
