//! SQLite Settings Repository
//!
//! 用户语音设置与 Guild 辞书

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{RepositoryError, SettingsStorePort};
use crate::domain::dictionary::{DictionaryEntry, EntryId, GuildDictionary, Pronunciation, Word};
use crate::domain::voice::{SpeakerChoice, StyleId, UserVoiceSettings};
use crate::domain::{GuildId, UserId};

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

/// SQLite Settings Repository
pub struct SqliteSettingsRepository {
    pool: DbPool,
}

impl SqliteSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserSettingsRow {
    user_id: String,
    speaker_name: Option<String>,
    style_name: Option<String>,
    style_id: Option<i64>,
    intensity: Option<f64>,
    pitch: Option<f64>,
    speed: Option<f64>,
    updated_at: String,
}

impl TryFrom<UserSettingsRow> for UserVoiceSettings {
    type Error = RepositoryError;

    fn try_from(row: UserSettingsRow) -> Result<Self, Self::Error> {
        let user_id: UserId = row
            .user_id
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                RepositoryError::SerializationError(e.to_string())
            })?;

        // 三列必须同时存在才视为已选择话者
        let speaker = match (row.speaker_name, row.style_name, row.style_id) {
            (Some(speaker_name), Some(style_name), Some(style_id)) => {
                let style_id = u32::try_from(style_id)
                    .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
                Some(SpeakerChoice {
                    speaker_name,
                    style_name,
                    style_id: StyleId::new(style_id),
                })
            }
            _ => None,
        };

        Ok(UserVoiceSettings {
            user_id,
            speaker,
            intensity: row.intensity,
            pitch: row.pitch,
            speed: row.speed,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct DictionaryRow {
    id: String,
    word: String,
    pronunciation: String,
    author: String,
    created_at: String,
}

impl TryFrom<DictionaryRow> for DictionaryEntry {
    type Error = RepositoryError;

    fn try_from(row: DictionaryRow) -> Result<Self, Self::Error> {
        Ok(DictionaryEntry {
            id: EntryId::from_string(row.id),
            word: Word::from_trusted(row.word),
            pronunciation: Pronunciation::from_trusted(row.pronunciation),
            author: row.author,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[async_trait]
impl SettingsStorePort for SqliteSettingsRepository {
    async fn load_user_settings(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserVoiceSettings>, RepositoryError> {
        let row: Option<UserSettingsRow> = sqlx::query_as(
            r#"
            SELECT user_id, speaker_name, style_name, style_id, intensity, pitch, speed, updated_at
            FROM user_settings WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(UserVoiceSettings::try_from).transpose()
    }

    async fn save_user_settings(
        &self,
        settings: &UserVoiceSettings,
    ) -> Result<(), RepositoryError> {
        let speaker = settings.speaker.as_ref();

        sqlx::query(
            r#"
            INSERT INTO user_settings
                (user_id, speaker_name, style_name, style_id, intensity, pitch, speed, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                speaker_name = excluded.speaker_name,
                style_name = excluded.style_name,
                style_id = excluded.style_id,
                intensity = excluded.intensity,
                pitch = excluded.pitch,
                speed = excluded.speed,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(settings.user_id.to_string())
        .bind(speaker.map(|s| s.speaker_name.clone()))
        .bind(speaker.map(|s| s.style_name.clone()))
        .bind(speaker.map(|s| i64::from(s.style_id.get())))
        .bind(settings.intensity)
        .bind(settings.pitch)
        .bind(settings.speed)
        .bind(settings.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn load_dictionary(
        &self,
        guild_id: GuildId,
    ) -> Result<Option<GuildDictionary>, RepositoryError> {
        let rows: Vec<DictionaryRow> = sqlx::query_as(
            r#"
            SELECT id, word, pronunciation, author, created_at
            FROM dictionary_entries WHERE guild_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(guild_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let entries = rows
            .into_iter()
            .map(DictionaryEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(GuildDictionary::from_entries(entries)))
    }

    async fn save_dictionary(
        &self,
        guild_id: GuildId,
        dictionary: &GuildDictionary,
    ) -> Result<(), RepositoryError> {
        let guild = guild_id.to_string();
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM dictionary_entries WHERE guild_id = ?")
            .bind(&guild)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        for (position, entry) in dictionary.entries().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO dictionary_entries
                    (id, guild_id, position, word, pronunciation, author, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(entry.id.as_str())
            .bind(&guild)
            .bind(position as i64)
            .bind(entry.word.as_str())
            .bind(entry.pronunciation.as_str())
            .bind(&entry.author)
            .bind(entry.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        tracing::debug!(
            guild_id = %guild_id,
            entries = dictionary.len(),
            "Dictionary persisted"
        );
        Ok(())
    }
}
