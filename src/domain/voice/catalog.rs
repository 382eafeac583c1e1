//! Voice Context - 话者目录
//!
//! 话者名 -> 风格名 -> 风格 ID，启动时从配置加载，进程生命周期内不变

use std::collections::BTreeMap;

use super::{SpeakerChoice, StyleId, VoiceError};

/// 默认风格名
pub const NORMAL_STYLE: &str = "ノーマル";

#[derive(Debug, Clone)]
pub struct SpeakerCatalog {
    speakers: BTreeMap<String, BTreeMap<String, StyleId>>,
    default_style: StyleId,
}

impl SpeakerCatalog {
    pub fn new(speakers: BTreeMap<String, BTreeMap<String, u32>>, default_style: u32) -> Self {
        let speakers = speakers
            .into_iter()
            .map(|(speaker, styles)| {
                let styles = styles
                    .into_iter()
                    .map(|(style, id)| (style, StyleId::new(id)))
                    .collect();
                (speaker, styles)
            })
            .collect();
        Self {
            speakers,
            default_style: StyleId::new(default_style),
        }
    }

    /// 系统默认风格
    pub fn default_style(&self) -> StyleId {
        self.default_style
    }

    /// 解析话者与风格
    ///
    /// 未知风格回落到该话者的「ノーマル」
    pub fn resolve(
        &self,
        speaker_name: &str,
        style_name: Option<&str>,
    ) -> Result<SpeakerChoice, VoiceError> {
        let styles = self
            .speakers
            .get(speaker_name)
            .ok_or_else(|| VoiceError::UnknownSpeaker {
                name: speaker_name.to_string(),
                valid: self.speaker_names().join(", "),
            })?;

        let requested = style_name.unwrap_or(NORMAL_STYLE);
        let (style_name, style_id) = match styles.get(requested) {
            Some(id) => (requested, *id),
            None => {
                let id = styles
                    .get(NORMAL_STYLE)
                    .ok_or_else(|| VoiceError::NoDefaultStyle(speaker_name.to_string()))?;
                (NORMAL_STYLE, *id)
            }
        };

        Ok(SpeakerChoice {
            speaker_name: speaker_name.to_string(),
            style_name: style_name.to_string(),
            style_id,
        })
    }

    pub fn speaker_names(&self) -> Vec<&str> {
        self.speakers.keys().map(String::as_str).collect()
    }

    pub fn speakers(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, StyleId>)> {
        self.speakers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 目录中是否存在该风格 ID
    pub fn contains_style(&self, id: StyleId) -> bool {
        self.speakers.values().any(|styles| styles.values().any(|s| *s == id))
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpeakerCatalog {
        let mut speakers = BTreeMap::new();
        speakers.insert(
            "ずんだもん".to_string(),
            BTreeMap::from([
                ("ノーマル".to_string(), 3),
                ("あまあま".to_string(), 1),
            ]),
        );
        speakers.insert(
            "ささやき専用".to_string(),
            BTreeMap::from([("ささやき".to_string(), 36)]),
        );
        SpeakerCatalog::new(speakers, 3)
    }

    #[test]
    fn test_resolve_named_style() {
        let choice = catalog().resolve("ずんだもん", Some("あまあま")).unwrap();
        assert_eq!(choice.style_id, StyleId::new(1));
        assert_eq!(choice.style_name, "あまあま");
    }

    #[test]
    fn test_resolve_defaults_to_normal() {
        let choice = catalog().resolve("ずんだもん", None).unwrap();
        assert_eq!(choice.style_id, StyleId::new(3));
    }

    #[test]
    fn test_unknown_style_falls_back_to_normal() {
        let choice = catalog().resolve("ずんだもん", Some("セクシー")).unwrap();
        assert_eq!(choice.style_id, StyleId::new(3));
        assert_eq!(choice.style_name, NORMAL_STYLE);
    }

    #[test]
    fn test_unknown_speaker_lists_valid_names() {
        let err = catalog().resolve("だれ", None).unwrap_err();
        match err {
            VoiceError::UnknownSpeaker { valid, .. } => assert!(valid.contains("ずんだもん")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_speaker_without_normal_style() {
        let err = catalog().resolve("ささやき専用", Some("ノーマル")).unwrap_err();
        assert_eq!(err, VoiceError::NoDefaultStyle("ささやき専用".to_string()));
    }

    #[test]
    fn test_contains_style() {
        assert!(catalog().contains_style(StyleId::new(36)));
        assert!(!catalog().contains_style(StyleId::new(99)));
    }
}
