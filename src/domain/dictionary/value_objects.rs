//! Dictionary Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DictionaryError;

/// 辞书条目 ID
///
/// 64 位随机数的十进制表示，不透明且唯一
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        let high = (Uuid::new_v4().as_u128() >> 64) as u64;
        Self(high.to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 是否为平假名或片假名（含长音符等片假名区块字符）
#[inline]
fn is_kana(ch: char) -> bool {
    matches!(ch, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}')
}

/// 读音
///
/// 不变量: 非空且只包含假名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pronunciation(String);

impl Pronunciation {
    pub fn new(value: impl Into<String>) -> Result<Self, DictionaryError> {
        let value = value.into();
        if value.is_empty() || !value.chars().all(is_kana) {
            return Err(DictionaryError::InvalidPronunciation(value));
        }
        Ok(Self(value))
    }

    /// 从存储恢复时跳过校验（入库时已校验）
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 被替换的单词，内容任意但不能为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    pub fn new(value: impl Into<String>) -> Result<Self, DictionaryError> {
        let value = value.into();
        if value.is_empty() {
            return Err(DictionaryError::EmptyWord);
        }
        Ok(Self(value))
    }

    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_katakana_accepted() {
        assert!(Pronunciation::new("アイウ").is_ok());
    }

    #[test]
    fn test_hiragana_and_long_vowel_accepted() {
        assert!(Pronunciation::new("らーめん").is_ok());
        assert!(Pronunciation::new("ラーメン").is_ok());
    }

    #[test]
    fn test_latin_rejected() {
        assert_eq!(
            Pronunciation::new("abc"),
            Err(DictionaryError::InvalidPronunciation("abc".to_string()))
        );
    }

    #[test]
    fn test_mixed_and_empty_rejected() {
        assert!(Pronunciation::new("アイa").is_err());
        assert!(Pronunciation::new("漢字").is_err());
        assert!(Pronunciation::new("").is_err());
    }

    #[test]
    fn test_entry_id_is_decimal() {
        let id = EntryId::generate();
        assert!(id.as_str().parse::<u64>().is_ok());
        assert_ne!(id, EntryId::generate());
    }

    #[test]
    fn test_empty_word_rejected() {
        assert_eq!(Word::new(""), Err(DictionaryError::EmptyWord));
        assert!(Word::new("w").is_ok());
    }
}
