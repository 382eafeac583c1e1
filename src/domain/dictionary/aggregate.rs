//! Dictionary Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntryId, Pronunciation, Word};

/// 辞书条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub id: EntryId,
    pub word: Word,
    pub pronunciation: Pronunciation,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl DictionaryEntry {
    pub fn new(word: Word, pronunciation: Pronunciation, author: impl Into<String>) -> Self {
        Self {
            id: EntryId::generate(),
            word,
            pronunciation,
            author: author.into(),
            created_at: Utc::now(),
        }
    }
}

/// Guild 辞书聚合根
///
/// 不变量:
/// - 条目按插入顺序保存，替换也按此顺序进行
/// - 同一 word 可以存在多个条目
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuildDictionary {
    entries: Vec<DictionaryEntry>,
}

impl GuildDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<DictionaryEntry>) -> Self {
        Self { entries }
    }

    /// 追加条目
    pub fn add(&mut self, entry: DictionaryEntry) {
        self.entries.push(entry);
    }

    /// 删除第一个 word 完全匹配的条目
    pub fn remove_first_by_word(&mut self, word: &str) -> Option<DictionaryEntry> {
        let pos = self.entries.iter().position(|e| e.word.as_str() == word)?;
        Some(self.entries.remove(pos))
    }

    /// 依次对每个条目做字面替换
    ///
    /// 后面的条目会扫描前面替换产生的文本
    pub fn substitute(&self, text: &str) -> String {
        self.entries.iter().fold(text.to_string(), |acc, entry| {
            acc.replace(entry.word.as_str(), entry.pronunciation.as_str())
        })
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
