//! Dictionary Context - 自定义读音辞书限界上下文
//!
//! 职责:
//! - 读音校验（只允许假名）
//! - 按插入顺序的字面替换
//! - 按 word 删除（只删第一个匹配）

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{DictionaryEntry, GuildDictionary};
pub use errors::DictionaryError;
pub use value_objects::{EntryId, Pronunciation, Word};
