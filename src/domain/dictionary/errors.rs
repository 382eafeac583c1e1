//! Dictionary Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("読みにはひらがなまたはカタカナを使用してください: {0}")]
    InvalidPronunciation(String),

    #[error("単語が空です")]
    EmptyWord,
}
