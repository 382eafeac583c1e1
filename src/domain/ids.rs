//! 共享标识符
//!
//! Guild / User / Channel 均为聊天平台的 snowflake（u64）。
//! 序列化为字符串，反序列化同时接受字符串和数字（JS 侧无法安全表示 u64）。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSnowflake {
    Number(u64),
    Text(String),
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match RawSnowflake::deserialize(deserializer)? {
                    RawSnowflake::Number(n) => Ok(Self(n)),
                    RawSnowflake::Text(s) => s.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

snowflake_id!(
    /// Guild（独立的读上单位）
    GuildId
);
snowflake_id!(
    /// 用户
    UserId
);
snowflake_id!(
    /// 频道（语音输出频道或通知文字频道）
    ChannelId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string_and_number() {
        let a: GuildId = serde_json::from_str("\"1234567890123456789\"").unwrap();
        let b: GuildId = serde_json::from_str("1234567890123456789").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(), 1234567890123456789);
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&UserId::new(42)).unwrap();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn test_reject_garbage() {
        assert!(serde_json::from_str::<ChannelId>("\"abc\"").is_err());
    }
}
