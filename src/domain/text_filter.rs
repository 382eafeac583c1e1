//! 文本过滤与变换
//!
//! - 入口过滤：含 URL 或过大数字的消息不朗读
//! - 变换：辞书替换 + 超长截断，纯函数、无失败路径

use regex::Regex;
use std::sync::LazyLock;

use super::dictionary::GuildDictionary;

/// 超过此字符数的文本被截断
pub const DEFAULT_MAX_CHARS: usize = 500;
/// 截断后保留的开头字符数
pub const DEFAULT_KEEP_CHARS: usize = 10;
/// 截断标记
pub const DEFAULT_OMISSION_MARKER: &str = "以下略";
/// 数字字面量达到此值时拒绝朗读
pub const LARGE_NUMBER_THRESHOLD: u64 = 100_000_000;

/// 任意书写系统的十进制数字串（`\d` 即 Unicode Nd）
static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid numeral regex"));

static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("valid digit regex"));

/// 截断规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRules {
    pub max_chars: usize,
    pub keep_chars: usize,
    pub omission_marker: String,
}

impl Default for TextRules {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            keep_chars: DEFAULT_KEEP_CHARS,
            omission_marker: DEFAULT_OMISSION_MARKER.to_string(),
        }
    }
}

/// 拒绝朗读的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    ContainsUrl,
    LargeNumber,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::ContainsUrl => "contains_url",
            RejectReason::LargeNumber => "large_number",
        }
    }
}

fn is_decimal_digit(ch: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(ch.encode_utf8(&mut buf))
}

/// 十进制数字的值
///
/// Unicode 的 Nd 字符以 0 到 9 连续编码，值等于前方连续 Nd 字符数对 10 取余
fn digit_value(ch: char) -> u32 {
    if let Some(value) = ch.to_digit(10) {
        return value;
    }
    let mut preceding = 0;
    let mut code = ch as u32;
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        preceding += 1;
        code -= 1;
    }
    preceding % 10
}

/// 数字串的值是否达到阈值
///
/// 按有效位数判断，任意长度都不会溢出
fn is_large_numeral(digits: &str) -> bool {
    let significant = digits.chars().skip_while(|c| digit_value(*c) == 0).count();
    let threshold_digits = LARGE_NUMBER_THRESHOLD.to_string().len();
    significant >= threshold_digits
}

/// 入口过滤（在替换之前、针对原始内容）
pub fn check_readable(raw: &str) -> Result<(), RejectReason> {
    if raw.contains("http://") || raw.contains("https://") {
        return Err(RejectReason::ContainsUrl);
    }
    if NUMERAL.find_iter(raw).any(|m| is_large_numeral(m.as_str())) {
        return Err(RejectReason::LargeNumber);
    }
    Ok(())
}

/// 超长截断：超过 max_chars 时替换为开头 keep_chars 个字符 + 截断标记
pub fn truncate(text: String, rules: &TextRules) -> String {
    if text.chars().count() <= rules.max_chars {
        return text;
    }
    let mut head: String = text.chars().take(rules.keep_chars).collect();
    head.push_str(&rules.omission_marker);
    head
}

/// 辞书替换后截断
pub fn transform(raw: &str, dictionary: &GuildDictionary, rules: &TextRules) -> String {
    truncate(dictionary.substitute(raw), rules)
}
