//! レコードテーブル照会時の名前一致方式

use common::error::Error;
use std::fmt;
use std::str::FromStr;

/// 名前の一致方式
///
/// Substring は旧来の FIND() 相当で、"Al" が "Alice" に一致するなど誤検出がある。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// 完全一致（既定）
    #[default]
    Exact,
    /// 部分一致（既存行の名前に入力名が含まれていれば一致）
    Substring,
}

impl MatchMode {
    pub const VARIANTS: [&'static str; 2] = ["exact", "substring"];
}

#[cfg(test)]
impl MatchMode {
    /// `stored` が `name` に一致するか（メモリ実装・テスト用の判定）
    pub fn matches(&self, stored: &str, name: &str) -> bool {
        match self {
            MatchMode::Exact => stored == name,
            MatchMode::Substring => stored.contains(name),
        }
    }
}

impl FromStr for MatchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "substring" => Ok(MatchMode::Substring),
            other => Err(Error::invalid_argument(format!(
                "Unknown match mode '{}' (expected exact or substring)",
                other
            ))),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Exact => f.write_str("exact"),
            MatchMode::Substring => f.write_str("substring"),
        }
    }
}
