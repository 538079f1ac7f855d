//! 認証済みセッションの記述子と、その保存先

use serde_json::Value;
use std::path::{Path, PathBuf};

/// 認証状態（Cookie / トークン / 端末情報）をシリアライズした不透明な値
///
/// 中身の構造はプラットフォームアダプタだけが知っている。usecase は保存・復元するだけ。
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDescriptor(Value);

impl SessionDescriptor {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// 伏せ字対象にする文字列値（8 文字以上の葉の文字列すべて）
    ///
    /// トークンや Cookie はエラーメッセージに出してはいけないため、Redactor に渡す。
    pub fn secret_values(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_strings(&self.0, &mut out);
        out.retain(|s| s.chars().count() >= 8);
        out
    }
}

fn collect_strings(v: &Value, out: &mut Vec<String>) {
    match v {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|i| collect_strings(i, out)),
        Value::Object(map) => map.values().for_each(|i| collect_strings(i, out)),
        _ => {}
    }
}

/// セッション記述子ファイルのパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile(PathBuf);

impl SessionFile {
    /// 既定のファイル名（カレントディレクトリ直下）
    pub const DEFAULT_NAME: &'static str = "ig_settings.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for SessionFile {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
