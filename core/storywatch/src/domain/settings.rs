//! CLI 引数と環境変数から解決した実行設定

use super::credentials::Credentials;
use super::match_mode::MatchMode;
use super::session_descriptor::SessionFile;
use std::fmt;
use std::time::Duration;

/// 既定のテーブル名
pub const DEFAULT_TABLE: &str = "Table 1";
/// 既定の名前フィールド
pub const DEFAULT_FIELD: &str = "User";
/// HTTP タイムアウトの既定値
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// レコードテーブル（Airtable）の接続設定
#[derive(Clone, PartialEq, Eq)]
pub struct TableSettings {
    pub api_key: String,
    pub base_id: String,
    pub table: String,
    pub field: String,
    pub match_mode: MatchMode,
}

impl fmt::Debug for TableSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSettings")
            .field("api_key", &"***")
            .field("base_id", &self.base_id)
            .field("table", &self.table)
            .field("field", &self.field)
            .field("match_mode", &self.match_mode)
            .finish()
    }
}

/// 実行設定
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub credentials: Credentials,
    pub session_file: SessionFile,
    /// None なら収集のみ（--collect-only）
    pub table: Option<TableSettings>,
    pub timeout: Duration,
    pub watch_interval: Option<Duration>,
    pub verbose: bool,
}

impl Settings {
    /// 応答メッセージから伏せるべき秘密（パスワード・API キー）
    pub fn secrets(&self) -> Vec<String> {
        let mut s = vec![self.credentials.password().to_string()];
        if let Some(ref t) = self.table {
            s.push(t.api_key.clone());
        }
        s
    }
}
