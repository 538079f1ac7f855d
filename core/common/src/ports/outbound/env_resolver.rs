//! 環境変数解決 Outbound ポート
//!
//! 認証情報・テーブル設定・ホームディレクトリを環境変数から解決する。
//! usecase / cli はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のマップ実装など。
pub trait EnvResolver: Send + Sync {
    /// 環境変数の値。未設定・空文字列はどちらも None。
    fn var(&self, key: &str) -> Option<String>;

    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. STORYWATCH_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/storywatch（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/storywatch
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        if let Some(home) = self.var("STORYWATCH_HOME") {
            return Ok(HomeDir::new(PathBuf::from(home)));
        }
        let config_base = self
            .var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| self.var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok_or_else(|| Error::env("HOME is not set"))?;
        Ok(HomeDir::new(config_base.join("storywatch")))
    }

    /// カレントディレクトリを返す（相対パスのセッションファイル解決用）
    fn current_dir(&self) -> Result<PathBuf, Error>;
}
