//! storywatch コマンドの enum（Command Pattern）
//!
//! 1 回実行 vs 定期実行の分岐を enum で明示する。

use super::credentials::Credentials;
use super::session_descriptor::SessionFile;
use std::time::Duration;

/// パイプライン 1 回分の入力
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub credentials: Credentials,
    pub session_file: SessionFile,
    /// false なら閲覧者の収集だけ行い、レコードテーブルへの同期はしない
    pub reconcile: bool,
}

/// storywatch の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum StoryWatchCommand {
    /// パイプラインを 1 回実行
    Run(RunRequest),
    /// Ctrl+C まで interval ごとにパイプラインを順次実行
    Watch {
        request: RunRequest,
        interval: Duration,
    },
}
