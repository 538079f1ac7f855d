//! Inbound ポート: ドライバ（CLI 等）がアプリを呼び出すインターフェース

use crate::domain::{InvocationResponse, RunRequest, StoryWatchCommand};
use common::error::Error;

/// パイプラインを 1 回実行する Inbound ポート
///
/// HTTP ハンドラ・サーバーレス関数・CLI のいずれもこの trait を通して同じパイプラインを呼ぶ。
/// 失敗も含めて必ず InvocationResponse を返す。
pub trait RunPipeline: Send + Sync {
    fn invoke(&self, request: &RunRequest) -> InvocationResponse;
}

/// 解析済みコマンドを実行する Inbound ポート（main の Runner が実装する）
pub trait UseCaseRunner {
    fn run(&self, command: StoryWatchCommand) -> Result<i32, Error>;
}
