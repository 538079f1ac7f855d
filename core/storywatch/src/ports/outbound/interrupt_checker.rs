//! Ctrl+C（SIGINT）等による割り込みを検知する Outbound ポート
//!
//! 定期実行（--watch）の待機中・実行間に参照し、true なら次の実行をせずに終了する。

/// 割り込みが要求されたかどうかを返す能力
pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;
}
