//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。CLI の終了コードへの変換もここで定義する。

use thiserror::Error as ThisError;

/// 終了コード: 引数不正（EX_USAGE）
pub const EXIT_USAGE: i32 = 64;
/// 終了コード: 内部エラー（EX_SOFTWARE）
pub const EXIT_SOFTWARE: i32 = 70;
/// 終了コード: I/O エラー（EX_IOERR）
pub const EXIT_IOERR: i32 = 74;
/// 終了コード: 設定不備（EX_CONFIG）
pub const EXIT_CONFIG: i32 = 78;
/// 終了コード: パイプライン失敗（認証・プラットフォーム・同期）
pub const EXIT_FAILURE: i32 = 1;

/// エラー型
///
/// 認証・プラットフォーム・同期の 3 分類はパイプラインの失敗として扱い、
/// それ以外は環境やプロセス側の問題として扱う。
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("{0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("{0}")]
    Env(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    InvalidArgument(String),

    /// 認証情報の不正・セッション拒否（リトライしない）
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// ストーリー・閲覧者取得中のプラットフォーム側エラー（その回の実行は中断）
    #[error("platform error: {0}")]
    Platform(String),

    /// 名前単位の照会・追加の失敗（バッチは中断しない）
    #[error("reconciliation failed: {0}")]
    Reconciliation(String),

    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Error::Http(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Error::Authentication(msg.into())
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Error::Platform(msg.into())
    }

    pub fn reconciliation(msg: impl Into<String>) -> Self {
        Error::Reconciliation(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Error::System(msg.into())
    }

    /// 使い方の誤り（usage を表示すべき）かどうか
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => EXIT_USAGE,
            Error::Io(_) => EXIT_IOERR,
            Error::Env(_) => EXIT_CONFIG,
            Error::Authentication(_) | Error::Platform(_) | Error::Reconciliation(_) => {
                EXIT_FAILURE
            }
            Error::Json(_) | Error::Http(_) | Error::System(_) => EXIT_SOFTWARE,
        }
    }
}
