//! セッション記述子の保存・読み込み Outbound ポート
//!
//! 繰り返し実行で再ログインを避けるため、認証状態をファイルに残す。

use crate::domain::{SessionDescriptor, SessionFile};
use common::error::Error;

/// セッション記述子を保存・復元する能力
pub trait SessionStore: Send + Sync {
    /// ファイルがあれば Some、無ければ Ok(None)。読めない・壊れている場合は Err。
    fn load(&self, file: &SessionFile) -> Result<Option<SessionDescriptor>, Error>;

    /// 記述子を書き込む（既存ファイルは上書き）
    fn save(&self, file: &SessionFile, descriptor: &SessionDescriptor) -> Result<(), Error>;
}
