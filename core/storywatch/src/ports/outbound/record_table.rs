//! レコードテーブル Outbound ポート
//!
//! 名前フィールドをキーにした外部の表形式ストア。照会と追加のみで、更新・削除はしない。

use crate::domain::RecordId;
use common::error::Error;

/// 名前キーのレコードテーブル
pub trait RecordTable: Send + Sync {
    /// 名前に一致する既存行があればその ID（一致方式は実装の設定による）
    fn find(&self, name: &str) -> Result<Option<RecordId>, Error>;

    /// 名前フィールドだけを持つ行を追加する
    fn create(&self, name: &str) -> Result<RecordId, Error>;
}
