//! 同期（照合・追加）の結果

use serde::Serialize;

/// 名前 1 件分の失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameFailure {
    pub name: String,
    pub message: String,
}

/// 同期結果
///
/// 各リストは初出順。異なる名前はいずれか 1 つのリストにだけ現れる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub inserted: Vec<String>,
    pub already_present: Vec<String>,
    pub failed: Vec<NameFailure>,
}

impl ReconciliationReport {
    /// 失敗が 1 件もないか
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// 分類済みの異なる名前の数
    pub fn distinct_names(&self) -> usize {
        self.inserted.len() + self.already_present.len() + self.failed.len()
    }
}
