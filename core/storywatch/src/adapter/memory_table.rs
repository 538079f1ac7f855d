//! テスト用: メモリ上の RecordTable 実装

#[cfg(test)]
mod memory {
    use common::error::Error;
    use std::sync::Mutex;

    use crate::domain::{MatchMode, RecordId};
    use crate::ports::outbound::RecordTable;

    /// テスト用: 行を Vec に持つレコードテーブル
    pub struct MemoryTable {
        rows: Mutex<Vec<(RecordId, String)>>,
        match_mode: MatchMode,
        fail_names: Vec<String>,
        fail_create_names: Vec<String>,
    }

    impl MemoryTable {
        pub fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                match_mode: MatchMode::Exact,
                fail_names: Vec::new(),
                fail_create_names: Vec::new(),
            }
        }

        pub fn with_rows(names: &[&str]) -> Self {
            let table = Self::new();
            for name in names {
                let _ = table.insert(name);
            }
            table
        }

        pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
            self.match_mode = mode;
            self
        }

        /// 指定の名前の照会を失敗させる
        pub fn failing_on(mut self, name: &str) -> Self {
            self.fail_names.push(name.to_string());
            self
        }

        /// 指定の名前の追加を失敗させる（照会は通る）
        pub fn failing_create_on(mut self, name: &str) -> Self {
            self.fail_create_names.push(name.to_string());
            self
        }

        /// 現在の行の名前（追加順）
        pub fn rows(&self) -> Vec<String> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .map(|(_, n)| n.clone())
                .collect()
        }

        fn insert(&self, name: &str) -> RecordId {
            let mut rows = self.rows.lock().unwrap();
            let id = RecordId::new(format!("rec{:04}", rows.len() + 1));
            rows.push((id.clone(), name.to_string()));
            id
        }
    }

    impl RecordTable for MemoryTable {
        fn find(&self, name: &str) -> Result<Option<RecordId>, Error> {
            if self.fail_names.iter().any(|n| n == name) {
                return Err(Error::http(format!("table unavailable for {}", name)));
            }
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .find(|(_, stored)| self.match_mode.matches(stored, name))
                .map(|(id, _)| id.clone()))
        }

        fn create(&self, name: &str) -> Result<RecordId, Error> {
            if self.fail_create_names.iter().any(|n| n == name) {
                return Err(Error::http(format!(
                    "HTTP 422 while creating record: INVALID_VALUE_FOR_COLUMN ({})",
                    name
                )));
            }
            Ok(self.insert(name))
        }
    }
}

#[cfg(test)]
pub use memory::MemoryTable;
