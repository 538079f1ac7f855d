//! レコードテーブルとの同期（未登録の名前だけを追加）
//!
//! 名前ごとに照会し、既存なら何もしない・無ければ 1 行追加する。既存行は更新しない。
//! 1 件の失敗は記録して残りの処理を続ける。同じ名前が入力に何度現れても分類は初出の 1 回だけ。

use crate::domain::{NameFailure, ReconciliationReport};
use crate::ports::outbound::RecordTable;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::collections::HashSet;
use std::sync::Arc;

pub struct Reconciler {
    table: Arc<dyn RecordTable>,
    log: Arc<dyn Log>,
}

enum Outcome {
    Inserted,
    AlreadyPresent,
}

impl Reconciler {
    pub fn new(table: Arc<dyn RecordTable>, log: Arc<dyn Log>) -> Self {
        Self { table, log }
    }

    pub fn reconcile(&self, names: &[String]) -> ReconciliationReport {
        let mut report = ReconciliationReport::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match self.reconcile_one(name) {
                Ok(Outcome::Inserted) => {
                    self.log_outcome(LogLevel::Info, "viewer inserted", name, None);
                    report.inserted.push(name.clone());
                }
                Ok(Outcome::AlreadyPresent) => {
                    self.log_outcome(LogLevel::Debug, "viewer already present", name, None);
                    report.already_present.push(name.clone());
                }
                Err(e) => {
                    let message = e.to_string();
                    self.log_outcome(LogLevel::Warn, "viewer reconciliation failed", name, Some(&message));
                    report.failed.push(NameFailure {
                        name: name.clone(),
                        message,
                    });
                }
            }
        }
        report
    }

    fn reconcile_one(&self, name: &str) -> Result<Outcome, Error> {
        let existing = self
            .table
            .find(name)
            .map_err(|e| Error::reconciliation(format!("lookup of '{}' failed: {}", name, e)))?;
        if existing.is_some() {
            return Ok(Outcome::AlreadyPresent);
        }
        self.table
            .create(name)
            .map_err(|e| Error::reconciliation(format!("insert of '{}' failed: {}", name, e)))?;
        Ok(Outcome::Inserted)
    }

    fn log_outcome(&self, level: LogLevel, message: &str, name: &str, error: Option<&str>) {
        let mut rec = LogRecord::new(level, message)
            .layer("usecase")
            .kind("reconcile")
            .field("name", name);
        if let Some(e) = error {
            rec = rec.field("error", e);
        }
        let _ = self.log.log(&rec);
    }
}
