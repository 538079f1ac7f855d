//! Invocation Adapter の境界で返す判別付きの結果

use super::report::ReconciliationReport;
use common::error::Error;
use serde_json::{json, Value};

/// 失敗の分類（HTTP 風ステータスの決定に使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    Platform,
    Internal,
}

impl FailureKind {
    pub fn from_error(e: &Error) -> Self {
        match e {
            Error::Authentication(_) => FailureKind::Authentication,
            Error::Platform(_) => FailureKind::Platform,
            _ => FailureKind::Internal,
        }
    }
}

/// パイプライン 1 回分の応答。境界の外へ例外・エラーは出さず、必ずこの形にする。
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResponse {
    Success {
        /// 集約した閲覧者名（ストーリー順・重複あり）
        viewers: Vec<String>,
        /// 同期を行った場合の分類結果
        report: Option<ReconciliationReport>,
    },
    Failure {
        kind: FailureKind,
        /// 伏せ字済みのメッセージ
        message: String,
    },
}

impl InvocationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResponse::Success { .. })
    }

    /// HTTP 風のステータスコード
    pub fn status_code(&self) -> u16 {
        match self {
            InvocationResponse::Success { .. } => 200,
            InvocationResponse::Failure { kind, .. } => match kind {
                FailureKind::Authentication => 401,
                FailureKind::Platform => 502,
                FailureKind::Internal => 500,
            },
        }
    }

    /// CLI の終了コード
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            common::error::EXIT_FAILURE
        }
    }

    /// JSON 本文: 成功時 `{"viewers": [...]}`（同期時は分類を追加）、失敗時 `{"error": "..."}`
    pub fn body(&self) -> Value {
        match self {
            InvocationResponse::Success { viewers, report } => {
                let mut body = json!({ "viewers": viewers });
                if let Some(r) = report {
                    body["inserted"] = json!(r.inserted);
                    body["already_present"] = json!(r.already_present);
                    body["failed"] = json!(r.failed);
                }
                body
            }
            InvocationResponse::Failure { message, .. } => json!({ "error": message }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NameFailure;

    #[test]
    fn test_success_body_without_report() {
        let r = InvocationResponse::Success {
            viewers: vec!["Alice".into(), "Bob".into(), "Alice".into()],
            report: None,
        };
        assert_eq!(r.status_code(), 200);
        assert_eq!(r.exit_code(), 0);
        assert_eq!(r.body(), json!({"viewers": ["Alice", "Bob", "Alice"]}));
    }

    #[test]
    fn test_success_body_with_report() {
        let r = InvocationResponse::Success {
            viewers: vec!["Alice".into(), "Bob".into()],
            report: Some(ReconciliationReport {
                inserted: vec!["Bob".into()],
                already_present: vec!["Alice".into()],
                failed: vec![NameFailure {
                    name: "Eve".into(),
                    message: "HTTP 500".into(),
                }],
            }),
        };
        let body = r.body();
        assert_eq!(body["inserted"], json!(["Bob"]));
        assert_eq!(body["already_present"], json!(["Alice"]));
        assert_eq!(body["failed"][0]["name"], "Eve");
    }

    #[test]
    fn test_failure_status_by_kind() {
        let auth = InvocationResponse::Failure {
            kind: FailureKind::from_error(&Error::authentication("x")),
            message: "authentication failed: x".into(),
        };
        assert_eq!(auth.status_code(), 401);
        assert_eq!(auth.exit_code(), 1);
        assert_eq!(auth.body(), json!({"error": "authentication failed: x"}));

        let platform = InvocationResponse::Failure {
            kind: FailureKind::from_error(&Error::platform("x")),
            message: String::new(),
        };
        assert_eq!(platform.status_code(), 502);

        let io = InvocationResponse::Failure {
            kind: FailureKind::from_error(&Error::io_msg("x")),
            message: String::new(),
        };
        assert_eq!(io.status_code(), 500);
    }
}
