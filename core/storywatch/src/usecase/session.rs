//! セッションの復元または新規作成
//!
//! 記述子ファイルがあれば読み込んで認証（高速経路）、無ければ新規ログインして書き出す。
//! 復元したセッションが期限切れで再ログインになった場合も書き出し直す。
//! 認証失敗はリトライせず、そのまま Authentication エラーとして返す。

use crate::domain::{Credentials, SessionFile};
use crate::ports::outbound::{PlatformAuthenticator, PlatformSession, SessionStore};
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

/// セッションの出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// 保存済みの記述子から復元した
    Restored,
    /// 保存済みの記述子が期限切れで、再ログインして書き出し直した
    Refreshed,
    /// 新規ログインして記述子を書き出した
    Created,
}

/// 認証済みセッションとその出どころ
pub struct AcquiredSession {
    pub session: Box<dyn PlatformSession>,
    pub origin: SessionOrigin,
}

/// セッションストアと認証ポートを組み合わせて認証済みセッションを得る
pub struct SessionRestorer {
    store: Arc<dyn SessionStore>,
    authenticator: Arc<dyn PlatformAuthenticator>,
    log: Arc<dyn Log>,
}

impl SessionRestorer {
    pub fn new(
        store: Arc<dyn SessionStore>,
        authenticator: Arc<dyn PlatformAuthenticator>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            store,
            authenticator,
            log,
        }
    }

    pub fn restore_or_create(
        &self,
        credentials: &Credentials,
        file: &SessionFile,
    ) -> Result<AcquiredSession, Error> {
        // 認証情報の欠落は事前検証せず、認証失敗として扱う
        if !credentials.is_complete() {
            return Err(Error::authentication(
                "username or password is missing (set IG_USERNAME and IG_PASSWORD)",
            ));
        }

        let restored = self.store.load(file).map_err(|e| {
            Error::authentication(format!(
                "session file '{}' could not be loaded: {}",
                file.as_path().display(),
                e
            ))
        })?;

        match restored {
            Some(descriptor) => {
                let session = self
                    .authenticator
                    .authenticate(credentials, Some(&descriptor))?;
                let (origin, message) = if session.is_fresh_login() {
                    self.store.save(file, &session.descriptor()?)?;
                    (SessionOrigin::Refreshed, "session refreshed")
                } else {
                    (SessionOrigin::Restored, "session restored")
                };
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Info, message)
                        .layer("usecase")
                        .kind("session")
                        .field("path", file.as_path().display().to_string()),
                );
                Ok(AcquiredSession { session, origin })
            }
            None => {
                let session = self.authenticator.authenticate(credentials, None)?;
                let descriptor = session.descriptor()?;
                self.store.save(file, &descriptor)?;
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Info, "session created")
                        .layer("usecase")
                        .kind("session")
                        .field("path", file.as_path().display().to_string()),
                );
                Ok(AcquiredSession {
                    session,
                    origin: SessionOrigin::Created,
                })
            }
        }
    }
}
