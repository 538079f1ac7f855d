//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, FileSystem, StderrLog, StdFileSystem, TeeLog};
use common::error::Error;
use common::ports::outbound::{EnvResolver, Log, LogLevel, LogRecord};

use crate::adapter::{
    AirtableTable, InstagramAuthenticator, JsonSessionStore, NoopInterruptChecker, SigintChecker,
};
use crate::domain::{Redactor, Settings};
use crate::ports::outbound::{InterruptChecker, RecordTable};
use crate::usecase::app::{ObsDeps, PolicyDeps, SessionDeps, StoryWatchDeps, StoryWatchUseCase};

/// 配線済みのアプリ（main の Runner が使う）
pub struct App {
    pub use_case: Arc<StoryWatchUseCase>,
    pub logger: Arc<dyn Log>,
}

/// 配線: 解決済みの設定から StoryWatchUseCase を組み立てる
pub fn wire_storywatch(settings: &Settings, env: &dyn EnvResolver) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);

    let home = env.resolve_home_dir()?;
    let file_log: Arc<dyn Log> = Arc::new(FileJsonLog::new(Arc::clone(&fs), home.log_file()));
    let logger: Arc<dyn Log> = if settings.verbose {
        let stderr: Arc<dyn Log> = Arc::new(StderrLog);
        Arc::new(TeeLog::new(vec![file_log, stderr]))
    } else {
        file_log
    };

    let store = Arc::new(JsonSessionStore::new(Arc::clone(&fs)));
    let authenticator = Arc::new(InstagramAuthenticator::new(settings.timeout)?);
    let table: Option<Arc<dyn RecordTable>> = match settings.table {
        Some(ref t) => Some(Arc::new(AirtableTable::new(t.clone(), settings.timeout)?)),
        None => None,
    };

    // ハンドラ登録はプロセスで 1 回きりなので、定期実行のときだけ行う
    let interrupt_checker: Arc<dyn InterruptChecker> = if settings.watch_interval.is_some() {
        match SigintChecker::new() {
            Ok(c) => Arc::new(c),
            Err(e) => {
                let _ = logger.log(
                    &LogRecord::new(LogLevel::Warn, "Ctrl+C handler could not be installed")
                        .layer("wiring")
                        .kind("lifecycle")
                        .field("error", e.to_string()),
                );
                Arc::new(NoopInterruptChecker)
            }
        }
    } else {
        Arc::new(NoopInterruptChecker)
    };

    let use_case = StoryWatchUseCase::new(StoryWatchDeps {
        session: SessionDeps {
            store,
            authenticator,
        },
        table,
        policy: PolicyDeps {
            redactor: Redactor::new(settings.secrets()),
            interrupt_checker,
        },
        obs: ObsDeps {
            log: Arc::clone(&logger),
        },
    });

    Ok(App {
        use_case: Arc::new(use_case),
        logger,
    })
}
