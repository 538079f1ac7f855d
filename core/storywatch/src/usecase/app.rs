use crate::domain::{
    FailureKind, InvocationResponse, ReconciliationReport, Redactor, RunRequest,
};
use crate::ports::inbound::RunPipeline;
use crate::ports::outbound::{InterruptChecker, PlatformAuthenticator, RecordTable, SessionStore};
use crate::usecase::aggregate::ViewerAggregator;
use crate::usecase::reconcile::Reconciler;
use crate::usecase::session::{SessionOrigin, SessionRestorer};
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;
use std::time::Duration;

// --- 責務別 Deps（usecase が定義を所有し、wiring は組み立てるだけ）

pub struct StoryWatchDeps {
    pub session: SessionDeps,
    /// None なら同期不可（収集のみ）
    pub table: Option<Arc<dyn RecordTable>>,
    pub policy: PolicyDeps,
    pub obs: ObsDeps,
}

pub struct SessionDeps {
    pub store: Arc<dyn SessionStore>,
    pub authenticator: Arc<dyn PlatformAuthenticator>,
}

pub struct PolicyDeps {
    /// 応答メッセージから伏せる固定の秘密（パスワード・API キー）
    pub redactor: Redactor,
    pub interrupt_checker: Arc<dyn InterruptChecker>,
}

pub struct ObsDeps {
    pub log: Arc<dyn Log>,
}

/// 定期実行で割り込みを確認する間隔
const WATCH_POLL: Duration = Duration::from_millis(200);

/// storywatch のユースケース（セッション → 集約 → 同期のパイプライン）
pub struct StoryWatchUseCase {
    deps: StoryWatchDeps,
}

impl StoryWatchUseCase {
    pub fn new(deps: StoryWatchDeps) -> Self {
        Self { deps }
    }

    fn log(&self, record: LogRecord) {
        let _ = self.deps.obs.log.log(&record.layer("usecase"));
    }

    /// パイプラインを 1 回実行する。致命的エラーはそのまま返す。
    ///
    /// セッション取得後は記述子の秘密を `redactor` に加える（失敗時のメッセージ用）。
    pub fn run_pipeline(
        &self,
        request: &RunRequest,
        redactor: &mut Redactor,
    ) -> Result<(Vec<String>, Option<ReconciliationReport>), Error> {
        let reconciler = if request.reconcile {
            let table = self.deps.table.as_ref().ok_or_else(|| {
                Error::system("record table is not configured (use --collect-only to skip syncing)")
            })?;
            Some(Reconciler::new(Arc::clone(table), Arc::clone(&self.deps.obs.log)))
        } else {
            None
        };

        let restorer = SessionRestorer::new(
            Arc::clone(&self.deps.session.store),
            Arc::clone(&self.deps.session.authenticator),
            Arc::clone(&self.deps.obs.log),
        );
        let acquired = restorer.restore_or_create(&request.credentials, &request.session_file)?;
        if let Ok(descriptor) = acquired.session.descriptor() {
            redactor.extend(descriptor.secret_values());
        }
        let session = acquired.session;

        let account_id = session.current_account_id()?;
        let aggregator = ViewerAggregator::new(Arc::clone(&self.deps.obs.log));
        let viewers = aggregator.collect_viewer_names(session.as_ref(), &account_id)?;
        self.log(
            LogRecord::new(LogLevel::Info, "viewers collected")
                .kind("platform")
                .field("count", viewers.len())
                .field(
                    "session",
                    match acquired.origin {
                        SessionOrigin::Restored => "restored",
                        SessionOrigin::Refreshed => "refreshed",
                        SessionOrigin::Created => "created",
                    },
                ),
        );

        let report = reconciler.map(|r| {
            let report = r.reconcile(&viewers);
            let level = if report.is_clean() {
                LogLevel::Info
            } else {
                LogLevel::Warn
            };
            self.log(
                LogRecord::new(level, "reconciliation finished")
                    .kind("reconcile")
                    .field("names", report.distinct_names())
                    .field("inserted", report.inserted.len())
                    .field("already_present", report.already_present.len())
                    .field("failed", report.failed.len()),
            );
            report
        });

        Ok((viewers, report))
    }

    /// 割り込みまで interval ごとにパイプラインを順次実行する。実行回数を返す。
    ///
    /// 各回の失敗は応答として `on_response` に渡し、ループは止めない。
    pub fn watch(
        &self,
        request: &RunRequest,
        interval: Duration,
        on_response: &mut dyn FnMut(&InvocationResponse),
    ) -> usize {
        let interrupt = &self.deps.policy.interrupt_checker;
        let mut runs = 0;
        loop {
            if interrupt.is_interrupted() {
                break;
            }
            let response = self.invoke(request);
            on_response(&response);
            runs += 1;

            let mut remaining = interval;
            while !remaining.is_zero() && !interrupt.is_interrupted() {
                let step = remaining.min(WATCH_POLL);
                std::thread::sleep(step);
                remaining -= step;
            }
        }
        self.log(
            LogRecord::new(LogLevel::Info, "watch stopped")
                .kind("lifecycle")
                .field("runs", runs),
        );
        runs
    }
}

impl RunPipeline for StoryWatchUseCase {
    fn invoke(&self, request: &RunRequest) -> InvocationResponse {
        let mut redactor = self.deps.policy.redactor.clone();
        redactor.extend([request.credentials.password().to_string()]);

        match self.run_pipeline(request, &mut redactor) {
            Ok((viewers, report)) => {
                let report = report.map(|mut r| {
                    for f in &mut r.failed {
                        f.message = redactor.redact(&f.message);
                    }
                    r
                });
                InvocationResponse::Success { viewers, report }
            }
            Err(e) => {
                let message = redactor.redact(&e.to_string());
                self.log(
                    LogRecord::new(LogLevel::Error, message.clone()).kind("error"),
                );
                InvocationResponse::Failure {
                    kind: FailureKind::from_error(&e),
                    message,
                }
            }
        }
    }
}
