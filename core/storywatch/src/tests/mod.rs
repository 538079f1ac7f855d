//! パイプライン単位のシナリオテスト（フェイクのプラットフォームとメモリ上のテーブルを使う）

mod pipeline_tests;
mod reconcile_tests;

use std::path::Path;
use std::sync::Arc;

use common::adapter::{NoopLog, StdFileSystem};

use crate::adapter::{FakePlatform, JsonSessionStore, MemoryTable, NoopInterruptChecker};
use crate::domain::{Credentials, Redactor, RunRequest, SessionFile};
use crate::ports::outbound::{InterruptChecker, RecordTable};
use crate::usecase::app::{ObsDeps, PolicyDeps, SessionDeps, StoryWatchDeps, StoryWatchUseCase};

pub(crate) const USERNAME: &str = "storyteller";
pub(crate) const PASSWORD: &str = "correct-horse-battery";
pub(crate) const API_KEY: &str = "patAIRTABLEKEY0001";

/// フェイクで組み立てた UseCase
pub(crate) fn use_case_with(
    platform: &Arc<FakePlatform>,
    table: Option<&Arc<MemoryTable>>,
    interrupt_checker: Arc<dyn InterruptChecker>,
) -> StoryWatchUseCase {
    StoryWatchUseCase::new(StoryWatchDeps {
        session: SessionDeps {
            store: Arc::new(JsonSessionStore::new(Arc::new(StdFileSystem))),
            authenticator: Arc::clone(platform) as _,
        },
        table: table.map(|t| Arc::clone(t) as Arc<dyn RecordTable>),
        policy: PolicyDeps {
            redactor: Redactor::new([API_KEY.to_string()]),
            interrupt_checker,
        },
        obs: ObsDeps {
            log: Arc::new(NoopLog),
        },
    })
}

pub(crate) fn use_case(
    platform: &Arc<FakePlatform>,
    table: Option<&Arc<MemoryTable>>,
) -> StoryWatchUseCase {
    use_case_with(platform, table, Arc::new(NoopInterruptChecker))
}

pub(crate) fn request(dir: &Path, password: &str, reconcile: bool) -> RunRequest {
    RunRequest {
        credentials: Credentials::new(USERNAME, password),
        session_file: SessionFile::new(dir.join("ig_settings.json")),
        reconcile,
    }
}
