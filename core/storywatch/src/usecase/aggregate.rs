//! 閲覧者の集約
//!
//! 公開中ストーリーをプラットフォームの返却順に辿り、各ストーリーの閲覧者表示名を 1 本の列に連結する。
//! 同じ人が複数ストーリーを見ていれば複数回現れる（重複排除は同期側の責務）。

use crate::domain::AccountId;
use crate::ports::outbound::PlatformSession;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct ViewerAggregator {
    log: Arc<dyn Log>,
}

impl ViewerAggregator {
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self { log }
    }

    /// 閲覧者表示名の列を返す。取得失敗はその時点で中断し、部分結果は返さない。
    pub fn collect_viewer_names(
        &self,
        session: &dyn PlatformSession,
        account_id: &AccountId,
    ) -> Result<Vec<String>, Error> {
        let stories = session.list_active_stories(account_id)?;
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "stories listed")
                .layer("usecase")
                .kind("platform")
                .field("count", stories.len()),
        );

        let mut names = Vec::new();
        for story in &stories {
            let viewers = session.list_story_viewers(&story.id)?;
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Debug, "story viewers fetched")
                    .layer("usecase")
                    .kind("platform")
                    .field("story", story.id.to_string())
                    .field("count", viewers.len()),
            );
            names.extend(viewers.iter().map(|v| v.display_name().to_string()));
        }
        Ok(names)
    }
}
