//! ソーシャルメディアプラットフォーム Outbound ポート
//!
//! ログインして得たセッションを明示的なオブジェクトとして返し、集約処理に渡す。
//! プロセス全体で共有するクライアント状態は持たない。

use crate::domain::{AccountId, Credentials, SessionDescriptor, Story, StoryId, Viewer};
use common::error::Error;

/// 認証してセッションを得る能力
pub trait PlatformAuthenticator: Send + Sync {
    /// `restored` があればその状態と認証情報で認証し（高速経路）、無ければ認証情報だけで新規ログインする。
    ///
    /// 認証情報の誤り・セッション拒否は `Error::Authentication`。
    fn authenticate(
        &self,
        credentials: &Credentials,
        restored: Option<&SessionDescriptor>,
    ) -> Result<Box<dyn PlatformSession>, Error>;
}

/// 認証済みセッション上の操作
///
/// いずれも失敗時は `Error::Platform`（通信失敗・レート制限・権限・取得中の期限切れ等）。
pub trait PlatformSession: Send {
    /// 認証済みアカウント自身の ID
    fn current_account_id(&self) -> Result<AccountId, Error>;

    /// 現在公開中のストーリー（プラットフォームの返却順）。無ければ空。
    fn list_active_stories(&self, account_id: &AccountId) -> Result<Vec<Story>, Error>;

    /// ストーリーの閲覧者（ページングは実装側で辿り切る）。まだ誰も見ていなければ空。
    fn list_story_viewers(&self, story_id: &StoryId) -> Result<Vec<Viewer>, Error>;

    /// パスワードによるログインで得たセッションか。
    ///
    /// 復元を試みて期限切れだったために再ログインした場合も true（記述子を保存し直す）。
    fn is_fresh_login(&self) -> bool;

    /// 永続化用の現在のセッション記述子
    fn descriptor(&self) -> Result<SessionDescriptor, Error>;
}
