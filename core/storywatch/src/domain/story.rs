//! ストーリー・閲覧者・レコードの識別子と値

use serde::Serialize;
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(
    /// 認証済みアカウント自身の ID（ストーリー一覧のスコープ）
    AccountId
);
id_newtype!(
    /// ストーリーの ID（閲覧者取得に使う）
    StoryId
);
id_newtype!(
    /// レコードテーブル上の行 ID
    RecordId
);

/// アカウントに現在公開中のストーリー。実行ごとに取得し直し、キャッシュしない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub id: StoryId,
    /// 投稿時刻（Unix 秒）。プラットフォームが返さない場合は None。
    pub taken_at: Option<i64>,
}

/// ストーリーを閲覧したユーザー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub username: String,
    pub full_name: String,
}

impl Viewer {
    pub fn new(username: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
        }
    }

    /// 表示名。full_name が空ならユーザー名で代替する。重複排除のキーになる。
    pub fn display_name(&self) -> &str {
        let full = self.full_name.trim();
        if full.is_empty() {
            &self.username
        } else {
            full
        }
    }
}
