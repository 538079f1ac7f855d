//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI 等の Invocation Adapter）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（プラットフォーム・レコードテーブル・セッションファイル等）を使うための trait

pub mod inbound;
pub mod outbound;
