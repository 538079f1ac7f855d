//! storywatch 共通ライブラリ
//!
//! エラー型・ドメイン Newtype・Outbound ポート（FS / 環境変数 / 構造化ログ）と、
//! その標準実装を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Ports & Adapters のポート定義
pub mod ports;

/// 標準アダプタ（std::fs / std::env / ファイルログ）
pub mod adapter;
