//! ユースケース層（ポート経由でのみ外界に触れる）

pub mod aggregate;
pub mod app;
pub mod reconcile;
pub mod session;
