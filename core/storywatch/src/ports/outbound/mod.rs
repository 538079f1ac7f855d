//! Outbound ポート: アプリが外界（プラットフォーム・レコードテーブル・セッションファイル・割り込み）を使うための trait

pub mod interrupt_checker;
pub mod platform;
pub mod record_table;
pub mod session_store;

pub use interrupt_checker::InterruptChecker;
pub use platform::{PlatformAuthenticator, PlatformSession};
pub use record_table::RecordTable;
pub use session_store::SessionStore;
