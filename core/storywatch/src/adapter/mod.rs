//! アダプター（Outbound ポートの実装）

pub mod airtable;
pub mod instagram;
pub mod json_session_store;
pub mod settings;
pub mod sigint_checker;

mod fake_platform;
mod memory_table;

pub use airtable::AirtableTable;
pub use instagram::InstagramAuthenticator;
pub use json_session_store::JsonSessionStore;
pub use settings::resolve_settings;
pub use sigint_checker::{NoopInterruptChecker, SigintChecker};

#[cfg(test)]
pub use fake_platform::{FakePlatform, FakeStory};
#[cfg(test)]
pub use memory_table::MemoryTable;
