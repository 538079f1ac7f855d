//! テスト用: 固定のストーリー・閲覧者を返す PlatformAuthenticator / PlatformSession 実装


#[cfg(test)]
pub use fake::{FakePlatform, FakeStory};
