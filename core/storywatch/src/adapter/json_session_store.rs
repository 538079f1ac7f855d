//! セッション記述子を JSON ファイルで保存・読み込みするアダプタ

use crate::domain::{SessionDescriptor, SessionFile};
use crate::ports::outbound::SessionStore;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::sync::Arc;

/// FileSystem ポート経由で記述子を JSON として読み書きする実装
pub struct JsonSessionStore {
    fs: Arc<dyn FileSystem>,
}

impl JsonSessionStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self, file: &SessionFile) -> Result<Option<SessionDescriptor>, Error> {
        let path = file.as_path();
        if !self.fs.exists(path) {
            return Ok(None);
        }
        let s = self.fs.read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&s)
            .map_err(|e| Error::json(format!("'{}': {}", path.display(), e)))?;
        if !value.is_object() {
            return Err(Error::json(format!(
                "'{}': session descriptor must be a JSON object",
                path.display()
            )));
        }
        Ok(Some(SessionDescriptor::new(value)))
    }

    fn save(&self, file: &SessionFile, descriptor: &SessionDescriptor) -> Result<(), Error> {
        let path = file.as_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(descriptor.as_value())
            .map_err(|e| Error::json(e.to_string()))?;
        self.fs.write_atomic(path, &json)
    }
}
