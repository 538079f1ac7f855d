//! Instagram セッション記述子の中身
//!
//! 端末 ID（uuids）と認可データを保持する。未知のキーは flatten で素通しし、書き戻しで失わない。

use crate::domain::SessionDescriptor;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// 既定の User-Agent（Android アプリ相当）
pub const DEFAULT_USER_AGENT: &str = "Instagram 269.0.0.18.75 Android (26/8.0.0; 480dpi; 1080x1920; OnePlus; 6T Dev; devitron; qcom; en_US; 314665256)";

const AUTHORIZATION_PREFIX: &str = "Bearer IGT:2:";

/// 端末を識別する ID 群（ログインをまたいで同じ値を使い続ける）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUuids {
    pub phone_id: String,
    pub uuid: String,
    pub client_session_id: String,
    pub advertising_id: String,
    pub android_device_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DeviceUuids {
    /// 新しい端末 ID を生成する
    pub fn generate() -> Self {
        let android = Uuid::new_v4().simple().to_string();
        Self {
            phone_id: Uuid::new_v4().to_string(),
            uuid: Uuid::new_v4().to_string(),
            client_session_id: Uuid::new_v4().to_string(),
            advertising_id: Uuid::new_v4().to_string(),
            android_device_id: format!("android-{}", &android[..16]),
            extra: BTreeMap::new(),
        }
    }
}

/// 認可データ（IGT トークンの中身）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ds_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessionid: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl AuthorizationData {
    /// `ig-set-authorization` ヘッダ値（`Bearer IGT:2:<base64 JSON>`）を解釈する
    pub fn from_header(header: &str) -> Option<Self> {
        let encoded = header.trim().strip_prefix(AUTHORIZATION_PREFIX)?;
        let bytes = STANDARD.decode(encoded).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Authorization リクエストヘッダ値。sessionid が無ければ None。
    pub fn to_header(&self) -> Option<String> {
        self.sessionid.as_ref()?;
        let json = serde_json::to_vec(self).ok()?;
        Some(format!("{}{}", AUTHORIZATION_PREFIX, STANDARD.encode(json)))
    }
}

/// セッション記述子として保存する内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramSettings {
    pub uuids: DeviceUuids,
    #[serde(default)]
    pub authorization_data: AuthorizationData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 最後に新規ログインした時刻（Unix 秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl InstagramSettings {
    /// 新しい端末としての初期状態（未ログイン）
    pub fn fresh() -> Self {
        Self {
            uuids: DeviceUuids::generate(),
            authorization_data: AuthorizationData::default(),
            mid: None,
            user_agent: default_user_agent(),
            last_login: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn from_descriptor(descriptor: &SessionDescriptor) -> Result<Self, Error> {
        serde_json::from_value(descriptor.as_value().clone()).map_err(|e| {
            Error::authentication(format!(
                "stored session is not a valid Instagram session: {}",
                e
            ))
        })
    }

    pub fn to_descriptor(&self) -> Result<SessionDescriptor, Error> {
        serde_json::to_value(self)
            .map(SessionDescriptor::new)
            .map_err(|e| Error::json(e.to_string()))
    }

    /// sessionid を持っているか（再ログインなしで使える可能性があるか）
    pub fn has_session(&self) -> bool {
        self.authorization_data.sessionid.is_some()
    }

    /// 新規ログイン前の状態に戻す（端末 ID は維持）
    pub fn clear_authorization(&mut self) {
        self.authorization_data = AuthorizationData::default();
    }
}
