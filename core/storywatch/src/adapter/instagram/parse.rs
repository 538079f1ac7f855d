//! Instagram API レスポンスの解釈

use crate::domain::{Story, StoryId, Viewer};
use common::error::Error;
use serde_json::Value;

/// pk は数値・文字列のどちらでも返ってくる
pub(super) fn id_from_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// ログイン成功レスポンス（`logged_in_user.pk`）からユーザー ID を取り出す
pub(super) fn logged_in_user_id(body: &Value) -> Option<String> {
    id_from_value(&body["logged_in_user"]["pk"])
        .or_else(|| id_from_value(&body["logged_in_user"]["pk_id"]))
}

/// `accounts/current_user` のレスポンスからユーザー ID を取り出す
pub(super) fn current_user_id(body: &Value) -> Option<String> {
    id_from_value(&body["user"]["pk"]).or_else(|| id_from_value(&body["user"]["pk_id"]))
}

/// セッション切れ（再ログインが必要）を示すレスポンスか
pub(super) fn is_login_required(status: u16, body: &Value) -> bool {
    let message = body["message"].as_str().unwrap_or_default();
    message == "login_required"
        || body["require_login"].as_bool().unwrap_or(false)
        || (status == 401)
        || (status == 403 && message.contains("login"))
}

/// ログイン失敗レスポンスを Authentication エラーにする
pub(super) fn login_failure(status: u16, body: &Value) -> Error {
    // セッション確認の拒否は error_type を持たず message に種別が入る
    let error_type = body["error_type"]
        .as_str()
        .filter(|t| !t.is_empty())
        .or_else(|| body["message"].as_str())
        .unwrap_or_default();
    let reason = match error_type {
        "bad_password" => "the password is incorrect".to_string(),
        "invalid_user" => "the username does not exist".to_string(),
        "two_factor_required" => {
            "two-factor authentication is required for this account".to_string()
        }
        "challenge_required" | "checkpoint_challenge_required" => {
            "Instagram requires a security challenge; complete it in the app and retry".to_string()
        }
        "rate_limit_error" => "too many login attempts; wait before retrying".to_string(),
        _ => match body["message"].as_str() {
            Some(m) if !m.is_empty() => format!("{} (HTTP {})", m, status),
            _ => format!("login rejected (HTTP {})", status),
        },
    };
    Error::authentication(reason)
}

/// ストーリー・閲覧者取得中の非 2xx レスポンスを Platform エラーにする
pub(super) fn platform_failure(status: u16, body: &Value, what: &str) -> Error {
    if status == 429 {
        return Error::platform(format!("rate limited by Instagram while {} (HTTP 429)", what));
    }
    if is_login_required(status, body) {
        return Error::platform(format!(
            "session was rejected while {} (HTTP {})",
            what, status
        ));
    }
    if status == 404 {
        return Error::platform(format!("{}: not found (the story may have expired)", what));
    }
    match body["message"].as_str() {
        Some(m) if !m.is_empty() => {
            Error::platform(format!("{} failed (HTTP {}): {}", what, status, m))
        }
        _ => Error::platform(format!("{} failed (HTTP {})", what, status)),
    }
}

/// `feed/user/{id}/story/` のレスポンスからストーリー一覧を取り出す
///
/// 公開中のストーリーが無いときは `reel` が null になる。
pub(super) fn stories(body: &Value) -> Result<Vec<Story>, Error> {
    let reel = &body["reel"];
    if reel.is_null() {
        return Ok(Vec::new());
    }
    let items = match reel["items"].as_array() {
        Some(items) => items,
        None => return Ok(Vec::new()),
    };
    items
        .iter()
        .map(|item| {
            let pk = id_from_value(&item["pk"])
                .or_else(|| {
                    item["id"]
                        .as_str()
                        .and_then(|id| id.split('_').next())
                        .map(|s| s.to_string())
                })
                .ok_or_else(|| Error::platform("story item has no pk"))?;
            Ok(Story {
                id: StoryId::new(pk),
                taken_at: item["taken_at"].as_i64(),
            })
        })
        .collect()
}

/// 閲覧者 1 ページ分と次ページのカーソル
pub(super) struct ViewerPage {
    pub viewers: Vec<Viewer>,
    pub next_max_id: Option<String>,
}

/// `media/{pk}/list_reel_media_viewer/` のレスポンスを解釈する
pub(super) fn viewer_page(body: &Value) -> Result<ViewerPage, Error> {
    let users: &[Value] = match &body["users"] {
        Value::Array(users) => users.as_slice(),
        Value::Null => &[],
        _ => return Err(Error::platform("viewer list has an unexpected shape")),
    };
    let viewers = users
        .iter()
        .map(|u| {
            Viewer::new(
                u["username"].as_str().unwrap_or_default(),
                u["full_name"].as_str().unwrap_or_default(),
            )
        })
        .collect();
    Ok(ViewerPage {
        viewers,
        next_max_id: id_from_value(&body["next_max_id"]),
    })
}
