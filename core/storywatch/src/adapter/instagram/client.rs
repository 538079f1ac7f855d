//! Instagram モバイル API の HTTP クライアント（reqwest::blocking）
//!
//! 認証: 保存済みの記述子があれば `accounts/current_user` で有効性を確認し、
//! 拒否されたら同じ端末 ID のまま再ログインする。記述子が無ければ新しい端末として新規ログインする。

use super::parse;
use super::settings::{AuthorizationData, InstagramSettings};
use crate::domain::{AccountId, Credentials, SessionDescriptor, Story, StoryId, Viewer};
use crate::ports::outbound::{PlatformAuthenticator, PlatformSession};
use common::error::Error;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

const API_BASE: &str = "https://i.instagram.com/api/v1";
const IG_APP_ID: &str = "567067343352427";
const IG_CAPABILITIES: &str = "3brTvwE=";
/// 閲覧者一覧のページ数上限（カーソルが進まない応答で無限ループしないため）
const MAX_VIEWER_PAGES: usize = 200;

/// HTTP レスポンスのうち使う部分
struct Reply {
    status: u16,
    body: Value,
    set_authorization: Option<String>,
    set_mid: Option<String>,
}

impl Reply {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone)]
struct Api {
    client: Client,
    base: String,
}

impl Api {
    fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base: API_BASE.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, settings: &InstagramSettings) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, self.url(path))
            .header("User-Agent", settings.user_agent.as_str())
            .header("X-IG-App-ID", IG_APP_ID)
            .header("X-IG-Capabilities", IG_CAPABILITIES)
            .header("X-IG-Connection-Type", "WIFI")
            .header("X-IG-Device-ID", settings.uuids.uuid.as_str())
            .header("X-IG-Android-ID", settings.uuids.android_device_id.as_str())
            .header("Accept-Language", "en-US");
        if let Some(auth) = settings.authorization_data.to_header() {
            req = req.header("Authorization", auth);
        }
        if let Some(ref mid) = settings.mid {
            req = req.header("X-MID", mid.as_str());
        }
        req
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<Reply, Error> {
        let response = request.send().map_err(|e| {
            Error::platform(format!("request to Instagram failed while {}: {}", what, e))
        })?;
        let status = response.status().as_u16();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };
        let set_authorization = header("ig-set-authorization");
        let set_mid = header("ig-set-x-mid");
        let text = response.text().map_err(|e| {
            Error::platform(format!("failed to read Instagram response while {}: {}", what, e))
        })?;
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(v) => v,
            Err(e) if (200..300).contains(&status) => {
                return Err(Error::platform(format!(
                    "malformed Instagram response while {}: {}",
                    what, e
                )))
            }
            Err(_) => Value::Null,
        };
        Ok(Reply {
            status,
            body,
            set_authorization,
            set_mid,
        })
    }
}

/// レスポンスヘッダで更新された認可データ・mid を取り込む
fn absorb(settings: &mut InstagramSettings, reply: &Reply) {
    if let Some(data) = reply
        .set_authorization
        .as_deref()
        .and_then(AuthorizationData::from_header)
    {
        if data.sessionid.is_some() {
            settings.authorization_data = data;
        }
    }
    if let Some(ref mid) = reply.set_mid {
        settings.mid = Some(mid.clone());
    }
}

fn jazoest(phone_id: &str) -> String {
    let sum: u32 = phone_id.bytes().map(u32::from).sum();
    format!("2{}", sum)
}

fn login(
    api: &Api,
    settings: &mut InstagramSettings,
    credentials: &Credentials,
) -> Result<AccountId, Error> {
    settings.clear_authorization();
    let payload = json!({
        "jazoest": jazoest(&settings.uuids.phone_id),
        "country_codes": "[{\"country_code\":\"1\",\"source\":[\"default\"]}]",
        "phone_id": settings.uuids.phone_id,
        "enc_password": format!(
            "#PWD_INSTAGRAM:0:{}:{}",
            chrono::Utc::now().timestamp(),
            credentials.password()
        ),
        "username": credentials.username(),
        "adid": settings.uuids.advertising_id,
        "guid": settings.uuids.uuid,
        "device_id": settings.uuids.android_device_id,
        "google_tokens": "[]",
        "login_attempt_count": "0",
    });
    let signed_body = format!("SIGNATURE.{}", payload);
    let request = api
        .request(Method::POST, "accounts/login/", settings)
        .form(&[("signed_body", signed_body.as_str())]);
    let reply = api.send(request, "logging in")?;
    if !reply.is_success() {
        return Err(parse::login_failure(reply.status, &reply.body));
    }
    absorb(settings, &reply);
    if !settings.has_session() {
        return Err(Error::authentication(
            "login succeeded but no session token was issued",
        ));
    }
    let user_id = parse::logged_in_user_id(&reply.body)
        .ok_or_else(|| Error::authentication("login response has no user id"))?;
    if settings.authorization_data.ds_user_id.is_none() {
        settings.authorization_data.ds_user_id = Some(user_id.clone());
    }
    settings.last_login = Some(chrono::Utc::now().timestamp());
    Ok(AccountId::new(user_id))
}

/// 保存済みセッションが使えるか確認する。使えればアカウント ID、再ログインが必要なら None。
///
/// 429 と通信失敗は Platform、それ以外の拒否は Authentication。
fn verify(api: &Api, settings: &mut InstagramSettings) -> Result<Option<AccountId>, Error> {
    let what = "verifying the stored session";
    let request = api
        .request(Method::GET, "accounts/current_user/", settings)
        .query(&[("edit", "true")]);
    let reply = api.send(request, what)?;
    if reply.is_success() {
        absorb(settings, &reply);
        return Ok(parse::current_user_id(&reply.body).map(AccountId::new));
    }
    if parse::is_login_required(reply.status, &reply.body) {
        return Ok(None);
    }
    if reply.status == 429 {
        return Err(parse::platform_failure(reply.status, &reply.body, what));
    }
    // チャレンジ要求などセッションそのものの拒否。再ログインも新規ログインもしない。
    Err(parse::login_failure(reply.status, &reply.body))
}

/// Instagram への認証を行う PlatformAuthenticator 実装
pub struct InstagramAuthenticator {
    api: Api,
}

impl InstagramAuthenticator {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        Ok(Self {
            api: Api::new(timeout)?,
        })
    }
}

#[cfg(test)]
impl Api {
    fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }
}

impl PlatformAuthenticator for InstagramAuthenticator {
    fn authenticate(
        &self,
        credentials: &Credentials,
        restored: Option<&SessionDescriptor>,
    ) -> Result<Box<dyn PlatformSession>, Error> {
        let mut settings = match restored {
            Some(d) => InstagramSettings::from_descriptor(d)?,
            None => InstagramSettings::fresh(),
        };

        let verified = if restored.is_some() && settings.has_session() {
            verify(&self.api, &mut settings)?
        } else {
            None
        };
        let (account_id, fresh_login) = match verified {
            Some(id) => (id, false),
            None => (login(&self.api, &mut settings, credentials)?, true),
        };

        Ok(Box::new(InstagramSession {
            api: self.api.clone(),
            settings: Mutex::new(settings),
            account_id,
            fresh_login,
        }))
    }
}

/// 認証済みの Instagram セッション
pub struct InstagramSession {
    api: Api,
    settings: Mutex<InstagramSettings>,
    account_id: AccountId,
    /// パスワードでログインし直した（記述子の保存が必要）
    fresh_login: bool,
}

impl InstagramSession {
    fn get(&self, path: &str, query: &[(&str, String)], what: &str) -> Result<Value, Error> {
        let mut settings = self
            .settings
            .lock()
            .map_err(|_| Error::system("Instagram session state is poisoned"))?;
        let request = self
            .api
            .request(Method::GET, path, &settings)
            .query(query);
        let reply = self.api.send(request, what)?;
        if !reply.is_success() {
            return Err(parse::platform_failure(reply.status, &reply.body, what));
        }
        absorb(&mut settings, &reply);
        Ok(reply.body)
    }
}

impl PlatformSession for InstagramSession {
    fn current_account_id(&self) -> Result<AccountId, Error> {
        Ok(self.account_id.clone())
    }

    fn list_active_stories(&self, account_id: &AccountId) -> Result<Vec<Story>, Error> {
        let body = self.get(
            &format!("feed/user/{}/story/", account_id),
            &[],
            "listing stories",
        )?;
        parse::stories(&body)
    }

    fn list_story_viewers(&self, story_id: &StoryId) -> Result<Vec<Viewer>, Error> {
        let what = format!("listing viewers of story {}", story_id);
        let path = format!("media/{}/list_reel_media_viewer/", story_id);
        let mut viewers = Vec::new();
        let mut cursor: Option<String> = None;
        for _ in 0..MAX_VIEWER_PAGES {
            let query: Vec<(&str, String)> =
                cursor.iter().map(|c| ("max_id", c.clone())).collect();
            let body = self.get(&path, &query, &what)?;
            let page = parse::viewer_page(&body)?;
            viewers.extend(page.viewers);
            match page.next_max_id {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => return Ok(viewers),
            }
        }
        Err(Error::platform(format!(
            "{}: more than {} pages of viewers",
            what, MAX_VIEWER_PAGES
        )))
    }

    fn is_fresh_login(&self) -> bool {
        self.fresh_login
    }

    fn descriptor(&self) -> Result<SessionDescriptor, Error> {
        let settings = self
            .settings
            .lock()
            .map_err(|_| Error::system("Instagram session state is poisoned"))?;
        settings.to_descriptor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// 1 リクエストだけ固定レスポンスを返すローカルサーバー。API ベース URL を返す。
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let mut request = Vec::new();
                loop {
                    let n = stream.read(&mut buf).unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/api/v1", addr)
    }

    fn verify_against(
        status_line: &'static str,
        body: &'static str,
    ) -> Result<Option<AccountId>, Error> {
        let api = Api::new(Duration::from_secs(5))
            .unwrap()
            .with_base(serve_once(status_line, body));
        let mut settings = InstagramSettings::fresh();
        settings.authorization_data.ds_user_id = Some("42".into());
        settings.authorization_data.sessionid = Some("42%3Astale%3A1".into());
        verify(&api, &mut settings)
    }

    #[test]
    fn test_verify_challenge_is_authentication_error() {
        let r = verify_against(
            "400 Bad Request",
            r#"{"message":"challenge_required","status":"fail"}"#,
        );
        assert!(matches!(r, Err(Error::Authentication(_))), "{:?}", r);
    }

    #[test]
    fn test_verify_forbidden_without_login_hint_is_authentication_error() {
        let r = verify_against(
            "403 Forbidden",
            r#"{"message":"feedback_required","status":"fail"}"#,
        );
        assert!(matches!(r, Err(Error::Authentication(_))), "{:?}", r);
    }

    #[test]
    fn test_verify_login_required_asks_for_relogin() {
        let r = verify_against(
            "403 Forbidden",
            r#"{"message":"login_required","status":"fail"}"#,
        );
        assert_eq!(r, Ok(None));
    }

    #[test]
    fn test_verify_rate_limit_is_platform_error() {
        let r = verify_against("429 Too Many Requests", r#"{"message":"wait"}"#);
        assert!(matches!(r, Err(Error::Platform(_))), "{:?}", r);
    }

    #[test]
    fn test_verify_accepts_live_session() {
        let r = verify_against("200 OK", r#"{"user":{"pk":42},"status":"ok"}"#);
        assert_eq!(r, Ok(Some(AccountId::new("42"))));
    }

    #[test]
    fn test_jazoest() {
        // '0' = 48, 'a' = 97
        assert_eq!(jazoest("0a"), "2145");
        assert_eq!(jazoest(""), "20");
    }

    #[test]
    fn test_url_join() {
        let api = Api::new(Duration::from_secs(1)).unwrap();
        assert_eq!(
            api.url("feed/user/42/story/"),
            "https://i.instagram.com/api/v1/feed/user/42/story/"
        );
        assert_eq!(
            api.url("/accounts/login/"),
            "https://i.instagram.com/api/v1/accounts/login/"
        );
    }

    #[test]
    fn test_absorb_updates_authorization_and_mid() {
        let mut settings = InstagramSettings::fresh();
        let data = AuthorizationData {
            ds_user_id: Some("42".into()),
            sessionid: Some("42%3Axyz%3A9".into()),
            extra: Default::default(),
        };
        let reply = Reply {
            status: 200,
            body: Value::Null,
            set_authorization: data.to_header(),
            set_mid: Some("Zmid".into()),
        };
        absorb(&mut settings, &reply);
        assert_eq!(settings.authorization_data, data);
        assert_eq!(settings.mid.as_deref(), Some("Zmid"));
    }

    #[test]
    fn test_absorb_ignores_empty_authorization() {
        let mut settings = InstagramSettings::fresh();
        settings.authorization_data.sessionid = Some("keep".into());
        let reply = Reply {
            status: 200,
            body: Value::Null,
            set_authorization: Some("Bearer IGT:2:".into()),
            set_mid: None,
        };
        absorb(&mut settings, &reply);
        assert_eq!(settings.authorization_data.sessionid.as_deref(), Some("keep"));
    }
}
