//! Airtable REST API をレコードテーブルとして使うアダプタ
//!
//! 照会は filterByFormula + maxRecords=1、追加は records 配列での POST。

use crate::domain::{MatchMode, RecordId, TableSettings};
use crate::ports::outbound::RecordTable;
use common::error::Error;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde_json::{json, Value};
use std::time::Duration;

const AIRTABLE_API_BASE: &str = "https://api.airtable.com/v0";
const USER_AGENT: &str = concat!("storywatch/", env!("CARGO_PKG_VERSION"));

/// Airtable のテーブル 1 つ
pub struct AirtableTable {
    client: Client,
    api_base: String,
    settings: TableSettings,
}

impl AirtableTable {
    pub fn new(settings: TableSettings, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_base: AIRTABLE_API_BASE.to_string(),
            settings,
        })
    }

    /// API のベース URL を差し替える
    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn table_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| Error::invalid_argument(format!("Invalid Airtable API base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::invalid_argument("Airtable API base cannot be a base URL"))?
            .pop_if_empty()
            .push(&self.settings.base_id)
            .push(&self.settings.table);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, Error> {
        let response = request
            .bearer_auth(&self.settings.api_key)
            .send()
            .map_err(|e| Error::http(format!("Airtable request failed: {}", e)))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read Airtable response: {}", e)))?;
        if !status.is_success() {
            return Err(Error::http(api_error_message(status.as_u16(), &text)));
        }
        serde_json::from_str(&text)
            .map_err(|e| Error::json(format!("Failed to parse Airtable response: {}", e)))
    }
}

impl RecordTable for AirtableTable {
    fn find(&self, name: &str) -> Result<Option<RecordId>, Error> {
        let formula = filter_formula(&self.settings.field, name, self.settings.match_mode);
        let request = self
            .client
            .get(self.table_url()?)
            .query(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")]);
        let body = self.send(request)?;
        Ok(first_record_id(&body))
    }

    fn create(&self, name: &str) -> Result<RecordId, Error> {
        let mut fields = serde_json::Map::new();
        fields.insert(self.settings.field.clone(), Value::String(name.to_string()));
        let payload = json!({ "records": [{ "fields": fields }] });
        let request = self.client.post(self.table_url()?).json(&payload);
        let body = self.send(request)?;
        first_record_id(&body)
            .ok_or_else(|| Error::json("Airtable create response has no record id"))
    }
}

/// 名前フィールドに対する filterByFormula を組み立てる
pub(crate) fn filter_formula(field: &str, name: &str, mode: MatchMode) -> String {
    let field = field_ref(field);
    let literal = string_literal(name);
    match mode {
        MatchMode::Exact => format!("{} = {}", field, literal),
        MatchMode::Substring => format!("FIND({}, {})", literal, field),
    }
}

fn field_ref(field: &str) -> String {
    format!("{{{}}}", field.replace('}', "\\}"))
}

fn string_literal(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

/// `{"records": [{"id": ...}]}` の先頭 ID
pub(crate) fn first_record_id(body: &Value) -> Option<RecordId> {
    body["records"]
        .as_array()
        .and_then(|records| records.first())
        .and_then(|r| r["id"].as_str())
        .map(RecordId::new)
}

/// エラーレスポンスからメッセージを取り出す
///
/// `{"error": {"type": ..., "message": ...}}` と `{"error": "NOT_FOUND"}` の両形式がある。
pub(crate) fn api_error_message(status: u16, body: &str) -> String {
    if status == 429 {
        return "Airtable rate limited the request (HTTP 429)".to_string();
    }
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        let err = &v["error"];
        err["message"]
            .as_str()
            .or_else(|| err["type"].as_str())
            .or_else(|| err.as_str())
            .map(|s| s.to_string())
    });
    match detail {
        Some(d) => format!("Airtable API error (HTTP {}): {}", status, d),
        None => format!("Airtable API error (HTTP {}): {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TableSettings {
        TableSettings {
            api_key: "patSECRET".to_string(),
            base_id: "appcfPr9gkxX9wbty".to_string(),
            table: "Table 1".to_string(),
            field: "User".to_string(),
            match_mode: MatchMode::Exact,
        }
    }

    #[test]
    fn test_exact_formula() {
        assert_eq!(
            filter_formula("User", "Alice", MatchMode::Exact),
            r#"{User} = "Alice""#
        );
    }

    #[test]
    fn test_substring_formula_matches_legacy_find() {
        assert_eq!(
            filter_formula("User", "Alice", MatchMode::Substring),
            r#"FIND("Alice", {User})"#
        );
    }

    #[test]
    fn test_formula_escapes_quotes_and_backslashes() {
        assert_eq!(
            filter_formula("User", r#"Al "The" \ Pal"#, MatchMode::Exact),
            r#"{User} = "Al \"The\" \\ Pal""#
        );
        assert_eq!(field_ref("a}b"), r"{a\}b}");
    }

    #[test]
    fn test_table_url_encodes_table_name() {
        let table = AirtableTable::new(settings(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            table.table_url().unwrap().as_str(),
            "https://api.airtable.com/v0/appcfPr9gkxX9wbty/Table%201"
        );
        let table = table.with_api_base("http://localhost:9999/v0/");
        assert_eq!(
            table.table_url().unwrap().as_str(),
            "http://localhost:9999/v0/appcfPr9gkxX9wbty/Table%201"
        );
    }

    #[test]
    fn test_first_record_id() {
        let body = json!({"records": [{"id": "rec123", "fields": {"User": "Alice"}}]});
        assert_eq!(first_record_id(&body), Some(RecordId::new("rec123")));
        assert_eq!(first_record_id(&json!({"records": []})), None);
        assert_eq!(first_record_id(&json!({})), None);
    }

    #[test]
    fn test_api_error_message_shapes() {
        assert_eq!(
            api_error_message(
                403,
                r#"{"error":{"type":"INVALID_PERMISSIONS","message":"You are not permitted"}}"#
            ),
            "Airtable API error (HTTP 403): You are not permitted"
        );
        assert_eq!(
            api_error_message(404, r#"{"error":"NOT_FOUND"}"#),
            "Airtable API error (HTTP 404): NOT_FOUND"
        );
        assert!(api_error_message(429, "").contains("rate limited"));
        assert_eq!(
            api_error_message(502, "Bad Gateway\n"),
            "Airtable API error (HTTP 502): Bad Gateway"
        );
    }
}
