//! Instagram 非公開モバイル API を PlatformAuthenticator / PlatformSession として使うアダプタ
//!
//! - settings: セッション記述子の中身（端末 ID・認可データ）
//! - parse: レスポンス JSON の解釈（I/O なしでテストできる部分）
//! - client: reqwest::blocking による HTTP 呼び出し

mod client;
mod parse;
mod settings;

pub use client::InstagramAuthenticator;
