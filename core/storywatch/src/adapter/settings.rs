//! CLI 引数と環境変数から実行設定を解決するアダプタ
//!
//! 環境変数:
//! - IG_USERNAME / IG_PASSWORD: 未設定でもここではエラーにしない（認証失敗として扱う）
//! - AIRTABLE_API_KEY / AIRTABLE_BASE_ID / AIRTABLE_TABLE / AIRTABLE_FIELD
//! - STORYWATCH_SESSION_FILE

use crate::cli::Config;
use crate::domain::settings::{DEFAULT_FIELD, DEFAULT_TABLE, DEFAULT_TIMEOUT};
use crate::domain::{Credentials, SessionFile, Settings, TableSettings};
use common::error::Error;
use common::ports::outbound::EnvResolver;
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;

const AIRTABLE_BASE_ID_PATTERN: &str = r"^app[A-Za-z0-9]{14}$";

pub fn resolve_settings(config: &Config, env: &dyn EnvResolver) -> Result<Settings, Error> {
    let credentials = Credentials::new(
        env.var("IG_USERNAME").unwrap_or_default(),
        env.var("IG_PASSWORD").unwrap_or_default(),
    );

    let session_path = config
        .session_file
        .clone()
        .or_else(|| env.var("STORYWATCH_SESSION_FILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(SessionFile::DEFAULT_NAME));
    let session_path = if session_path.is_relative() {
        env.current_dir()?.join(session_path)
    } else {
        session_path
    };

    let table = if config.collect_only {
        None
    } else {
        Some(resolve_table(config, env)?)
    };

    let timeout = match config.timeout_secs {
        Some(0) => return Err(Error::invalid_argument("--timeout must be at least 1 second")),
        Some(secs) => Duration::from_secs(secs),
        None => DEFAULT_TIMEOUT,
    };

    let watch_interval = match config.watch_secs {
        Some(0) => return Err(Error::invalid_argument("--watch interval must be at least 1 second")),
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    Ok(Settings {
        credentials,
        session_file: SessionFile::new(session_path),
        table,
        timeout,
        watch_interval,
        verbose: config.verbose,
    })
}

fn resolve_table(config: &Config, env: &dyn EnvResolver) -> Result<TableSettings, Error> {
    let api_key = env.var("AIRTABLE_API_KEY").ok_or_else(|| {
        Error::env("AIRTABLE_API_KEY is not set (use --collect-only to skip syncing)")
    })?;
    let base_id = config
        .base
        .clone()
        .or_else(|| env.var("AIRTABLE_BASE_ID"))
        .ok_or_else(|| Error::env("AIRTABLE_BASE_ID is not set (or pass --base)"))?;
    let re = Regex::new(AIRTABLE_BASE_ID_PATTERN).map_err(|e| Error::system(e.to_string()))?;
    if !re.is_match(&base_id) {
        return Err(Error::invalid_argument(format!(
            "Invalid Airtable base id '{}' (expected app followed by 14 letters or digits)",
            base_id
        )));
    }
    let table = config
        .table
        .clone()
        .or_else(|| env.var("AIRTABLE_TABLE"))
        .unwrap_or_else(|| DEFAULT_TABLE.to_string());
    let field = config
        .field
        .clone()
        .or_else(|| env.var("AIRTABLE_FIELD"))
        .unwrap_or_else(|| DEFAULT_FIELD.to_string());

    Ok(TableSettings {
        api_key,
        base_id,
        table,
        field,
        match_mode: config.match_mode,
    })
}
