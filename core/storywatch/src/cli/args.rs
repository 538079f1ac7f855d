use crate::domain::{MatchMode, RunRequest, Settings, StoryWatchCommand};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// -v / --verbose: 構造化ログを stderr にも要約表示する
    pub verbose: bool,
    /// --collect-only: 閲覧者の収集だけ行い、レコードテーブルへ同期しない
    pub collect_only: bool,
    /// -s / --session-file: セッション記述子ファイル（未指定は STORYWATCH_SESSION_FILE → ./ig_settings.json）
    pub session_file: Option<PathBuf>,
    pub base: Option<String>,
    pub table: Option<String>,
    pub field: Option<String>,
    pub match_mode: MatchMode,
    pub timeout_secs: Option<u64>,
    /// --watch: 指定秒ごとに Ctrl+C まで再実行する
    pub watch_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            collect_only: false,
            session_file: None,
            base: None,
            table: None,
            field: None,
            match_mode: MatchMode::Exact,
            timeout_secs: None,
            watch_secs: None,
        }
    }
}

/// 解析結果: 通常の Config / ヘルプ表示 / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    /// -h / --help（設定を解決せずに表示して終了）
    Help,
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("storywatch")
        .about("Collect Instagram story viewers and sync new names to an Airtable table")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Mirror structured logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("collect-only")
                .long("collect-only")
                .help("Only collect viewer names; do not touch the record table")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("session-file")
                .short('s')
                .long("session-file")
                .value_name("path")
                .help("Session descriptor file (default: ./ig_settings.json)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("base")
                .long("base")
                .value_name("id")
                .help("Airtable base id (default: $AIRTABLE_BASE_ID)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("table")
                .long("table")
                .value_name("name")
                .help("Airtable table name (default: $AIRTABLE_TABLE or \"Table 1\")")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("field")
                .long("field")
                .value_name("name")
                .help("Name field of the table (default: User)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("match")
                .long("match")
                .value_name("mode")
                .help("How an existing row matches a name")
                .value_parser(MatchMode::VARIANTS)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("timeout")
                .long("timeout")
                .value_name("secs")
                .help("HTTP timeout in seconds (default: 30)")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("watch")
                .long("watch")
                .value_name("secs")
                .help("Re-run every N seconds until Ctrl+C")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Result<Config, Error> {
    let match_mode = match matches.get_one::<String>("match") {
        Some(s) => s.parse::<MatchMode>()?,
        None => MatchMode::default(),
    };
    Ok(Config {
        verbose: matches.get_flag("verbose"),
        collect_only: matches.get_flag("collect-only"),
        session_file: matches.get_one::<PathBuf>("session-file").cloned(),
        base: matches.get_one::<String>("base").cloned(),
        table: matches.get_one::<String>("table").cloned(),
        field: matches.get_one::<String>("field").cloned(),
        match_mode,
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        watch_secs: matches.get_one::<u64>("watch").copied(),
    })
}

fn matches_to_outcome(matches: &clap::ArgMatches) -> Result<ParseOutcome, Error> {
    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    if matches.get_flag("help") {
        return Ok(ParseOutcome::Help);
    }
    Ok(ParseOutcome::Config(matches_to_config(matches)?))
}

/// コマンドラインを解析する。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    matches_to_outcome(&matches)
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[&str]) -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    matches_to_outcome(&matches)
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "storywatch", &mut std::io::stdout());
}

/// 解決済みの設定を実行コマンドに変換する
pub fn settings_to_command(settings: &Settings) -> StoryWatchCommand {
    let request = RunRequest {
        credentials: settings.credentials.clone(),
        session_file: settings.session_file.clone(),
        reconcile: settings.table.is_some(),
    };
    match settings.watch_interval {
        Some(interval) => StoryWatchCommand::Watch { request, interval },
        None => StoryWatchCommand::Run(request),
    }
}
