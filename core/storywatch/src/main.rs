mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;
use common::adapter::StdEnvResolver;
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use adapter::resolve_settings;
use cli::{parse_args, print_completion, settings_to_command, ParseOutcome};
use domain::{InvocationResponse, StoryWatchCommand};
use ports::inbound::{RunPipeline, UseCaseRunner};
use wiring::{wire_storywatch, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl Runner {
    fn log(&self, record: LogRecord) {
        let _ = self.app.logger.log(&record.layer("cli"));
    }

    /// 応答本文を 1 行の JSON として標準出力に出し、ステータスをログに残す
    fn emit(&self, response: &InvocationResponse) -> i32 {
        println!("{}", response.body());
        self.log(response_record(response));
        response.exit_code()
    }
}

impl UseCaseRunner for Runner {
    fn run(&self, command: StoryWatchCommand) -> Result<i32, Error> {
        let command_name = cmd_name_for_log(&command);
        self.log(
            LogRecord::new(LogLevel::Info, "command started")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let code = match command {
            StoryWatchCommand::Run(request) => {
                let response = self.app.use_case.invoke(&request);
                self.emit(&response)
            }
            StoryWatchCommand::Watch { request, interval } => {
                let mut last_code = 0;
                self.app.use_case.watch(&request, interval, &mut |response: &InvocationResponse| {
                    last_code = self.emit(response);
                });
                last_code
            }
        };

        self.log(
            LogRecord::new(LogLevel::Info, "command finished")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        Ok(code)
    }
}

/// 応答 1 件分のログレコード（HTTP 風ステータスと終了コード）
fn response_record(response: &InvocationResponse) -> LogRecord {
    let level = if response.is_success() {
        LogLevel::Info
    } else {
        LogLevel::Warn
    };
    LogRecord::new(level, "response emitted")
        .kind("response")
        .field("status", response.status_code())
        .field("exit_code", response.exit_code())
}

fn cmd_name_for_log(cmd: &StoryWatchCommand) -> &'static str {
    match cmd {
        StoryWatchCommand::Run(_) => "run",
        StoryWatchCommand::Watch { .. } => "watch",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("storywatch: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::Help => {
            print_help();
            return Ok(0);
        }
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let env = StdEnvResolver;
    let settings = resolve_settings(&config, &env)?;
    let app = wire_storywatch(&settings, &env)?;
    let runner = Runner { app };
    runner.run(settings_to_command(&settings))
}

fn print_usage() {
    eprintln!("Usage: storywatch [options]");
}

fn print_help() {
    println!("Usage: storywatch [options]");
    println!("Options:");
    println!("  -h, --help                 Show this help message");
    println!("  -v, --verbose              Mirror structured logs to stderr");
    println!("  --collect-only             Only collect viewer names; do not touch the record table");
    println!("  -s, --session-file <path>  Session descriptor file (default: ./ig_settings.json)");
    println!("  --base <id>                Airtable base id (default: $AIRTABLE_BASE_ID)");
    println!("  --table <name>             Airtable table name (default: $AIRTABLE_TABLE or \"Table 1\")");
    println!("  --field <name>             Name field of the table (default: $AIRTABLE_FIELD or User)");
    println!("  --match <exact|substring>  How an existing row matches a name (default: exact)");
    println!("                             substring reproduces FIND() lookups: \"Al\" matches an existing \"Alice\".");
    println!("  --timeout <secs>           HTTP timeout in seconds (default: 30)");
    println!("  --watch <secs>             Re-run every N seconds until Ctrl+C");
    println!("  --generate <shell>         Generate shell completion script (bash, zsh, fish, ...)");
    println!();
    println!("Environment:");
    println!("  IG_USERNAME, IG_PASSWORD   Instagram credentials (missing values fail authentication)");
    println!("  AIRTABLE_API_KEY           Airtable personal access token");
    println!("  AIRTABLE_BASE_ID           Airtable base id (app + 14 characters)");
    println!("  AIRTABLE_TABLE             Table name");
    println!("  AIRTABLE_FIELD             Name field");
    println!("  STORYWATCH_SESSION_FILE    Session descriptor file");
    println!("  STORYWATCH_HOME            Home directory. Logs: $STORYWATCH_HOME/log/storywatch.jsonl");
    println!("                             If unset, $XDG_CONFIG_HOME/storywatch (e.g. ~/.config/storywatch) is used.");
    println!();
    println!("Output:");
    println!("  One JSON object per run on stdout: {{\"viewers\": [...], \"inserted\": [...], \"already_present\": [...], \"failed\": [...]}}");
    println!("  or {{\"error\": \"...\"}}. Exit code 0 on success, 1 when the run failed.");
    println!();
    println!("Examples:");
    println!("  storywatch");
    println!("  storywatch --collect-only");
    println!("  storywatch --table Viewers --watch 900 -v");
}
