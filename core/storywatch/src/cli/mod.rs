//! コマンドライン解析（clap）と実行コマンドへの変換

pub mod args;

pub use args::{parse_args, print_completion, settings_to_command, Config, ParseOutcome};
