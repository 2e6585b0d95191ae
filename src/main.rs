//! Sprite composer - Command-line tool for building shiny sprite archives

use std::process::ExitCode;

use spritecomposer::cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    cli::run()
}
