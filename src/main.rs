use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use ct::cli::Cli;
use ct::clipboard::SystemClipboard;
use ct::driver::Driver;
use ct::resolver::{Resolver, tool_name_from_argv0};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(EnvFilter::new(cli.log_level()))
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let argv0 = std::env::args_os().next();
    let tool_name = tool_name_from_argv0(argv0.as_deref().and_then(|s| s.to_str()));
    let resolver = Resolver::for_tool(&tool_name)
        .with_context(|| format!("Invalid tool name pattern for '{tool_name}'"))?;

    let stdin = io::stdin();
    let help = Cli::command().render_long_help().to_string();

    let mut driver = Driver::new(resolver, SystemClipboard::new());
    driver.run_stage(
        &cli.request(),
        stdin.is_terminal(),
        stdin.lock(),
        &help,
        &mut io::stdout().lock(),
    )
}
