mod cli;
mod execute;

use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use crate::cli::CLI;
use anyhow::Result;

fn main() -> Result<()> {
    let _ = TermLogger::init(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    let cli = CLI::parse();
    execute::execute(cli)
}
