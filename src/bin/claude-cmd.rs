// src/bin/claude-cmd.rs

use anyhow::{Context, Result};
use clap::Parser;
use claude_cmd::{
    cli::{Cli, dispatcher},
    services::Services,
    system::settings::Settings,
    t,
};
use colored::*;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let settings = Settings::load().context(t!("error.settings_load"))?;
    let services = Services::new(settings).context(t!("error.services_init"))?;
    dispatcher::dispatch(cli.args, &services).await
}
