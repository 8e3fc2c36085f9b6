use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::{HandlerFuture, parse_args};
use crate::core::cache::FetchOptions;
use crate::models::{CommandSource, EnrichedCommand};
use crate::services::Services;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Lists every command known to the repository and both install roots."
)]
struct ListArgs {
    /// Manifest language (two lowercase letters). Defaults to the configured one.
    #[arg(long, short = 'l')]
    lang: Option<String>,

    /// Bypass the manifest cache.
    #[arg(long)]
    refresh: bool,

    /// Only list commands found on disk; never touches the network.
    #[arg(long)]
    local: bool,
}

pub fn handle(args: Vec<String>, services: &Services) -> HandlerFuture<'_> {
    Box::pin(run(args, services))
}

async fn run(args: Vec<String>, services: &Services) -> Result<()> {
    let Some(list_args) = parse_args::<ListArgs>(&args)? else {
        return Ok(());
    };

    if list_args.local {
        let commands = services.local().scan();
        if commands.is_empty() {
            println!("\n{}", t!("list.info.no_local_commands").yellow());
            return Ok(());
        }
        println!("\n{}", t!("list.header.local").bold());
        for local in &commands {
            println!(
                "  {} {} {}",
                local.command.name.cyan(),
                format!("[{}]", local.location).dimmed(),
                local.command.description
            );
        }
        return Ok(());
    }

    let resolver = services.resolver(list_args.lang.as_deref());
    let options = FetchOptions {
        force_refresh: list_args.refresh,
    };
    let commands = resolver.list_enhanced_commands(options).await?;

    if commands.is_empty() {
        println!("\n{}", t!("list.info.empty"));
        return Ok(());
    }

    println!(
        "\n{}",
        format!(t!("list.header.all"), lang = resolver.language())
            .bold()
    );
    for enriched in &commands {
        print_entry(enriched);
    }
    println!(
        "\n{}",
        format!(t!("list.info.total"), count = commands.len()).dimmed()
    );
    Ok(())
}

fn print_entry(enriched: &EnrichedCommand) {
    let marker = match &enriched.installation_status {
        Some(status) if status.has_local_changes => "~".yellow(),
        Some(status) if status.is_installed => "✔".green(),
        Some(_) => " ".normal(),
        None => "•".blue(),
    };
    let sources: Vec<String> = enriched
        .available_in_sources
        .iter()
        .map(CommandSource::to_string)
        .collect();

    println!(
        "  {} {} {} {}",
        marker,
        enriched.command.name.cyan(),
        format!("[{}]", sources.join(", ")).dimmed(),
        enriched.command.description
    );
}
