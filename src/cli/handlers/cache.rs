use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

use crate::cli::handlers::{HandlerFuture, parse_args, print_row};
use crate::services::Services;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Inspects or clears the response cache.")]
struct CacheArgs {
    #[command(subcommand)]
    action: Option<CacheAction>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum CacheAction {
    /// Shows the cache location, TTL and stored keys (default).
    Show,
    /// Deletes every cached response. The install ledger is kept.
    Clear,
}

pub fn handle(args: Vec<String>, services: &Services) -> HandlerFuture<'_> {
    Box::pin(run(args, services))
}

async fn run(args: Vec<String>, services: &Services) -> Result<()> {
    let Some(cache_args) = parse_args::<CacheArgs>(&args)? else {
        return Ok(());
    };
    let cache = services.remote().cache();

    match cache_args.action.unwrap_or(CacheAction::Show) {
        CacheAction::Show => {
            println!("\n{}", t!("cache.header").bold());
            print_row(t!("cache.label.dir"), cache.dir().display());
            print_row(t!("cache.label.ttl"), format!("{}s", cache.ttl().as_secs()));
            let keys = cache.keys();
            print_row(t!("cache.label.entries"), keys.len());
            for key in &keys {
                println!("      - {}", key.dimmed());
            }
        }
        CacheAction::Clear => {
            let removed = cache
                .clear()
                .with_context(|| format!("Failed to clear cache at {}", cache.dir().display()))?;
            println!(
                "\n{} {}",
                "✔".green(),
                format!(t!("cache.success.cleared"), count = removed)
            );
        }
    }
    Ok(())
}
