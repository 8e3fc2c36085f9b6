use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::{HandlerFuture, parse_args};
use crate::services::Services;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Lists the languages with a cached manifest."
)]
struct LanguagesArgs {}

pub fn handle(args: Vec<String>, services: &Services) -> HandlerFuture<'_> {
    Box::pin(run(args, services))
}

async fn run(args: Vec<String>, services: &Services) -> Result<()> {
    if parse_args::<LanguagesArgs>(&args)?.is_none() {
        return Ok(());
    }

    let configured = &services.settings().language;
    let languages = services.remote().get_available_languages();
    if languages.is_empty() {
        println!("\n{}", t!("languages.info.none_cached").yellow());
        return Ok(());
    }

    println!("\n{}", t!("languages.header").bold());
    for lang in &languages {
        if lang == configured {
            println!(
                "  {} {}",
                lang.cyan().bold(),
                t!("languages.info.configured").dimmed()
            );
        } else {
            println!("  {}", lang);
        }
    }
    Ok(())
}
