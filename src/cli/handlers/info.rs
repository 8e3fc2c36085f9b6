use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::{HandlerFuture, parse_args, print_row};
use crate::core::namespace;
use crate::services::Services;

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Shows the merged view of one command and where it is installed."
)]
struct InfoArgs {
    /// Command name, e.g. `frontend:component` or `frontend/component`.
    name: String,

    /// Manifest language. Defaults to the configured one.
    #[arg(long, short = 'l')]
    lang: Option<String>,
}

pub fn handle(args: Vec<String>, services: &Services) -> HandlerFuture<'_> {
    Box::pin(run(args, services))
}

async fn run(args: Vec<String>, services: &Services) -> Result<()> {
    let Some(info_args) = parse_args::<InfoArgs>(&args)? else {
        return Ok(());
    };
    let name = namespace::normalize(&info_args.name);

    let enriched = services
        .resolver(info_args.lang.as_deref())
        .get_enhanced_command_info(&name)
        .await?;
    let command = &enriched.command;

    println!("\n{}", command.name.cyan().bold());
    print_row(t!("info.label.description"), &command.description);
    print_row(t!("info.label.file"), &command.file);
    if !command.allowed_tools.is_empty() {
        print_row(t!("info.label.tools"), &command.allowed_tools);
    }
    if let Some(hint) = &command.argument_hint {
        print_row(t!("info.label.hint"), hint);
    }
    if let Some(qualifier) = &command.namespace {
        print_row(t!("info.label.namespace"), qualifier);
    }
    print_row(t!("info.label.source"), enriched.source);

    let sources: Vec<String> = enriched
        .available_in_sources
        .iter()
        .map(ToString::to_string)
        .collect();
    print_row(t!("info.label.sources"), sources.join(", "));

    match services.installer().get_installation_info(&name)? {
        Some(record) => {
            println!("\n{}", t!("info.header.installation").bold());
            print_row(t!("info.label.location"), record.location);
            print_row(t!("info.label.path"), record.file_path.display());
            print_row(
                t!("info.label.installed_at"),
                record.installed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            );
            print_row(t!("info.label.size"), format!("{} B", record.size_bytes));
            if let Some(version) = &record.provenance_version {
                print_row(t!("info.label.version"), version);
            }
            if let Some(hash) = &record.content_hash {
                print_row(t!("info.label.hash"), hash.dimmed());
            }
        }
        None => println!("\n{}", t!("info.info.not_installed").dimmed()),
    }

    if let Some(status) = &enriched.installation_status {
        if status.has_local_changes {
            println!("\n{}", t!("info.warning.local_changes").yellow());
        }
    }
    Ok(())
}
