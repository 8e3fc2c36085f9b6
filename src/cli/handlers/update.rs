use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::{HandlerFuture, parse_args};
use crate::core::comparator;
use crate::models::{ChangeRecord, ChangeType, FieldDiff};
use crate::services::Services;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Re-downloads the manifest and reports what changed since the last sync."
)]
struct UpdateArgs {
    /// Manifest language. Defaults to the configured one.
    #[arg(long, short = 'l')]
    lang: Option<String>,
}

pub fn handle(args: Vec<String>, services: &Services) -> HandlerFuture<'_> {
    Box::pin(run(args, services))
}

async fn run(args: Vec<String>, services: &Services) -> Result<()> {
    let Some(update_args) = parse_args::<UpdateArgs>(&args)? else {
        return Ok(());
    };
    let lang = services.language(update_args.lang.as_deref());

    let (previous, current) = services.remote().refresh_manifest(lang).await?;

    let Some(previous) = previous else {
        println!(
            "\n{}",
            format!(
                t!("update.info.first_sync"),
                count = current.commands.len(),
                version = current.version
            )
            .green()
        );
        return Ok(());
    };

    if comparator::are_manifests_identical(&previous, &current) {
        println!("\n{}", t!("update.info.up_to_date").green());
        return Ok(());
    }

    let comparison = comparator::compare_manifests(&previous, &current);
    let summary = comparison.summary;
    println!(
        "\n{}",
        format!(
            t!("update.header.changes"),
            from = previous.version,
            to = current.version
        )
        .bold()
    );
    for change in &comparison.changes {
        print_change(change);
    }
    println!(
        "\n{}",
        format!(
            t!("update.info.summary"),
            added = summary.added,
            removed = summary.removed,
            modified = summary.modified
        )
        .dimmed()
    );
    Ok(())
}

fn print_change(change: &ChangeRecord) {
    match change.change_type {
        ChangeType::Added => println!("  {} {}", "+".green().bold(), change.name.green()),
        ChangeType::Removed => println!("  {} {}", "-".red().bold(), change.name.red()),
        ChangeType::Modified => {
            println!("  {} {}", "~".yellow().bold(), change.name.yellow());
            for diff in &change.field_diffs {
                print_diff(diff);
            }
        }
    }
}

fn print_diff(diff: &FieldDiff) {
    let none = t!("update.value.none");
    println!(
        "      {}: {} → {}",
        diff.field.blue(),
        diff.old_value.as_deref().unwrap_or(none).dimmed(),
        diff.new_value.as_deref().unwrap_or(none)
    );
}
