use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::{HandlerFuture, parse_args, print_row};
use crate::models::{DirectoryDescriptor, InstallLocation};
use crate::services::Services;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows install roots, installed commands and cache settings."
)]
struct StatusArgs {
    /// Also list every installed command by name.
    #[arg(long, short = 'v')]
    verbose: bool,
}

pub fn handle(args: Vec<String>, services: &Services) -> HandlerFuture<'_> {
    Box::pin(run(args, services))
}

fn describe_root(descriptor: &DirectoryDescriptor) -> ColoredString {
    match (descriptor.exists, descriptor.writable) {
        (true, true) => t!("status.root.ready").green(),
        (true, false) => t!("status.root.read_only").red(),
        (false, true) => t!("status.root.missing").yellow(),
        (false, false) => t!("status.root.unwritable").red(),
    }
}

async fn run(args: Vec<String>, services: &Services) -> Result<()> {
    let Some(status_args) = parse_args::<StatusArgs>(&args)? else {
        return Ok(());
    };
    let installer = services.installer();
    let summary = installer.get_installation_summary()?;

    println!("\n{}", t!("status.header.roots").bold());
    for kind in InstallLocation::SEARCH_ORDER {
        let descriptor = installer.describe(kind);
        let installed = match kind {
            InstallLocation::Personal => &summary.personal,
            InstallLocation::Project => &summary.project,
        };
        println!(
            "  {:<9} {} {} {}",
            kind.to_string().blue(),
            descriptor.path.display(),
            describe_root(&descriptor),
            format!(t!("status.info.count"), count = installed.len()).dimmed()
        );
        if status_args.verbose {
            for name in installed {
                println!("      - {}", name.cyan());
            }
        }
    }

    println!(
        "\n{}",
        format!(t!("status.info.total"), total = summary.total).bold()
    );

    let settings = services.settings();
    println!("\n{}", t!("status.header.settings").bold());
    print_row(t!("status.label.repository"), &settings.base_url);
    print_row(t!("status.label.language"), &settings.language);
    print_row(t!("status.label.cache_dir"), services.cache_dir().display());
    print_row(
        t!("status.label.cache_ttl"),
        format!("{}s", settings.cache_ttl().as_secs()),
    );
    Ok(())
}
