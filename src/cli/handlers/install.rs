use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

use crate::cli::handlers::{HandlerFuture, parse_args};
use crate::core::installer::InstallOptions;
use crate::core::namespace;
use crate::models::InstallLocation;
use crate::services::Services;

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Downloads commands from the repository into an install root."
)]
struct InstallArgs {
    /// One or more command names.
    #[arg(required = true)]
    names: Vec<String>,

    /// Install into `./.claude/commands` instead of `~/.claude/commands`.
    #[arg(long, short = 'p')]
    project: bool,

    /// Overwrite a file that already exists.
    #[arg(long, short = 'f')]
    force: bool,

    /// Manifest language. Defaults to the configured one.
    #[arg(long, short = 'l')]
    lang: Option<String>,
}

pub fn handle(args: Vec<String>, services: &Services) -> HandlerFuture<'_> {
    Box::pin(run(args, services))
}

async fn run(args: Vec<String>, services: &Services) -> Result<()> {
    let Some(install_args) = parse_args::<InstallArgs>(&args)? else {
        return Ok(());
    };

    let options = InstallOptions {
        target: if install_args.project {
            InstallLocation::Project
        } else {
            InstallLocation::Personal
        },
        force: install_args.force,
        language: services.language(install_args.lang.as_deref()).to_string(),
    };

    let mut failures = 0usize;
    for raw_name in &install_args.names {
        let name = namespace::normalize(raw_name);
        match services.installer().install_command(&name, &options).await {
            Ok(record) => println!(
                "{} {}",
                "✔".green(),
                format!(
                    t!("install.success"),
                    name = record.name.cyan(),
                    path = record.file_path.display()
                )
            ),
            Err(e) => {
                failures += 1;
                log::debug!("Install of '{}' failed: {:?}", name, e);
                eprintln!(
                    "{} {}",
                    "✘".red(),
                    format!(t!("install.error.failed"), name = name.cyan(), reason = e)
                );
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!(
            t!("install.error.summary"),
            failed = failures,
            total = install_args.names.len()
        ));
    }
    Ok(())
}
