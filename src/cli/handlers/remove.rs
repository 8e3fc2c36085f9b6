use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::{HandlerFuture, parse_args};
use crate::core::installer::{RemoveOptions, RemoveOutcome};
use crate::core::namespace;
use crate::services::Services;

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Removes an installed command, searching the personal root first."
)]
struct RemoveArgs {
    /// Command name, e.g. `git:commit`.
    name: String,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    yes: bool,
}

pub fn handle(args: Vec<String>, services: &Services) -> HandlerFuture<'_> {
    Box::pin(run(args, services))
}

async fn run(args: Vec<String>, services: &Services) -> Result<()> {
    let Some(remove_args) = parse_args::<RemoveArgs>(&args)? else {
        return Ok(());
    };
    let name = namespace::normalize(&remove_args.name);

    let outcome = services.installer().remove_command(
        &name,
        RemoveOptions {
            yes: remove_args.yes,
        },
    )?;

    match outcome {
        RemoveOutcome::Removed { location, path } => println!(
            "\n{} {}",
            "✔".green(),
            format!(
                t!("remove.success"),
                name = name.cyan(),
                location = location,
                path = path.display()
            )
        ),
        RemoveOutcome::Cancelled => println!("\n{}", t!("common.info.cancelled").yellow()),
    }
    Ok(())
}
