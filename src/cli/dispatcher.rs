use anyhow::{Result, anyhow};
use colored::*;

use crate::cli::handlers::{self, HandlerFuture};
use crate::services::Services;

/// A CLI action, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: for<'a> fn(Vec<String>, &'a Services) -> HandlerFuture<'a>,
}

/// Every action the binary understands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "info",
        aliases: &[],
        handler: handlers::info::handle,
    },
    CommandDefinition {
        name: "install",
        aliases: &["add"],
        handler: handlers::install::handle,
    },
    CommandDefinition {
        name: "remove",
        aliases: &["rm"],
        handler: handlers::remove::handle,
    },
    CommandDefinition {
        name: "status",
        aliases: &[],
        handler: handlers::status::handle,
    },
    CommandDefinition {
        name: "update",
        aliases: &[],
        handler: handlers::update::handle,
    },
    CommandDefinition {
        name: "languages",
        aliases: &["langs"],
        handler: handlers::languages::handle,
    },
    CommandDefinition {
        name: "cache",
        aliases: &[],
        handler: handlers::cache::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `all_args` (action first) to its handler.
pub async fn dispatch(all_args: Vec<String>, services: &Services) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let Some((action, rest)) = all_args.split_first() else {
        println!("{}", t!("cli.info.no_action"));
        let names: Vec<&str> = COMMAND_REGISTRY.iter().map(|cmd| cmd.name).collect();
        println!("  {}", names.join(", ").cyan());
        return Ok(());
    };

    let command = find_command(action)
        .ok_or_else(|| anyhow!(t!("error.unknown_action"), action = action))?;
    (command.handler)(rest.to_vec(), services).await
}
