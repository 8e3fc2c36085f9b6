// src/cli/handlers/mod.rs

//! One module per CLI action. Every handler parses its own arguments and
//! talks to the core through [`crate::services::Services`].

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use std::future::Future;
use std::pin::Pin;

pub mod cache;
pub mod info;
pub mod install;
pub mod languages;
pub mod list;
pub mod remove;
pub mod status;
pub mod update;

/// The future every handler returns, boxed so handlers fit in one registry.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// Parses a handler's arguments. `Ok(None)` means clap already printed help or
/// version output and the handler has nothing left to do.
pub(crate) fn parse_args<T: Parser>(args: &[String]) -> Result<Option<T>> {
    match T::try_parse_from(args) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Prints one `label  value` row of a details block.
pub(crate) fn print_row(label: &str, value: impl std::fmt::Display) {
    use colored::Colorize;
    println!("  {:<18} {}", label.blue(), value);
}
