use clap::Parser;

pub mod dispatcher;
pub mod handlers;

/// Renders the help template from the locale file, swapping the semantic tags
/// for ANSI styles (or for nothing when color is off).
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();
    let style = |code: &'static str| if use_colors { code } else { "" };

    let tags = [
        ("title", style("\x1b[1;33m")),
        ("hl", style("\x1b[1;36m")),
        ("cmd", style("\x1b[36m")),
        ("group", style("\x1b[1;32m")),
        ("err", style("\x1b[91m")),
        ("dim", style("\x1b[2m")),
    ];
    let reset = style("\x1b[0m");

    let mut rendered = t!("cli.help.template").to_string();
    for (tag, code) in tags {
        rendered = rendered
            .replace(&format!("<{}>", tag), code)
            .replace(&format!("</{}>", tag), reset);
    }

    Box::leak(rendered.into_boxed_str())
}

/// claude-cmd: install and sync namespaced Claude commands.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// The action followed by its own arguments. Each handler parses the rest.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
