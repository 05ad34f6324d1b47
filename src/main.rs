use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ctxmenu::builtins::FileBrowserMenu;
use ctxmenu::builtins::files::Node;
use ctxmenu::config::{Config, LogConfig};
use ctxmenu::error::MenuResult;
use ctxmenu::menu::render_text;

/// Prints the context menu a file browser would show for a selection.
#[derive(Debug, Parser)]
#[command(name = "ctxmenu", version)]
struct Cli {
    /// Selected items; existing paths become files or directories, anything
    /// else is treated as text.
    items: Vec<String>,

    /// Treat every item as text without probing the filesystem.
    #[arg(long)]
    text: bool,

    /// Clipboard contents to assume when building the menu.
    #[arg(long)]
    clipboard: Option<String>,

    /// List registered strategies per capability and exit.
    #[arg(long)]
    strategies: bool,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> MenuResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.log);

    let menu = FileBrowserMenu::new(&config)?.with_clipboard(cli.clipboard.clone());

    if cli.strategies {
        for (info, ids) in menu.strategies() {
            println!("{} ({}): {}", info.display_name, info.key, ids.join(", "));
        }
        return Ok(());
    }

    let nodes = selection_from_args(&cli.items, cli.text);
    tracing::debug!(items = nodes.len(), "selection parsed");
    let entries = menu.menu_for(&nodes);
    if entries.is_empty() {
        println!("(no actions)");
    } else {
        print!("{}", render_text(&entries, config.menu.max_submenu_depth));
    }
    Ok(())
}

fn selection_from_args(items: &[String], text_only: bool) -> Vec<Node> {
    items
        .iter()
        .map(|item| {
            if text_only {
                Node::Text(item.clone())
            } else {
                Node::from_arg(item)
            }
        })
        .collect()
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
