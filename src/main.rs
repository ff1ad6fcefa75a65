use clap::Parser;
use nutrikeep::cli::Menu;
use nutrikeep::config::AppConfig;
use nutrikeep::output::OutputFormatter;
use std::io;
use std::path::PathBuf;

/// Interactive manager for a CSV-backed food-nutrition catalog.
#[derive(Parser)]
#[command(name = "nutrikeep", version, about)]
struct Args {
    /// Catalog root directory (overrides the configured default).
    root: Option<PathBuf>,

    /// Path to an explicit configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            OutputFormatter::error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };
    if !config.display.color {
        colored::control::set_override(false);
    }

    let root = args.root.unwrap_or(config.storage.root);
    println!("Welcome to nutrikeep! Catalog root: {}", root.display());

    let stdin = io::stdin();
    let mut menu = Menu::new(root, stdin.lock());
    if let Err(e) = menu.run() {
        OutputFormatter::error(&format!("Error: {}", e));
        std::process::exit(1);
    }
}
