#[cfg(all(feature = "mimalloc", not(target_family = "wasm")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use reel_api::{Config, SearchArgs, TrendingArgs};
use std::fs::OpenOptions;

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Find movies you'll love without the hassle", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and search movies interactively (default)
    #[command(alias = "b")]
    Browse,

    /// Search the catalog once and print the results
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Show the most searched terms
    #[command(alias = "t")]
    Trending(TrendingArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);

    // Default level depends on --debug (overridden by RUST_LOG)
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    let mut logger = env_logger::Builder::from_env(env);

    // The browser owns the terminal, so its logs go to a file
    if matches!(command, Commands::Browse) {
        let dir = reel_api::reel_home_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join("reel.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();

    match command {
        Commands::Browse => {
            let config = Config::from_env()?;
            log::debug!(
                "Catalog {} ; trending store {}",
                config.catalog.base_url,
                config.store.describe()
            );
            reel_api::tui::run(&config)
        }
        Commands::Search(args) => reel_api::execute_search(args),
        Commands::Trending(args) => reel_api::execute_trending(args),
    }
}
