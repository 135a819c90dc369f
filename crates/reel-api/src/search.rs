//! One-shot `search` and `trending` commands

use crate::catalog::{MovieCatalog, TmdbClient};
use crate::config::{Config, StoreConfig};
use crate::trending::{DEFAULT_TRENDING_LIMIT, Trending};
use crate::tui::display::{MovieDisplay, TrendingDisplay};
use anyhow::Result;
use clap::Args;
use colored::Colorize;

pub use crate::tui::worker::fetch_and_record;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to search for; empty lists popular movies
    #[arg(default_value = "")]
    pub query: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Count this search in the trending store
    #[arg(long)]
    pub record: bool,
}

#[derive(Args, Debug)]
pub struct TrendingArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_TRENDING_LIMIT)]
    pub limit: usize,

    /// Output entries as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: SearchArgs) -> Result<()> {
    let config = Config::from_env()?;
    let catalog = TmdbClient::new(&config.catalog)?;
    let trending = if args.record {
        Some(Trending::from_config(&config.store)?)
    } else {
        None
    };

    run_search(&catalog, trending.as_ref(), &args)
}

fn run_search(
    catalog: &dyn MovieCatalog,
    trending: Option<&Trending>,
    args: &SearchArgs,
) -> Result<()> {
    let (outcome, recorder) = fetch_and_record(catalog, trending, &args.query);
    // Finish the trending write before the process exits
    if let Some(recorder) = recorder
        && recorder.join().is_err()
    {
        log::error!("Trending recorder panicked; search {:?} not counted", args.query);
    }
    let movies = outcome.map_err(anyhow::Error::msg)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&movies)?);
        return Ok(());
    }

    if movies.is_empty() {
        println!("No movies found.");
        return Ok(());
    }

    let heading = if args.query.is_empty() {
        "Popular movies".to_string()
    } else {
        format!("Results for '{}'", args.query)
    };
    println!("{} ({})\n", heading.bold(), movies.len());
    for movie in &movies {
        for line in MovieDisplay::from_movie(movie).to_cli_lines() {
            println!("{}", line);
        }
        println!();
    }
    Ok(())
}

pub fn execute_trending(args: TrendingArgs) -> Result<()> {
    let store = StoreConfig::from_env()?;
    let trending = Trending::from_config(&store)?;
    let entries = trending.list_top_trending(args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No trending searches yet.");
        return Ok(());
    }

    println!("{}\n", "Trending searches".bold());
    for (i, entry) in entries.iter().enumerate() {
        for line in TrendingDisplay::from_entry(i + 1, entry).to_cli_lines() {
            println!("{}", line);
        }
    }
    Ok(())
}
