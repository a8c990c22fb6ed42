use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::debug;

use granola_cli::cache::CacheStore;
use granola_cli::cli::{Cli, Commands};
use granola_cli::commands;
use granola_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let cache_path = cli
        .cache
        .clone()
        .or_else(|| config.granola.cache_path.clone())
        .unwrap_or_else(CacheStore::default_path);
    debug!("using cache at {}", cache_path.display());
    let mut store = CacheStore::new(cache_path);

    match cli.command {
        Commands::List { limit, remote, json } => {
            commands::list::run(&mut store, &config, limit, remote, json).await
        }
        Commands::Show { query, json } => commands::show::run(&mut store, &query, json),
        Commands::Search { query, json } => commands::search::run(&mut store, &query, json),
        Commands::People { query, expand_groups, json } => {
            commands::people::run(&mut store, &query, expand_groups, json)
        }
        Commands::Person { query, json } => commands::people::by_person(&mut store, &query, json),
        Commands::Transcript { query, remote, json } => {
            commands::transcript::run(&mut store, &config, &query, remote, json).await
        }
        Commands::Folders { name, json } => {
            commands::organize::folders(&mut store, name.as_deref(), json)
        }
        Commands::Workspaces { name, json } => {
            commands::organize::workspaces(&mut store, name.as_deref(), json)
        }
        Commands::Export { query, output, expand_groups } => {
            commands::export::run(&mut store, &query, output.as_deref(), expand_groups)
        }
        Commands::Config { action } => commands::config::run(&config, &action),
    }
}
