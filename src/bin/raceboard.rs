use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use raceboard::{
    FileCache, Raceboard, RaceboardConfig, ResultCache, ResultsBoard, Round, Season,
    SortMode, render_table,
};

/// Race results from the Ergast-style feed, in the terminal
#[derive(Debug, Parser)]
#[command(name = "raceboard", version, about)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "RACEBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Feed base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding the cached snapshot
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Serve recorded feed documents from this directory
    #[arg(long, global = true)]
    fixture_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and print the results of one race
    Results {
        #[arg(long, default_value = "current")]
        season: Season,
        #[arg(long, default_value = "last")]
        round: Round,
        #[arg(long, value_enum, default_value_t = SortArg::Normal)]
        sort: SortArg,
        /// Print the cached snapshot without fetching
        #[arg(long)]
        offline: bool,
    },
    /// List the races of a season
    Races {
        #[arg(long, default_value = "current")]
        season: Season,
    },
    /// Show which race the cached snapshot holds
    Cached,
    /// Remove the cached snapshot
    ClearCache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Normal,
    FastestLap,
}

impl From<SortArg> for SortMode {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Normal => SortMode::Normal,
            SortArg::FastestLap => SortMode::FastestLap,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<RaceboardConfig> {
    let mut config =
        RaceboardConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(cache_dir) = &cli.cache_dir {
        config.cache_dir = cache_dir.clone();
    }
    if let Some(fixture_dir) = &cli.fixture_dir {
        config.fixture_dir = Some(fixture_dir.clone());
    }
    config.validate().context("validating configuration")?;
    debug!(?config, "Effective configuration");
    Ok(config)
}

fn print_view(board: &mut ResultsBoard, sort: SortMode) -> anyhow::Result<()> {
    if board.sort_mode() != sort {
        board.toggle_sort();
    }
    match board.view() {
        Some(view) => {
            print!("{}", render_table(&view));
            Ok(())
        }
        None => bail!("{}", board.state().message().unwrap_or("No results")),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("raceboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Results { season, round, sort, offline } => {
            let mut board = Raceboard::board(&config).context("building results board")?;
            if !offline {
                board.select(season, round).await.context("fetch task panicked")?;
            }

            print_view(&mut board, sort.into())
        }
        Command::Races { season } => {
            let board = Raceboard::board(&config).context("building results board")?;
            let races = board
                .races(season)
                .await
                .with_context(|| format!("fetching races for season {}", season))?;
            if races.is_empty() {
                println!("No races listed for season {}", season);
            }
            for race in races {
                println!("{:>3}  {}  {}", race.round, race.date, race.race_name);
            }
            Ok(())
        }
        Command::Cached => {
            let cache = FileCache::new(&config.cache_dir);
            match cache.load() {
                Some(results) => println!(
                    "{}: {} ({} drivers)",
                    cache.path().display(),
                    results.race.race_name,
                    results.len()
                ),
                None => println!("No cached data at {}", cache.path().display()),
            }
            Ok(())
        }
        Command::ClearCache => {
            Raceboard::cache(&config).clear().context("clearing cached results")?;
            println!("Cache cleared");
            Ok(())
        }
    }
}
