use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use wine_graph::config::Config;
use wine_graph::graphql::create_schema;
use wine_graph::store::{DataFiles, InMemoryStorage, Storage};
use wine_graph::{logging, metrics, server};

#[derive(Parser)]
#[command(name = "wine_graph")]
#[command(about = "GraphQL API over a static catalogue of wines, varietals and wineries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the GraphQL HTTP server
    Serve {
        /// Path to the TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory holding varietals.json, wineries.json and wines.json
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Persist wine mutations back to wines.json
        #[arg(long)]
        write_back: bool,
    },
    /// Load and integrity-check the data files
    Validate {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Copy the validated data files into another directory, e.g. as a write-back sandbox
    Seed {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Destination directory, created when missing
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the GraphQL schema (SDL)
    Schema {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            data_dir,
            write_back,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = data_dir {
                config.data.dir = dir;
            }
            if write_back {
                config.data.write_back = true;
            }
            serve(config).await
        }
        Commands::Validate { config, data_dir } => {
            logging::init_console_logging();
            let mut config = Config::load(config.as_deref())?;
            if let Some(dir) = data_dir {
                config.data.dir = dir;
            }
            validate(&config)
        }
        Commands::Seed {
            config,
            data_dir,
            out,
        } => {
            logging::init_console_logging();
            let mut config = Config::load(config.as_deref())?;
            if let Some(dir) = data_dir {
                config.data.dir = dir;
            }
            seed(&config, out)
        }
        Commands::Schema { config } => {
            let config = Config::load(config.as_deref())?;
            let storage = Arc::new(InMemoryStorage::new(Default::default())?);
            println!("{}", create_schema(storage, &config.graphql).sdl());
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let _guard = logging::init_logging(&config.logging);
    if config.metrics.enabled {
        metrics::init_metrics();
    }

    let files = DataFiles::new(config.data.dir.clone());
    let storage: Arc<dyn Storage> = Arc::new(
        InMemoryStorage::open(files, config.data.write_back)
            .with_context(|| format!("Failed to load data from {}", config.data.dir.display()))?,
    );

    let stats = storage.stats().await?;
    info!(
        "Loaded {} varietals, {} wineries, {} wines",
        stats.varietals, stats.wineries, stats.wines
    );

    server::start_server(storage, &config).await
}

fn validate(config: &Config) -> Result<()> {
    let files = DataFiles::new(config.data.dir.clone());
    let dataset = files
        .load()
        .with_context(|| format!("Validation failed for {}", config.data.dir.display()))?;

    println!("Data directory: {}", files.dir().display());
    println!("   Varietals: {}", dataset.varietals.len());
    println!("   Wineries:  {}", dataset.wineries.len());
    println!("   Wines:     {}", dataset.wines.len());
    println!("All references resolve");
    Ok(())
}

fn seed(config: &Config, out: PathBuf) -> Result<()> {
    let dataset = DataFiles::new(config.data.dir.clone())
        .load()
        .with_context(|| format!("Failed to load data from {}", config.data.dir.display()))?;

    let target = DataFiles::new(out);
    target
        .write_dataset(&dataset)
        .with_context(|| format!("Failed to write data to {}", target.dir().display()))?;

    println!(
        "Seeded {} with {} varietals, {} wineries, {} wines",
        target.dir().display(),
        dataset.varietals.len(),
        dataset.wineries.len(),
        dataset.wines.len()
    );
    Ok(())
}
