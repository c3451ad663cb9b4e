use anyhow::Result;
use clap::{Parser, Subcommand};
use wine_graph::client::{CellarClient, WineFilterArgs, DEFAULT_ENDPOINT};
use wine_graph::logging;

#[derive(Parser)]
#[command(name = "wine-client")]
#[command(about = "Command-line client for the wine_graph GraphQL API")]
#[command(version)]
struct Cli {
    /// GraphQL endpoint
    #[arg(long, env = "WINE_GRAPH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List wines
    Wines {
        /// Case-insensitive match on name or tasting notes
        #[arg(long)]
        search: Option<String>,
        /// Wine color, e.g. RED
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        limit: Option<i32>,
        #[arg(long)]
        offset: Option<i32>,
    },
    /// Show one wine in detail
    Wine { id: String },
    /// List varietals
    Varietals,
    /// List wineries
    Wineries,
    /// List wine lists
    Lists,
    /// Toggle a wine's favorite flag
    Favorite { id: String },
    /// Rate a wine from 1 to 5
    Rate { id: String, score: i32 },
    /// Create a wine list
    CreateList { name: String, wine_ids: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_console_logging();

    let cli = Cli::parse();
    let client = CellarClient::new(cli.endpoint);

    match cli.command {
        Commands::Wines {
            search,
            color,
            country,
            limit,
            offset,
        } => {
            let filter = WineFilterArgs {
                search,
                color: color.map(|c| c.to_uppercase()),
                country,
                ..Default::default()
            };
            let wines = client.wines(Some(filter), limit, offset).await?;
            println!(
                "{:<6} {:<36} {:>7} {:>8}  {:<20} {:<24} {}",
                "ID", "NAME", "VINTAGE", "PRICE", "VARIETAL", "WINERY", "FAV"
            );
            for wine in &wines {
                println!(
                    "{:<6} {:<36} {:>7} {:>8.2}  {:<20} {:<24} {}",
                    wine.id,
                    wine.name,
                    wine.vintage,
                    wine.price,
                    wine.varietal.name,
                    wine.winery.name,
                    if wine.is_favorite { "*" } else { "" }
                );
            }
            println!("{} wines", wines.len());
        }
        Commands::Wine { id } => match client.wine(&id).await? {
            Some(wine) => {
                println!("{} ({})", wine.name, wine.vintage);
                println!("   Varietal: {} [{}]", wine.varietal.name, wine.varietal.color);
                println!("   Winery:   {}, {}", wine.winery.name, wine.winery.country);
                println!("   ABV:      {:.1}%", wine.abv);
                println!("   Price:    {:.2}", wine.price);
                println!("   Notes:    {}", wine.tasting_notes);
                match wine.rating.average {
                    Some(avg) => println!("   Rating:   {:.1} ({} ratings)", avg, wine.rating.count),
                    None => println!("   Rating:   not rated"),
                }
                println!("   Favorite: {}", if wine.is_favorite { "yes" } else { "no" });
            }
            None => anyhow::bail!("No wine with id {}", id),
        },
        Commands::Varietals => {
            println!("{:<6} {:<24} {:<10} {}", "ID", "NAME", "COLOR", "WINES");
            for varietal in client.varietals().await? {
                println!(
                    "{:<6} {:<24} {:<10} {}",
                    varietal.id, varietal.name, varietal.color, varietal.wine_count
                );
            }
        }
        Commands::Wineries => {
            println!(
                "{:<6} {:<28} {:<20} {:<16} {:>7} {}",
                "ID", "NAME", "REGION", "COUNTRY", "FOUNDED", "WINES"
            );
            for winery in client.wineries().await? {
                println!(
                    "{:<6} {:<28} {:<20} {:<16} {:>7} {}",
                    winery.id,
                    winery.name,
                    winery.region,
                    winery.country,
                    winery.founded_year,
                    winery.wine_count
                );
            }
        }
        Commands::Lists => {
            let lists = client.wine_lists().await?;
            if lists.is_empty() {
                println!("No wine lists");
            }
            for list in lists {
                println!("{}  {} ({} wines)", list.id, list.name, list.wines.len());
                if let Some(description) = &list.description {
                    println!("   {}", description);
                }
                for wine in &list.wines {
                    println!("   - {} {}", wine.id, wine.name);
                }
            }
        }
        Commands::Favorite { id } => {
            let status = client.toggle_favorite(&id).await?;
            println!(
                "Wine {} is {}",
                status.id,
                if status.is_favorite {
                    "now a favorite"
                } else {
                    "no longer a favorite"
                }
            );
        }
        Commands::Rate { id, score } => {
            let wine = client.rate_wine(&id, score).await?;
            println!(
                "Rated {}: average {:.1} over {} ratings",
                wine.name,
                wine.rating.average.unwrap_or_default(),
                wine.rating.count
            );
        }
        Commands::CreateList { name, wine_ids } => {
            let list = client.create_wine_list(&name, &wine_ids).await?;
            println!("Created list {} ({}) with {} wines", list.name, list.id, list.wines.len());
        }
    }

    Ok(())
}
