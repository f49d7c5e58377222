use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use waratah_catalog::Catalog;
use waratah_core::{chat_reply, nearest};
use waratah_observability::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "waratah")]
#[command(about = "Waratah Concierge CLI")]
struct Cli {
    #[arg(long, env = "WARATAH_PLACES", default_value = "data/places.json")]
    places: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive recommendation chat against the catalog.
    Chat {
        #[arg(long, env = "WARATAH_DEFAULT_CITY", default_value = "sydney")]
        city: String,
    },
    /// One-shot proximity search from a coordinate.
    Nearby {
        lat: f64,
        lng: f64,
        #[arg(long, default_value = "any")]
        kind: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long, default_value_t = 5)]
        limit: i64,
    },
    /// Catalog size and per-city counts.
    Stats,
}

fn main() -> Result<()> {
    init_tracing("waratah_cli");
    let cli = Cli::parse();

    let catalog = Catalog::load(&cli.places)
        .with_context(|| format!("failed loading place catalog from {}", cli.places.display()))?;

    match cli.command {
        Command::Chat { city } => run_chat(&catalog, &city)?,
        Command::Nearby {
            lat,
            lng,
            kind,
            city,
            limit,
        } => {
            let hits = nearest(catalog.places(), lat, lng, &kind, city.as_deref(), limit);
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Command::Stats => {
            println!("places: {}", catalog.len());
            for (city, count) in catalog.city_counts() {
                println!("  {city}: {count}");
            }
        }
    }

    Ok(())
}

fn run_chat(catalog: &Catalog, default_city: &str) -> Result<()> {
    println!("Waratah Concierge chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let outcome = chat_reply(catalog.places(), message, None, default_city);
        println!("\n{}\n", outcome.reply);
    }

    Ok(())
}
