//! restocache - Browse restaurant listings from the command line
//!
//! Fetches the restaurant collection from the listing server on first use,
//! keeps it in a local store, and prints filtered views of it.

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use restocache::cache::{RestaurantStore, STORE_VERSION};
use restocache::cli::{Cli, Command, StartupConfig, StoreLocation};
use restocache::data::{HttpSource, Restaurant};
use restocache::presentation::{image_url_for, map_marker_for, url_for, MapWidget, MarkerOptions};
use restocache::RestaurantCache;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Stand-in map that hands marker descriptors back for printing
struct DescriptorMap;

impl MapWidget for DescriptorMap {
    type Marker = MarkerOptions;

    fn place_marker(&self, options: MarkerOptions) -> MarkerOptions {
        options
    }
}

/// Directory of the configured store, `None` when running network-only
fn store_dir(location: &StoreLocation) -> Option<PathBuf> {
    match location {
        StoreLocation::Disabled => None,
        StoreLocation::Dir(dir) => Some(dir.clone()),
        StoreLocation::Default => RestaurantStore::default_dir(),
    }
}

/// Opens the configured store, falling back to network-only on failure
fn open_store(location: &StoreLocation) -> Option<RestaurantStore> {
    let dir = store_dir(location)?;

    match RestaurantStore::open(&dir, STORE_VERSION) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Could not open restaurant store");
            None
        }
    }
}

/// One-line summary of a restaurant
fn format_line(restaurant: &Restaurant) -> String {
    format!(
        "{:>4}  {}  [{}]  {}",
        restaurant.id, restaurant.name, restaurant.cuisine_type, restaurant.neighborhood
    )
}

/// Multi-line description of a restaurant
fn format_detail(restaurant: &Restaurant) -> String {
    format!(
        "{}\n  Cuisine:      {}\n  Neighborhood: {}\n  Location:     {:.6}, {:.6}\n  Page:         {}\n  Image:        {}",
        restaurant.name,
        restaurant.cuisine_type,
        restaurant.neighborhood,
        restaurant.latlng.lat,
        restaurant.latlng.lng,
        url_for(restaurant),
        image_url_for(restaurant)
    )
}

fn print_restaurants(restaurants: &[Restaurant], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(restaurants)?);
    } else {
        for restaurant in restaurants {
            println!("{}", format_line(restaurant));
        }
    }
    Ok(())
}

fn print_names(names: &[String], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(names)?);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}

/// Joins an error with its sources, e.g. "Request failed.: HTTP request failed: ..."
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Empties the configured store, rewriting it if it cannot be opened
fn clear_store(location: &StoreLocation) -> Result<(), Box<dyn Error>> {
    let dir = match store_dir(location) {
        Some(dir) => dir,
        None => {
            println!("No local store in use");
            return Ok(());
        }
    };

    match RestaurantStore::open(&dir, STORE_VERSION) {
        Ok(mut store) => {
            let removed = store.len();
            store.clear()?;
            info!(removed, "Cleared restaurant store");
            println!("Removed {} restaurants from {}", removed, store.path().display());
            store.close();
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Replacing unreadable restaurant store");
            let store = RestaurantStore::reset(&dir, STORE_VERSION)?;
            println!("Reset unreadable store at {}", store.path().display());
            store.close();
        }
    }
    Ok(())
}

async fn run(config: StartupConfig) -> Result<(), Box<dyn Error>> {
    if config.command == Command::ClearCache {
        return clear_store(&config.store);
    }

    let store = open_store(&config.store);
    let source = HttpSource::new(&config.source)?;
    let cache = RestaurantCache::new(source, store);

    match &config.command {
        Command::List {
            cuisine,
            neighborhood,
        } => {
            let restaurants = cache
                .fetch_by_cuisine_and_neighborhood(cuisine, neighborhood)
                .await?;
            print_restaurants(&restaurants, config.json)?;
        }
        Command::Show { id } => {
            let restaurant = cache.fetch_by_id(id.as_str()).await?;
            if config.json {
                println!("{}", serde_json::to_string_pretty(&restaurant)?);
            } else {
                println!("{}", format_detail(&restaurant));
            }
        }
        Command::Cuisines => {
            print_names(&cache.list_cuisines().await?, config.json)?;
        }
        Command::Neighborhoods => {
            print_names(&cache.list_neighborhoods().await?, config.json)?;
        }
        Command::Markers {
            cuisine,
            neighborhood,
        } => {
            let markers: Vec<MarkerOptions> = cache
                .fetch_by_cuisine_and_neighborhood(cuisine, neighborhood)
                .await?
                .iter()
                .map(|r| map_marker_for(r, &DescriptorMap))
                .collect();
            println!("{}", serde_json::to_string_pretty(&markers)?);
        }
        Command::ClearCache => {}
    }

    cache.close();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", error_chain(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}
