//! City Buddies CLI: look up cities and population buddies from a terminal
//!
//! Talks to the SPARQL endpoint directly through the city-buddies library.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use city_buddies::routes::{page_title, resolve_path};
use city_buddies::sparql::{Record, WikidataClient};
use city_buddies::{AppConfig, City, CityBuddies, EntityId, SearchOutcome};

#[derive(Parser)]
#[command(name = "city-buddies", version, about = "Find the city closest in population to yours")]
struct Cli {
    /// SPARQL endpoint URL
    #[arg(long, global = true, env = "CITY_BUDDIES_SPARQL_ENDPOINT")]
    endpoint: Option<String>,

    /// YAML configuration file
    #[arg(long, global = true, env = "CITY_BUDDIES_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log queries to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a raw SPARQL query
    Query {
        /// The SPARQL query string
        sparql: String,
    },
    /// Print the label of a Wikidata item
    Label {
        /// Item ID, e.g. Q60
        id: String,
    },
    /// Search cities by name
    Search {
        /// City name in the configured language
        label: String,
    },
    /// Find the city closest in population
    Match {
        /// Item ID of the target city
        id: String,
    },
    /// Resolve a page path to its route and title
    Title {
        /// Path such as /match/Q60
        path: String,
    },
}

/// Rows ready for table or CSV output
struct Tabular {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(endpoint) = cli.endpoint {
        config.service.sparql_endpoint = endpoint;
    }

    let client = WikidataClient::new(&config.service)?;
    let buddies = CityBuddies::new(Arc::new(client), &config.service.language);

    match cli.command {
        Commands::Query { sparql } => {
            let records = buddies.submit(&sparql).await?;
            print_output(&records, records_table(&records), &cli.format)
        }
        Commands::Label { id } => {
            let id: EntityId = id.parse()?;
            let label = buddies.id_to_label(&id).await?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "id": id, "label": label }));
                }
                _ => println!("{}", label),
            }
            Ok(())
        }
        Commands::Search { label } => run_search(&buddies, &label, &cli.format).await,
        Commands::Match { id } => {
            let id: EntityId = id.parse()?;
            let m = buddies.find_buddy(&id).await?;
            let table = cities_table(&[m.target.clone(), m.buddy.clone()]);
            print_output(&m, table, &cli.format)?;
            if let OutputFormat::Table = cli.format {
                println!("Population difference: {}", m.difference);
            }
            Ok(())
        }
        Commands::Title { path } => {
            let route = resolve_path(&path);
            let title = page_title(&route, &buddies).await;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                        "route": route,
                        "title": title,
                    }))?);
                }
                _ => {
                    println!("Route: {}", route.name);
                    if let Some(from) = route.redirected_from {
                        println!("From:  {}", from);
                    }
                    println!("Path:  {}", route.path());
                    println!("Title: {}", title);
                }
            }
            Ok(())
        }
    }
}

async fn run_search(buddies: &CityBuddies, label: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let outcome = buddies.search(label).await?;
    if let (OutputFormat::Table, SearchOutcome::NotFound) = (format, &outcome) {
        println!("No city named {:?}", label);
        return Ok(());
    }
    if let (OutputFormat::Table, SearchOutcome::Ambiguous(cities)) = (format, &outcome) {
        println!("{} cities are named {:?}; pick one by ID:", cities.len(), label);
    }
    print_output(outcome.cities(), cities_table(outcome.cities()), format)
}

fn print_output<T: Serialize + ?Sized>(value: &T, table: Tabular, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Csv => {
            if !table.columns.is_empty() {
                println!("{}", csv_line(&table.columns));
                for row in &table.rows {
                    println!("{}", csv_line(row));
                }
            }
        }
        OutputFormat::Table => {
            if table.columns.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut out = Table::new();
            out.set_content_arrangement(ContentArrangement::Dynamic);
            out.set_header(&table.columns);
            for row in &table.rows {
                out.add_row(row);
            }

            println!("{}", out);
            println!("{} row(s)", table.rows.len());
        }
    }

    Ok(())
}

/// Columns are the union of all bound variables, in first-seen order
fn records_table(records: &[Record]) -> Tabular {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for var in record.variables() {
            if !columns.iter().any(|c| c == var) {
                columns.push(var.to_string());
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.get(c).unwrap_or_default().to_string())
                .collect()
        })
        .collect();

    Tabular { columns, rows }
}

fn cities_table(cities: &[City]) -> Tabular {
    let columns = ["id", "label", "description", "country", "population"]
        .iter()
        .map(|c| c.to_string())
        .collect();

    let rows = cities
        .iter()
        .map(|city| {
            vec![
                city.id.to_string(),
                city.label.clone(),
                city.description.clone().unwrap_or_default(),
                city.country.clone().unwrap_or_default(),
                city.population.to_string(),
            ]
        })
        .collect();

    Tabular { columns, rows }
}

fn csv_line(cells: &[String]) -> String {
    cells.iter().map(|c| format_csv_value(c)).collect::<Vec<_>>().join(",")
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
