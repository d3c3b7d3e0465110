//! CLI entry point for the COVID-19 map dashboard.
//!
//! `serve` loads both sources, builds the animated figure and serves it on a
//! single local page. `list-entities` runs the aggregation and logs the final
//! totals per country or territory.

use anyhow::Result;
use clap::{Parser, Subcommand};
use covid_map::config::{ColorMap, DEFAULT_CASES_URL, DEFAULT_CONTINENTS_URL, Sources};
use covid_map::fetch::BasicClient;
use covid_map::figure::{Figure, FigureOptions};
use covid_map::loader::{load_cases, load_continents};
use covid_map::pipeline::{enrich, entity_summaries, run};
use covid_map::server::{bind, render_page, serve};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const PAGE_TITLE: &str = "COVID-19 Total Cases";

#[derive(Parser)]
#[command(name = "covid_map")]
#[command(about = "Animated world map of cumulative COVID-19 cases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Case distribution CSV (URL or path)
    #[arg(long, default_value = DEFAULT_CASES_URL)]
    cases: String,

    /// Continent lookup CSV (URL or path)
    #[arg(long, default_value = DEFAULT_CONTINENTS_URL)]
    continents: String,
}

impl From<SourceArgs> for Sources {
    fn from(args: SourceArgs) -> Self {
        Sources {
            cases: args.cases,
            continents: args.continents,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the animated map and serve it on a local page
    Serve {
        #[command(flatten)]
        sources: SourceArgs,

        /// Address to serve the page on
        #[arg(short, long, default_value = "127.0.0.1:8050")]
        bind: SocketAddr,

        /// Optional JSON file mapping continent names to marker colors
        #[arg(long, value_name = "FILE")]
        colors: Option<String>,
    },
    /// Log every country or territory with its final totals
    ListEntities {
        #[command(flatten)]
        sources: SourceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid_map.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid_map.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let client = BasicClient::new();

    match cli.command {
        Commands::Serve {
            sources,
            bind: addr,
            colors,
        } => {
            let colors = match colors {
                Some(path) => ColorMap::load(&path)?,
                None => ColorMap::default(),
            };
            let sources = Sources::from(sources);

            let dashboard = run(&client, &sources, &colors).await?;
            let figure = Figure::from_sequence(&dashboard.sequence, &FigureOptions::default());
            let page = render_page(&figure, PAGE_TITLE)?;
            info!(bytes = page.len(), "Page rendered");

            let listener = bind(addr).await?;
            serve(listener, page).await?;
        }
        Commands::ListEntities { sources } => {
            let sources = Sources::from(sources);
            let cases = load_cases(&client, &sources.cases).await?;
            let continents = load_continents(&client, &sources.continents).await?;
            let records = enrich(cases, continents);
            let summaries = entity_summaries(&records);

            for s in &summaries {
                info!(
                    entity = %s.entity,
                    continent = s.continent.as_deref().unwrap_or("unassigned"),
                    records = s.records,
                    total_cases = s.total_cases,
                    total_deaths = s.total_deaths,
                    "Entity"
                );
            }

            let unassigned = summaries.iter().filter(|s| s.continent.is_none()).count();
            info!(
                entities = summaries.len(),
                unassigned,
                records = records.len(),
                "Entity list summary"
            );
        }
    }

    Ok(())
}
