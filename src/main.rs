use anyhow::Context;
use catalog_scraper::app::CatalogService;
use catalog_scraper::config::Config;
use catalog_scraper::logging;
use catalog_scraper::parser::ExtractionStrategy;
use catalog_scraper::pipeline::group_courses;
use catalog_scraper::server::{start_server, AppState};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "catalog_scraper")]
#[command(about = "University course catalog scraper")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (defaults to config / CATALOG_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Scrape one catalog page and print the courses as JSON
    Courses {
        url: String,
        #[arg(long, value_enum, default_value_t = ExtractionStrategy::Table)]
        strategy: ExtractionStrategy,
        /// Group sectioned output by year and category
        #[arg(long)]
        grouped: bool,
    },
    /// Print the first part of a page's raw HTML
    Debug { url: String },
    /// Print the faculty directory as JSON
    Faculties,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    let service = CatalogService::from_config(&config).context("building HTTP client")?;

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            let metrics = catalog_scraper::metrics::init_metrics();
            let state = AppState::new(Arc::new(service), metrics);
            start_server(state, port).await?;
        }
        Commands::Courses {
            url,
            strategy,
            grouped,
        } => {
            let courses = service.scrape(&url, strategy).await?;
            let output = if grouped {
                serde_json::to_string_pretty(&group_courses(courses))?
            } else {
                serde_json::to_string_pretty(&courses)?
            };
            println!("{output}");
        }
        Commands::Debug { url } => {
            let sample = service.inspect_html(&url).await?;
            info!("{}", sample.message);
            println!("{}", sample.html_sample);
        }
        Commands::Faculties => {
            let faculties = service.list_faculties().await?;
            println!("{}", serde_json::to_string_pretty(&faculties)?);
        }
    }

    Ok(())
}
