use std::fs::File;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use bioquery::core::config;
use bioquery::tui;

#[derive(Parser)]
#[command(
    name = "bioquery",
    about = "Terminal client for the BioQuery research assistant"
)]
struct Args {
    /// Backend base URL (overrides config file and BIOQUERY_BACKEND_URL)
    #[arg(short, long)]
    backend_url: Option<String>,

    /// Include recent PubMed literature context in chat requests
    #[arg(short, long)]
    literature: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to bioquery.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("bioquery.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("bioquery: {e}");
        std::process::exit(2);
    });
    let resolved = config::resolve(
        &file_config,
        args.backend_url.as_deref(),
        args.literature.then_some(true),
    );

    log::info!("BioQuery client starting up, backend: {}", resolved.base_url);

    tui::run(resolved)
}
