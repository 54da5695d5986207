#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::style)]

use clap::Parser;
use tracing::Level;

use gleaner::cli::Args;
use gleaner::fetch::fetch_node_blob;
use gleaner::parser::parse_blob;
use gleaner::writer::write_outputs;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let is_verbose = args.verbose;
    tracing_subscriber::fmt()
        .with_max_level(if is_verbose {
            Level::TRACE
        } else {
            Level::INFO
        })
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let blob = match args.input {
        Some(path) => {
            tracing::info!("Reading node blob from local file: {}", path);
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read input file {}: {}", path, e))?
        }
        None => {
            tracing::info!("Fetching node page: {}", args.url);
            fetch_node_blob(&args.url).await?
        }
    };

    let records = parse_blob(&blob);
    if records.is_empty() {
        tracing::warn!("No node descriptors found, nothing to write");
        return Ok(());
    }

    let ok_count = records
        .iter()
        .filter(|r| r.status == gleaner::parser::NodeStatus::Ok)
        .count();
    tracing::info!(
        "Parsed {} node records ({} ok, {} degraded)",
        records.len(),
        ok_count,
        records.len() - ok_count
    );

    write_outputs(&args.output, &records).await?;

    tracing::info!("Node collection complete!");
    Ok(())
}
