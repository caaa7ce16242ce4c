use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use garment_scout::{format_recommendations, Config, Pipeline};

#[derive(Parser)]
#[command(
    name = "garment-scout",
    about = "Find stores selling clothing similar to the one in a photo"
)]
struct Cli {
    /// Path to the clothing image (jpg, png, gif or webp)
    image: PathBuf,

    /// Print the final pipeline state as JSON instead of a numbered list
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the recommendations
    let logs = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("garment_scout=info,serper_client=info")),
        )
        .with_writer(std::io::stderr);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        logs.json().init();
    } else {
        logs.init();
    }

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pipeline = Pipeline::from_config(&config).context("Failed to build pipeline")?;

    let report = pipeline.run(&cli.image).await;

    let degraded: Vec<&str> = report
        .degraded_steps()
        .map(|s| s.step.as_str())
        .collect();
    info!(clean = report.is_clean(), degraded = ?degraded, "Done");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.state)?);
    } else {
        print!("{}", format_recommendations(report.recommendations()));
    }

    Ok(())
}
