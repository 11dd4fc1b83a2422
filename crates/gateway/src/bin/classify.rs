use anyhow::Context;
use clap::{Parser, Subcommand};
use gateway::{
    config::get_configuration,
    logging::setup_logging,
    report::render_text,
    startup::{build_pipeline, verify_datasets},
};
use schema::LabelCatalog;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "classify", version, about = "Indonesian food classifier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a JPEG or PNG and print its recipe and nutrition
    Predict {
        image: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that every label resolves to exactly one row in both datasets
    Verify,
    /// List the label catalog in model output order
    Labels,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = get_configuration()?;
    let _telemetry = setup_logging(&config, "food-classify")?;

    match cli.command {
        Command::Predict { image, json } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("Failed to read {}", image.display()))?;

            let pipeline = build_pipeline(&config)?;
            let report = pipeline.run(bytes).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
        }
        Command::Verify => {
            let pipeline = build_pipeline(&config)?;
            verify_datasets(&pipeline).await?;
            println!("All {} labels resolve in both datasets", pipeline.catalog().len());
        }
        Command::Labels => {
            for entry in LabelCatalog::default().entries() {
                println!("{:>2}  {}", entry.index, entry.display_name);
            }
        }
    }

    Ok(())
}
