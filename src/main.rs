/// Полный конвейер предобработки: загрузка, очистка, разбиение,
/// масштабирование и one-hot кодирование, сохранение результатов

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tabular_prep::config::{self, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_URL};
use tabular_prep::{preprocess, PipelineConfig};

#[derive(Parser)]
#[command(name = "tabular-prep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clean, split, scale and one-hot encode the salary dataset")]
struct Cli {
    /// CSV file or http(s) URL with raw data
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    source: String,

    /// Directory for processed CSV files and the fitted transformer
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// JSON file overriding target/feature columns, seed and test size
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let pipeline_config: PipelineConfig = match &cli.config {
        Some(path) => config::load_json(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    let output = preprocess(&cli.source, &cli.output_dir, &pipeline_config)
        .with_context(|| format!("preprocessing {}", cli.source))?;

    let features = output.transformer.feature_names_out()?;
    tracing::info!(
        train_rows = output.train.n_rows(),
        test_rows = output.test.n_rows(),
        features = features.len(),
        "Done"
    );

    Ok(())
}
