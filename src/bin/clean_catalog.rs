/// Очистка каталога фильмов и сериалов: заполнение пропусков
/// и удаление неполных строк. Ошибки выводятся в лог, процесс
/// завершается штатно.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tabular_prep::config::{self, CatalogCleanConfig};
use tabular_prep::error::PrepError;
use tabular_prep::clean_catalog;

#[derive(Parser)]
#[command(name = "clean_catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fill and drop missing values in a media catalog CSV")]
struct Cli {
    /// Raw catalog CSV
    input: PathBuf,

    /// Output CSV path (parent directories are created)
    output: PathBuf,

    /// JSON file overriding fill/drop columns and placeholder
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let catalog_config: CatalogCleanConfig = match &cli.config {
        Some(path) => config::load_json(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CatalogCleanConfig::default(),
    };

    let summary = clean_catalog(&cli.input, &cli.output, &catalog_config)
        .map_err(|e| describe(e, &cli.input))?;

    tracing::info!(
        rows = summary.rows_out,
        dropped = summary.rows_dropped(),
        "Catalog cleaned"
    );
    Ok(())
}

fn describe(err: PrepError, input: &Path) -> anyhow::Error {
    match err {
        PrepError::SourceUnreadable { .. } => {
            anyhow::anyhow!("input file {} not found or unreadable: {}", input.display(), err)
        }
        PrepError::MissingColumn(ref column) => {
            anyhow::anyhow!("column '{}' is missing in {}", column, input.display())
        }
        PrepError::Write { .. } => anyhow::anyhow!("failed to save cleaned data: {}", err),
        other => anyhow::Error::new(other),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::error!("{:#}", e);
    }
}
