pub mod download;
pub mod parser;
pub mod query;

use std::{path::PathBuf, time::Duration};

use crate::core::{Configuration, Result, Stage, output};

pub use parser::ChartResult;
pub use query::QueryRequest;

/// Everything one invocation needs, straight from the command line.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub nrql: String,
    pub output: PathBuf,
    pub config_path: PathBuf,
}

fn enter(stage: Stage) {
    tracing::debug!("Entering {stage} stage");
}

/// Run the whole pipeline: config, query, parse, download, write.
pub async fn run(chart_config: ChartConfig) -> Result<ChartResult> {
    enter(Stage::LoadingConfig);
    let config = Configuration::load(&chart_config.config_path)?;

    enter(Stage::Querying);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("nrql-chart/", env!("CARGO_PKG_VERSION")))
        .build()?;

    tracing::info!("Running NRQL query: {}", chart_config.nrql);
    let request = QueryRequest::new(&chart_config.nrql, &config);
    let payload = query::submit(&client, &config, &request).await?;

    enter(Stage::Parsing);
    let chart = parser::parse_response(&payload)?;
    tracing::info!("Chart URL: {}", chart.image_url);

    enter(Stage::Downloading);
    let bytes = download::download_image(&client, &chart.image_url).await?;
    tracing::debug!("Downloaded {} bytes", bytes.len());

    enter(Stage::Writing);
    output::write_image(&chart_config.output, &bytes)?;

    enter(Stage::Done);
    tracing::info!("Saved chart image to {}", chart_config.output.display());

    Ok(chart)
}
