use clap::Parser;
use geofuse_common::ReqwestClient;
use geofuse_fetch::FetchOptions;
use geofuse_locator::Provider;
use geofuse_runner::{run, Cli, PipelineConfig, PipelineError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run_cli(&cli) {
        error!(error = %e, "pipeline failed");
        std::process::exit(1);
    }
}

fn run_cli(cli: &Cli) -> Result<(), PipelineError> {
    let provider: Provider = cli.provider.parse()?;
    let client = ReqwestClient::with_timeout(cli.timeout_secs)?;

    let config = PipelineConfig {
        region: cli.region()?,
        provider,
        output_dir: cli.output.clone(),
        stride: cli.stride,
        fetch: FetchOptions {
            workers: cli.workers,
        },
    };

    let outcome = run(&config, &client)?;

    info!(
        fetched = outcome.report.fetched_count(),
        skipped = outcome.report.skipped_count(),
        output = %config.output_dir.display(),
        "pipeline finished"
    );
    if let Some(samples) = &outcome.samples {
        info!(
            points = samples.points,
            native = %samples.native_path.display(),
            shifted = %samples.shifted_path.display(),
            "terrain point files written"
        );
    }
    Ok(())
}
