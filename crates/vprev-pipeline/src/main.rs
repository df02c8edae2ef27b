//! Preview pipeline binary.

use anyhow::Context;
use tracing::{error, info, warn};

use vprev_media::FfmpegRunner;
use vprev_ml_client::MlClient;
use vprev_pipeline::logging::init_tracing;
use vprev_pipeline::{Coordinator, InteractivePrompt, PipelineConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = PipelineConfig::from_env();
    init_tracing(&config.log_file).context("failed to initialize logging")?;

    info!("Starting vprev-pipeline");
    info!("Pipeline config: {:?}", config);

    if let Err(e) = FfmpegRunner::check_available() {
        warn!("{}; every video will fail until it is installed", e);
    }

    let scorer = MlClient::from_env().context("failed to create ML client")?;
    let coordinator = Coordinator::new(config, Box::new(FfmpegRunner::new()), Box::new(scorer));

    match coordinator.run(&InteractivePrompt::new()).await {
        Ok(summary) => {
            info!(
                run_id = %summary.run_id,
                processed = summary.processed,
                total = summary.total,
                "Finished in {:.2}s",
                summary.elapsed.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            Err(e.into())
        }
    }
}
