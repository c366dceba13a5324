use clap::Parser;
use spark::config::MasterUrl;
use spark::SparkResult;
use spark_mock_client::{JobConfig, ShutdownSignal, IDLE_INTERVAL};
use tracing_subscriber::EnvFilter;

/// Opens a spark application with resources taken from `APP_NAME`, `CORE_MAX`,
/// `EXECUTOR_CORES` and `EXECUTOR_MEM`, then idles until it is told to stop.
#[derive(Parser)]
struct Opts {
    #[clap(long, env = "SPARK_MASTER", default_value = "local[*]")]
    master: MasterUrl,
}

#[tokio::main]
async fn main() -> SparkResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let Opts { master } = Opts::parse();

    let config = JobConfig::from_env()?;
    let shutdown = ShutdownSignal::install()?;
    spark_mock_client::run(master, config, IDLE_INTERVAL, shutdown.recv()).await?;
    Ok(())
}
