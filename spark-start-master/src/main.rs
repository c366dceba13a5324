use clap::Parser;
use spark::cluster::{ClusterScheduler, StandaloneClusterScheduler, DEFAULT_MASTER_PORT};
use spark::SparkResult;
use std::io::Write;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[macro_use]
extern crate tracing;

#[derive(Parser)]
struct Opts {
    #[clap(long, env = "SPARK_MASTER_HOST", default_value = "0.0.0.0")]
    host: IpAddr,
    #[clap(long, env = "SPARK_MASTER_PORT", default_value_t = DEFAULT_MASTER_PORT)]
    port: u16,
    /// How often to log the registered applications, in seconds. 0 disables it.
    #[clap(long, default_value_t = 30)]
    report_interval: u64,
}

#[tokio::main]
async fn main() -> SparkResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let opts = Opts::parse();

    let scheduler = ClusterScheduler::new(StandaloneClusterScheduler::new());
    let (bind_addr, handle) = scheduler.bind_rpc(SocketAddr::new(opts.host, opts.port)).await?;
    print!("spark://{}", bind_addr);
    std::io::stdout().flush()?;

    if opts.report_interval > 0 {
        let period = Duration::from_secs(opts.report_interval);
        let backend = scheduler.backend();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let state = backend.cluster_state();
                info!(
                    applications = state.applications.len(),
                    cores_requested = state.cores_requested,
                    "cluster state"
                );
            }
        });
    }

    tokio::select! {
        res = handle => res?,
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("received ctrl-c, shutting down master");
        }
    }
    Ok(())
}
