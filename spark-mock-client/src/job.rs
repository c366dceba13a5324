use crate::JobConfig;
use spark::config::MasterUrl;
use spark::{SparkContext, SparkResult, SqlContext};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub const IDLE_INTERVAL: Duration = Duration::from_secs(1);

/// Sleep in steps of `interval` until `shutdown` resolves.
/// Returns the number of completed steps and the output of `shutdown`.
pub async fn idle_until<T>(interval: Duration, shutdown: impl Future<Output = T>) -> (u64, T) {
    tokio::pin!(shutdown);
    let mut iterations = 0;
    loop {
        tokio::select! {
            out = &mut shutdown => return (iterations, out),
            _ = tokio::time::sleep(interval) => {
                iterations += 1;
                trace!(iterations, "idle");
            }
        }
    }
}

/// Open a context for `config`, hold it until `shutdown` resolves, then stop it.
/// The context is stopped on every path once it has been opened.
/// If `shutdown` resolves while the context is still opening, the open is abandoned.
#[instrument(skip(config, shutdown), fields(app_name = %config.app_name))]
pub async fn run(
    master: MasterUrl,
    config: JobConfig,
    interval: Duration,
    shutdown: impl Future<Output = SparkResult<&'static str>>,
) -> SparkResult<u64> {
    tokio::pin!(shutdown);
    let scx = tokio::select! {
        scx = SparkContext::new(master, config.to_spark_conf()) => scx?,
        reason = &mut shutdown => {
            let reason = reason?;
            info!(%reason, "shut down before the spark context opened");
            return Ok(0);
        }
    };
    let sql = SqlContext::new(Arc::clone(&scx));
    info!(app_id = %scx.app_id(), "idling until shut down");

    let (iterations, reason) = idle_until(interval, &mut shutdown).await;
    match &reason {
        Ok(reason) => info!(%reason, iterations, "shutting down"),
        Err(err) => error!(%err, "waiting for shutdown failed"),
    }
    sql.spark_context().stop().await?;
    reason.map(|_| iterations)
}

/// The termination signals the job stops on.
/// Handlers are registered on construction, so a signal arriving before
/// [`ShutdownSignal::recv`] is polled is not lost.
pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    #[cfg(unix)]
    pub fn install() -> SparkResult<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> SparkResult<Self> {
        Ok(Self {})
    }

    /// Resolves with the name of the signal that was received.
    #[cfg(unix)]
    pub async fn recv(mut self) -> SparkResult<&'static str> {
        tokio::select! {
            _ = self.interrupt.recv() => Ok("SIGINT"),
            _ = self.terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(self) -> SparkResult<&'static str> {
        tokio::signal::ctrl_c().await?;
        Ok("ctrl-c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark::cluster::{ClusterScheduler, ClusterSchedulerBackend, StandaloneClusterScheduler};
    use std::net::Ipv4Addr;

    fn demo_config() -> JobConfig {
        JobConfig {
            app_name: "demo".to_owned(),
            cores_max: "4".to_owned(),
            executor_cores: "2".to_owned(),
            executor_memory: "1g".to_owned(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_counts_iterations() {
        let shutdown = tokio::time::sleep(Duration::from_millis(5500));
        let (iterations, ()) = idle_until(Duration::from_secs(1), shutdown).await;
        assert_eq!(iterations, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_does_not_end_on_its_own() {
        let idle = idle_until(IDLE_INTERVAL, never());
        let res = tokio::time::timeout(Duration::from_secs(3600), idle).await;
        assert!(res.is_err());
    }

    async fn never() {
        std::future::pending::<()>().await
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_local_until_shutdown() -> SparkResult<()> {
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            Ok("test")
        };
        let iterations =
            run(MasterUrl::Local { num_threads: 1 }, demo_config(), IDLE_INTERVAL, shutdown).await?;
        assert_eq!(iterations, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_fails_on_bad_resources() {
        let config = JobConfig { executor_memory: "much".to_owned(), ..demo_config() };
        let shutdown = std::future::pending::<SparkResult<&'static str>>();
        assert!(run(MasterUrl::Local { num_threads: 1 }, config, IDLE_INTERVAL, shutdown)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_shutdown_while_master_does_not_answer() -> SparkResult<()> {
        // connections queue in the backlog but are never accepted
        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let master = format!("spark://{}", listener.local_addr()?).parse()?;
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok("test")
        };
        let job = run(master, demo_config(), IDLE_INTERVAL, shutdown);
        let iterations = tokio::time::timeout(Duration::from_secs(3), job).await??;
        assert_eq!(iterations, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_registers_until_shutdown() -> SparkResult<()> {
        let backend = StandaloneClusterScheduler::new();
        let scheduler = ClusterScheduler::new(backend.clone());
        let (addr, _) = scheduler.bind_rpc((Ipv4Addr::LOCALHOST, 0)).await?;
        let master = format!("spark://{}", addr).parse()?;

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let shutdown = async move {
            let _ = rx.await;
            Ok("test")
        };
        let job = tokio::spawn(run(master, demo_config(), Duration::from_millis(10), shutdown));

        let mut registered = false;
        for _ in 0..200 {
            let state = backend.cluster_state();
            if let Some(app) = state.applications.first() {
                assert_eq!(app.desc.name, "demo");
                assert_eq!(app.desc.cores_max, Some(4));
                assert_eq!(app.desc.executor_cores, 2);
                assert_eq!(app.desc.executor_memory_mib, 1024);
                registered = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(registered);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!job.is_finished());
        let _ = tx.send(());
        let iterations = job.await??;
        assert!(iterations > 0);
        assert!(backend.cluster_state().applications.is_empty());
        Ok(())
    }
}
