use crate::config::{MasterUrl, SparkConf};
use crate::scheduler::*;
use crate::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A handle to an open application.
/// There should be exactly one per process, owned by whoever opened it.
/// Dropping the context without calling [`SparkContext::stop`] leaves cleanup
/// to the master noticing the closed connection.
pub struct SparkContext {
    master: MasterUrl,
    conf: SparkConf,
    desc: ApplicationDescription,
    app_id: String,
    backend: Arc<dyn SchedulerBackend>,
    stopped: AtomicBool,
}

static_assertions::assert_impl_all!(Arc<SparkContext>: Send, Sync);

impl SparkContext {
    #[instrument(skip(conf))]
    pub async fn new(master: MasterUrl, conf: SparkConf) -> SparkResult<Arc<Self>> {
        let desc = ApplicationDescription::from_conf(&conf)?;

        let backend: Arc<dyn SchedulerBackend> = match &master {
            MasterUrl::Local { num_threads } => Arc::new(LocalSchedulerBackend::new(*num_threads)),
            MasterUrl::Standalone { host, port } =>
                Arc::new(StandaloneSchedulerBackend::new(host.as_str(), *port)),
        };

        let app_id = Arc::clone(&backend).start(&desc).await?;
        info!(%app_id, name = %desc.name, "spark context started");

        Ok(Arc::new(Self {
            master,
            conf,
            desc,
            app_id,
            backend,
            stopped: AtomicBool::new(false),
        }))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_name(&self) -> &str {
        &self.desc.name
    }

    pub fn master(&self) -> &MasterUrl {
        &self.master
    }

    pub fn conf(&self) -> &SparkConf {
        &self.conf
    }

    pub fn application_description(&self) -> &ApplicationDescription {
        &self.desc
    }

    pub fn default_parallelism(&self) -> usize {
        self.backend.default_parallelism()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Shut down the application. Calling this more than once is a no-op.
    pub async fn stop(&self) -> SparkResult<()> {
        if self.stopped.swap(true, Ordering::SeqCst) {
            debug!(app_id = %self.app_id, "spark context already stopped");
            return Ok(());
        }
        Arc::clone(&self.backend).stop().await?;
        info!(app_id = %self.app_id, "spark context stopped");
        Ok(())
    }
}
