use super::*;
use crate::cluster::{self, AppId, ClusterSchedulerRpcClient};
use parking_lot::Mutex;
use tokio::sync::OnceCell;

/// A [SchedulerBackend] that registers the application with a standalone master.
/// The connection to the master is held open for as long as the application lives.
pub struct StandaloneSchedulerBackend {
    host: String,
    port: u16,
    client: OnceCell<Arc<ClusterSchedulerRpcClient>>,
    app_id: Mutex<Option<AppId>>,
}

impl StandaloneSchedulerBackend {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port, client: OnceCell::new(), app_id: Mutex::new(None) }
    }

    async fn client(&self) -> SparkResult<Arc<ClusterSchedulerRpcClient>> {
        self.client
            .get_or_try_init(|| cluster::create_rpc_client((self.host.as_str(), self.port)))
            .await
            .map(Arc::clone)
    }
}

#[async_trait]
impl SchedulerBackend for StandaloneSchedulerBackend {
    #[instrument(skip(self, desc), fields(master = %self.host, port = self.port))]
    async fn start(self: Arc<Self>, desc: &ApplicationDescription) -> SparkResult<String> {
        let client = self.client().await?;
        let app_id =
            client.register_application(tarpc::context::current(), desc.clone()).await?;
        debug!(app_id = %app_id.label(), "registered with master");
        *self.app_id.lock() = Some(app_id);
        Ok(app_id.label())
    }

    async fn stop(self: Arc<Self>) -> SparkResult<()> {
        let app_id = match self.app_id.lock().take() {
            Some(app_id) => app_id,
            None => return Ok(()),
        };
        let client = self.client().await?;
        if !client.unregister_application(tarpc::context::current(), app_id).await? {
            warn!(app_id = %app_id.label(), "master had already forgotten the application");
        }
        Ok(())
    }

    fn default_parallelism(&self) -> usize {
        num_cpus::get()
    }
}
