mod standalone;


use crate::{ApplicationDescription, SparkResult};
use futures::StreamExt;
use indexed_vec::Idx;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tarpc::context::Context;
use tarpc::server::{BaseChannel, Channel};
use tokio::net::ToSocketAddrs;
use tokio::task::JoinHandle;

pub use standalone::*;

pub const DEFAULT_MASTER_PORT: u16 = 7077;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

crate::newtype_index!(AppId);

impl AppId {
    /// The id as the master reports it, e.g. `app-0003`.
    pub fn label(self) -> String {
        format!("app-{:04}", self.index())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub id: AppId,
    pub desc: ApplicationDescription,
    /// Milliseconds since the unix epoch.
    pub registered_at: u64,
}

/// A snapshot of what the master currently knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    pub applications: Vec<ApplicationInfo>,
    pub cores_requested: usize,
}

pub async fn create_rpc_client(
    server_addr: impl ToSocketAddrs,
) -> SparkResult<Arc<ClusterSchedulerRpcClient>> {
    let mk_codec = tokio_serde::formats::Bincode::default;
    let connect = tarpc::serde_transport::tcp::connect(server_addr, mk_codec);
    let transport = tokio::time::timeout(CONNECT_TIMEOUT, connect)
        .await
        .map_err(|_| eyre!("connection to master timed out"))??;
    let client = ClusterSchedulerRpcClient::new(tarpc::client::Config::default(), transport);
    Ok(Arc::new(client.spawn()))
}

pub struct ClusterScheduler {
    backend: Arc<dyn ClusterSchedulerBackend>,
}

impl ClusterScheduler {
    pub fn new(backend: Arc<dyn ClusterSchedulerBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> Arc<dyn ClusterSchedulerBackend> {
        Arc::clone(&self.backend)
    }

    /// Start accepting connections on `addr`.
    /// Returns the address actually bound to and a handle to the accept loop.
    pub async fn bind_rpc(
        &self,
        addr: impl ToSocketAddrs,
    ) -> SparkResult<(SocketAddr, JoinHandle<()>)> {
        let mk_codec = tokio_serde::formats::Bincode::default;
        let listener = tarpc::serde_transport::tcp::listen(addr, mk_codec).await?;
        let bind_addr = listener.local_addr();
        info!(%bind_addr, "master listening");

        let backend = self.backend();
        let handle = tokio::spawn(async move {
            futures::pin_mut!(listener);
            while let Some(transport) = listener.next().await {
                let transport = match transport {
                    Ok(transport) => transport,
                    Err(err) => {
                        warn!(%err, "failed to accept connection");
                        continue;
                    }
                };
                let peer = transport.peer_addr().ok();
                let connection = ClusterSchedulerConnection::new(Arc::clone(&backend), peer);
                let channel = BaseChannel::with_defaults(transport);
                tokio::spawn(async move {
                    channel.execute(connection.clone().serve()).await;
                    connection.release();
                });
            }
        });
        Ok((bind_addr, handle))
    }
}

pub trait ClusterSchedulerBackend: Send + Sync + 'static {
    fn register_application(&self, desc: ApplicationDescription) -> AppId;
    /// Returns whether the application was registered.
    fn unregister_application(&self, app_id: AppId) -> bool;
    fn cluster_state(&self) -> ClusterState;
}

#[tarpc::service]
pub trait ClusterSchedulerRpc {
    async fn register_application(desc: ApplicationDescription) -> AppId;
    async fn unregister_application(app_id: AppId) -> bool;
    async fn cluster_state() -> ClusterState;
}

/// The server side of a single client connection.
/// Applications registered through a connection are unregistered when it closes,
/// so a client that is killed does not linger on the master.
#[derive(Clone)]
pub struct ClusterSchedulerConnection {
    backend: Arc<dyn ClusterSchedulerBackend>,
    peer: Option<SocketAddr>,
    registered: Arc<Mutex<Vec<AppId>>>,
}

impl ClusterSchedulerConnection {
    fn new(backend: Arc<dyn ClusterSchedulerBackend>, peer: Option<SocketAddr>) -> Self {
        trace!(?peer, "new connection");
        Self { backend, peer, registered: Default::default() }
    }

    fn release(&self) {
        let registered = std::mem::take(&mut *self.registered.lock());
        for app_id in registered {
            if self.backend.unregister_application(app_id) {
                info!(peer = ?self.peer, app_id = %app_id.label(), "connection closed, removed application");
            }
        }
    }
}

#[tarpc::server]
impl ClusterSchedulerRpc for ClusterSchedulerConnection {
    #[instrument(skip(self, _cx))]
    async fn register_application(self, _cx: Context, desc: ApplicationDescription) -> AppId {
        let app_id = self.backend.register_application(desc);
        self.registered.lock().push(app_id);
        app_id
    }

    #[instrument(skip(self, _cx))]
    async fn unregister_application(self, _cx: Context, app_id: AppId) -> bool {
        self.registered.lock().retain(|&id| id != app_id);
        self.backend.unregister_application(app_id)
    }

    async fn cluster_state(self, _cx: Context) -> ClusterState {
        self.backend.cluster_state()
    }
}
