use super::*;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Keeps the live applications in memory, in the master process.
#[derive(Default)]
pub struct StandaloneClusterScheduler {
    app_idx: AtomicUsize,
    applications: DashMap<AppId, ApplicationInfo>,
}

impl StandaloneClusterScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn next_app_id(&self) -> AppId {
        AppId::new(self.app_idx.fetch_add(1, Ordering::SeqCst))
    }
}

impl ClusterSchedulerBackend for StandaloneClusterScheduler {
    fn register_application(&self, desc: ApplicationDescription) -> AppId {
        let id = self.next_app_id();
        let registered_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        info!(
            app_id = %id.label(),
            name = %desc.name,
            cores_max = ?desc.cores_max,
            executor_cores = desc.executor_cores,
            executor_memory_mib = desc.executor_memory_mib,
            "registered application"
        );
        self.applications.insert(id, ApplicationInfo { id, desc, registered_at });
        id
    }

    fn unregister_application(&self, app_id: AppId) -> bool {
        let removed = self.applications.remove(&app_id).is_some();
        if removed {
            info!(app_id = %app_id.label(), "unregistered application");
        }
        removed
    }

    fn cluster_state(&self) -> ClusterState {
        let mut applications =
            self.applications.iter().map(|entry| entry.value().clone()).collect::<Vec<_>>();
        applications.sort_by_key(|app| app.id.index());
        let cores_requested = applications
            .iter()
            .map(|app| app.desc.requested_cores())
            .fold(0, usize::saturating_add);
        ClusterState { applications, cores_requested }
    }
}
