use super::*;
use std::time::{SystemTime, UNIX_EPOCH};

/// A [SchedulerBackend] for applications that run entirely in this process.
pub struct LocalSchedulerBackend {
    num_threads: usize,
}

impl LocalSchedulerBackend {
    pub fn new(num_threads: usize) -> Self {
        Self { num_threads }
    }
}

#[async_trait]
impl SchedulerBackend for LocalSchedulerBackend {
    async fn start(self: Arc<Self>, desc: &ApplicationDescription) -> SparkResult<String> {
        let millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
        debug!(name = %desc.name, num_threads = self.num_threads, "starting local application");
        Ok(format!("local-{}", millis))
    }

    async fn stop(self: Arc<Self>) -> SparkResult<()> {
        Ok(())
    }

    fn default_parallelism(&self) -> usize {
        self.num_threads
    }
}
