mod local;
mod standalone;

use crate::{ApplicationDescription, SparkResult};
use std::sync::Arc;

pub use local::LocalSchedulerBackend;
pub use standalone::StandaloneSchedulerBackend;

/// The driver side view of wherever the application runs.
#[async_trait]
pub trait SchedulerBackend: Send + Sync {
    /// Make the application known, returning the id it was given.
    async fn start(self: Arc<Self>, desc: &ApplicationDescription) -> SparkResult<String>;
    async fn stop(self: Arc<Self>) -> SparkResult<()>;
    fn default_parallelism(&self) -> usize;
}
