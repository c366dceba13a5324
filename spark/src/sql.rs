use crate::SparkContext;
use std::sync::Arc;

/// The entry point for relational work on top of a [`SparkContext`].
pub struct SqlContext {
    scx: Arc<SparkContext>,
}

impl SqlContext {
    pub fn new(scx: Arc<SparkContext>) -> Self {
        Self { scx }
    }

    pub fn spark_context(&self) -> Arc<SparkContext> {
        Arc::clone(&self.scx)
    }

    pub fn app_name(&self) -> &str {
        self.scx.app_name()
    }
}
