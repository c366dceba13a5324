use crate::config::{MasterUrl, SparkConf};
use crate::{SparkContext, SparkResult, SqlContext};
use std::sync::Arc;

pub struct SparkSession {
    scx: Arc<SparkContext>,
}

impl SparkSession {
    pub fn builder() -> SparkSessionBuilder {
        SparkSessionBuilder::default()
    }

    pub fn scx(&self) -> Arc<SparkContext> {
        Arc::clone(&self.scx)
    }

    pub fn sql_context(&self) -> SqlContext {
        SqlContext::new(self.scx())
    }

    pub async fn stop(&self) -> SparkResult<()> {
        self.scx.stop().await
    }
}

#[derive(Default)]
pub struct SparkSessionBuilder {
    master_url: MasterUrl,
    conf: SparkConf,
}

impl SparkSessionBuilder {
    pub async fn create(self) -> SparkResult<SparkSession> {
        Ok(SparkSession { scx: SparkContext::new(self.master_url, self.conf).await? })
    }

    pub fn master_url(mut self, master_url: MasterUrl) -> Self {
        self.master_url = master_url;
        self
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.conf = self.conf.set_app_name(name);
        self
    }

    /// Settings from `conf` override any set so far.
    pub fn conf(mut self, conf: SparkConf) -> Self {
        for (key, value) in conf.iter() {
            self.conf.set_mut(key, value);
        }
        self
    }
}
