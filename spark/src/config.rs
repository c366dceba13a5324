use crate::cluster::DEFAULT_MASTER_PORT;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use url::{Host, Url};

pub const APP_NAME_KEY: &str = "spark.app.name";
pub const CORES_MAX_KEY: &str = "spark.cores.max";
pub const EXECUTOR_CORES_KEY: &str = "spark.executor.cores";
pub const EXECUTOR_MEMORY_KEY: &str = "spark.executor.memory";

/// Key/value settings for a spark application.
/// Values are kept as the strings they were set with, they are only
/// interpreted when a [`crate::SparkContext`] is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparkConf {
    settings: BTreeMap<String, String>,
}

impl SparkConf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_mut(key, value);
        self
    }

    pub fn set_mut(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn set_app_name(self, name: impl Into<String>) -> Self {
        self.set(APP_NAME_KEY, name)
    }

    pub fn app_name(&self) -> Option<&str> {
        self.get(APP_NAME_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MasterUrlError {
    #[error("could not parse master url `{0}`")]
    Unrecognized(String),
    #[error("invalid number of local threads in master url `{0}`")]
    InvalidThreads(String),
    #[error("master url `{0}` does not name a host")]
    MissingHost(String),
}

/// Where the application's context should be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MasterUrl {
    /// Run everything in the current process, nothing is registered remotely.
    Local { num_threads: usize },
    /// Register with a standalone master at `spark://host:port`.
    /// An ipv6 `host` is kept without its brackets.
    Standalone { host: String, port: u16 },
}

impl Default for MasterUrl {
    fn default() -> Self {
        Self::Local { num_threads: num_cpus::get() }
    }
}

impl FromStr for MasterUrl {
    type Err = MasterUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "local" {
            return Ok(MasterUrl::Local { num_threads: 1 });
        }

        if let Some(threads) = s.strip_prefix("local[").and_then(|s| s.strip_suffix(']')) {
            let num_threads = match threads {
                "*" => num_cpus::get(),
                n => match n.parse::<usize>() {
                    Ok(n) if n > 0 => n,
                    _ => return Err(MasterUrlError::InvalidThreads(s.to_owned())),
                },
            };
            return Ok(MasterUrl::Local { num_threads });
        }

        if s.starts_with("spark://") {
            let url = Url::parse(s).map_err(|_| MasterUrlError::Unrecognized(s.to_owned()))?;
            let host = match url.host() {
                Some(Host::Ipv4(addr)) => addr.to_string(),
                Some(Host::Ipv6(addr)) => addr.to_string(),
                Some(Host::Domain(host)) if !host.is_empty() => host.to_owned(),
                _ => return Err(MasterUrlError::MissingHost(s.to_owned())),
            };
            if !matches!(url.path(), "" | "/") {
                return Err(MasterUrlError::Unrecognized(s.to_owned()));
            }
            let port = url.port().unwrap_or(DEFAULT_MASTER_PORT);
            return Ok(MasterUrl::Standalone { host, port });
        }

        Err(MasterUrlError::Unrecognized(s.to_owned()))
    }
}

impl Display for MasterUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MasterUrl::Local { num_threads } => write!(f, "local[{}]", num_threads),
            MasterUrl::Standalone { host, port } if host.contains(':') =>
                write!(f, "spark://[{}]:{}", host, port),
            MasterUrl::Standalone { host, port } => write!(f, "spark://{}:{}", host, port),
        }
    }
}
