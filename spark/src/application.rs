use crate::config::*;
use crate::SparkResult;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};

const DEFAULT_EXECUTOR_CORES: usize = 1;
const DEFAULT_EXECUTOR_MEMORY: &str = "1g";

/// The resources an application asks for, as interpreted from its [`SparkConf`].
/// This is what gets sent to the master on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDescription {
    pub name: String,
    /// `None` if the application did not put an upper bound on its cores.
    pub cores_max: Option<usize>,
    pub executor_cores: usize,
    pub executor_memory_mib: u64,
}

impl ApplicationDescription {
    pub fn from_conf(conf: &SparkConf) -> SparkResult<Self> {
        let name = match conf.app_name() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => bail!("an application name must be set in your configuration"),
        };
        let cores_max = conf.get(CORES_MAX_KEY).map(|s| parse_cores(CORES_MAX_KEY, s)).transpose()?;
        let executor_cores = conf
            .get(EXECUTOR_CORES_KEY)
            .map(|s| parse_cores(EXECUTOR_CORES_KEY, s))
            .transpose()?
            .unwrap_or(DEFAULT_EXECUTOR_CORES);
        let executor_memory = conf.get(EXECUTOR_MEMORY_KEY).unwrap_or(DEFAULT_EXECUTOR_MEMORY);
        let executor_memory_mib = parse_memory_mib(executor_memory)
            .wrap_err_with(|| format!("invalid value for `{}`", EXECUTOR_MEMORY_KEY))?;
        Ok(Self { name, cores_max, executor_cores, executor_memory_mib })
    }

    /// The number of cores this application counts for when the master sums up demand.
    pub fn requested_cores(&self) -> usize {
        self.cores_max.unwrap_or(self.executor_cores)
    }
}

fn parse_cores(key: &str, s: &str) -> SparkResult<usize> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("`{}` must be a positive integer, got `{}`", key, s),
    }
}

/// Parse a jvm style memory string (`512m`, `2g`, `1024`) into mebibytes.
/// A bare number is taken to be in mebibytes, smaller units round up.
pub fn parse_memory_mib(s: &str) -> SparkResult<u64> {
    let lower = s.trim().to_ascii_lowercase();
    let split = lower.find(|c: char| !c.is_ascii_digit()).unwrap_or(lower.len());
    let (digits, unit) = lower.split_at(split);
    if digits.is_empty() {
        bail!("memory size `{}` does not start with a number", s);
    }
    let n = digits.parse::<u64>().wrap_err_with(|| format!("memory size `{}` is too large", s))?;

    const KIB: u64 = 1024;
    let mib = match unit {
        "b" => div_ceil(n, KIB * KIB),
        "k" | "kb" => div_ceil(n, KIB),
        "" | "m" | "mb" => n,
        "g" | "gb" => n.checked_mul(KIB).ok_or_else(|| eyre!("memory size `{}` is too large", s))?,
        "t" | "tb" => n
            .checked_mul(KIB * KIB)
            .ok_or_else(|| eyre!("memory size `{}` is too large", s))?,
        "p" | "pb" => n
            .checked_mul(KIB * KIB * KIB)
            .ok_or_else(|| eyre!("memory size `{}` is too large", s))?,
        _ => bail!("unknown unit `{}` in memory size `{}`", unit, s),
    };

    if mib == 0 {
        bail!("memory size `{}` must be positive", s);
    }
    Ok(mib)
}

fn div_ceil(n: u64, d: u64) -> u64 {
    n / d + u64::from(n % d != 0)
}
