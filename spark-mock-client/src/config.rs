use spark::config::*;
use thiserror::Error;

pub const APP_NAME_VAR: &str = "APP_NAME";
pub const CORE_MAX_VAR: &str = "CORE_MAX";
pub const EXECUTOR_CORES_VAR: &str = "EXECUTOR_CORES";
pub const EXECUTOR_MEM_VAR: &str = "EXECUTOR_MEM";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),
}

/// The resources the mock job asks for.
/// Values are passed on exactly as they were found, interpreting them is
/// left to the spark context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub app_name: String,
    pub cores_max: String,
    pub executor_cores: String,
    pub executor_memory: String,
}

impl JobConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // a value that is not valid unicode is as good as absent
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read every variable through `lookup`, reporting all of the missing ones at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut missing = vec![];
        let mut require = |var: &'static str| {
            lookup(var).unwrap_or_else(|| {
                missing.push(var);
                String::new()
            })
        };

        let config = Self {
            app_name: require(APP_NAME_VAR),
            cores_max: require(CORE_MAX_VAR),
            executor_cores: require(EXECUTOR_CORES_VAR),
            executor_memory: require(EXECUTOR_MEM_VAR),
        };

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }
        Ok(config)
    }

    pub fn to_spark_conf(&self) -> SparkConf {
        SparkConf::new()
            .set_app_name(&self.app_name)
            .set(CORES_MAX_KEY, &self.cores_max)
            .set(EXECUTOR_CORES_KEY, &self.executor_cores)
            .set(EXECUTOR_MEMORY_KEY, &self.executor_memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<HashMap<String, String>>();
        move |var| vars.get(var).cloned()
    }

    fn demo_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            (APP_NAME_VAR, "demo"),
            (CORE_MAX_VAR, "4"),
            (EXECUTOR_CORES_VAR, "2"),
            (EXECUTOR_MEM_VAR, "1g"),
        ]
    }

    #[test]
    fn test_reads_all_four() {
        let config = JobConfig::from_lookup(lookup_in(&demo_vars())).unwrap();
        assert_eq!(
            config,
            JobConfig {
                app_name: "demo".to_owned(),
                cores_max: "4".to_owned(),
                executor_cores: "2".to_owned(),
                executor_memory: "1g".to_owned(),
            }
        );
    }

    #[test]
    fn test_each_var_is_required() {
        for (var, _) in demo_vars() {
            let vars = demo_vars().into_iter().filter(|&(k, _)| k != var).collect::<Vec<_>>();
            assert_eq!(
                JobConfig::from_lookup(lookup_in(&vars)),
                Err(ConfigError::MissingVars(vec![var]))
            );
        }
    }

    #[test]
    fn test_missing_vars_are_reported_together() {
        let err = JobConfig::from_lookup(lookup_in(&[(CORE_MAX_VAR, "1")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVars(vec![APP_NAME_VAR, EXECUTOR_CORES_VAR, EXECUTOR_MEM_VAR])
        );
        assert_eq!(
            err.to_string(),
            "missing required environment variables: APP_NAME, EXECUTOR_CORES, EXECUTOR_MEM"
        );
    }

    #[test]
    fn test_values_are_not_interpreted() {
        let mut vars = demo_vars();
        vars[1] = (CORE_MAX_VAR, " lots ");
        vars[3] = (EXECUTOR_MEM_VAR, "");
        let config = JobConfig::from_lookup(lookup_in(&vars)).unwrap();
        assert_eq!(config.cores_max, " lots ");
        assert_eq!(config.executor_memory, "");
    }

    #[test]
    fn test_spark_conf_has_exactly_the_job_settings() {
        let mut vars = demo_vars();
        vars[0] = (APP_NAME_VAR, "test-job");
        let conf = JobConfig::from_lookup(lookup_in(&vars)).unwrap().to_spark_conf();
        assert_eq!(
            conf.iter().collect::<Vec<_>>(),
            vec![
                (APP_NAME_KEY, "test-job"),
                (CORES_MAX_KEY, "4"),
                (EXECUTOR_CORES_KEY, "2"),
                (EXECUTOR_MEMORY_KEY, "1g"),
            ]
        );
    }
}
