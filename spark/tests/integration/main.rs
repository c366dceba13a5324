use spark::cluster::{ClusterScheduler, ClusterSchedulerBackend, StandaloneClusterScheduler};
use spark::config::*;
use spark::{SparkResult, SparkSession, SqlContext};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

async fn start_master() -> SparkResult<(Arc<StandaloneClusterScheduler>, MasterUrl)> {
    let _ = tracing_subscriber::fmt::try_init();
    let backend = StandaloneClusterScheduler::new();
    let scheduler = ClusterScheduler::new(backend.clone());
    let (bind_addr, _) = scheduler.bind_rpc(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
    let master_url = format!("spark://{}", bind_addr).parse()?;
    Ok((backend, master_url))
}

fn job_conf(name: &str) -> SparkConf {
    SparkConf::new()
        .set_app_name(name)
        .set(CORES_MAX_KEY, "4")
        .set(EXECUTOR_CORES_KEY, "2")
        .set(EXECUTOR_MEMORY_KEY, "1g")
}

#[tokio::test]
async fn it_works_local() -> SparkResult<()> {
    let spark = SparkSession::builder()
        .master_url("local[2]".parse()?)
        .conf(job_conf("local-job"))
        .create()
        .await?;
    let sql = spark.sql_context();
    assert_eq!(sql.app_name(), "local-job");
    spark.stop().await?;
    assert!(spark.scx().is_stopped());
    Ok(())
}

#[tokio::test]
async fn standalone_session_is_visible_to_master() -> SparkResult<()> {
    let (master, master_url) = start_master().await?;
    let spark = SparkSession::builder().master_url(master_url).conf(job_conf("demo")).create().await?;

    let state = master.cluster_state();
    assert_eq!(state.applications.len(), 1);
    let app = &state.applications[0];
    assert_eq!(app.id.label(), spark.scx().app_id());
    assert_eq!(app.desc.name, "demo");
    assert_eq!(app.desc.cores_max, Some(4));
    assert_eq!(app.desc.executor_cores, 2);
    assert_eq!(app.desc.executor_memory_mib, 1024);
    assert_eq!(state.cores_requested, 4);

    spark.stop().await?;
    assert!(master.cluster_state().applications.is_empty());
    Ok(())
}

#[tokio::test]
async fn sql_context_shares_the_spark_context() -> SparkResult<()> {
    let (master, master_url) = start_master().await?;
    let spark = SparkSession::builder()
        .master_url(master_url)
        .app_name("ignored")
        .conf(job_conf("first"))
        .create()
        .await?;
    let sql = SqlContext::new(spark.scx());
    assert!(Arc::ptr_eq(&sql.spark_context(), &spark.scx()));
    assert_eq!(master.cluster_state().applications[0].desc.name, "first");
    Ok(())
}

#[tokio::test]
async fn invalid_resources_never_reach_the_master() -> SparkResult<()> {
    let (master, master_url) = start_master().await?;
    let conf = job_conf("bad").set(EXECUTOR_MEMORY_KEY, "a lot");
    assert!(SparkSession::builder().master_url(master_url).conf(conf).create().await.is_err());
    assert!(master.cluster_state().applications.is_empty());
    Ok(())
}
