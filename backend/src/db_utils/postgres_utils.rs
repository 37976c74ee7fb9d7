use anyhow::Context;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, Row, types::ToSql};

use crate::config::ServerConfig;
use crate::db_utils::sql_fragment::SqlFragment;

pub fn create_postgres_pool(config: &ServerConfig) -> anyhow::Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(config.postgres_host.clone());
    cfg.port = Some(config.postgres_port);
    cfg.user = Some(config.postgres_user.clone());
    cfg.password = Some(config.postgres_password.clone());
    cfg.dbname = Some(config.postgres_database.clone());
    // views live in the configured schema, PostGIS and pg_trgm in public
    cfg.options = Some(format!("-c search_path={},public", config.postgres_schema));
    cfg.manager = Some(ManagerConfig { recycling_method: RecyclingMethod::Fast });

    let pool = cfg
        .builder(NoTls)
        .context("Failed to create postgres pool builder")?
        .max_size(config.postgres_max_connections)
        .runtime(Runtime::Tokio1)
        .build()
        .context("Failed to build postgres pool")?;
    Ok(pool)
}

pub async fn query_sql(pool: &Pool, sql: &SqlFragment) -> anyhow::Result<Vec<Row>> {
    let text = sql.to_postgres_text();
    let query_hash = sha256::digest(text.as_str());
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!(%query_hash, sql = %sql.inline_preview(), "SEARCH QUERY");
    }

    let t0 = std::time::Instant::now();
    let client = pool.get().await.context("Failed to get postgres connection")?;
    let params = sql.to_postgres_params();
    let param_refs: Vec<&(dyn ToSql + Sync)> = params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect();
    let rows = client
        .query(text.as_str(), &param_refs)
        .await
        .with_context(|| format!("Search query {query_hash} failed"))?;

    let dt_ms = t0.elapsed().as_millis() as u64;
    tracing::info!(%query_hash, rows = rows.len(), dt_ms, "SEARCH QUERY DONE");
    Ok(rows)
}
