//! Metrics service for collecting application metrics

use crate::db::PoolMetrics;

/// Refreshes gauges that are sampled rather than counted.
pub struct MetricsService {
    pool: Option<PoolMetrics>,
}

impl MetricsService {
    /// `pool` is `None` when running without a database.
    pub fn new(pool: Option<PoolMetrics>) -> Self {
        Self { pool }
    }

    /// Update database connection pool metrics
    pub fn update_db_connection_metrics(&self) {
        let Some(pool) = &self.pool else {
            return;
        };
        let size = pool.size() as i64;
        let idle = pool.idle() as i64;

        crate::metrics::DB_CONNECTIONS_ACTIVE.set((size - idle).max(0));
        crate::metrics::DB_CONNECTIONS_IDLE.set(idle);
    }

    /// Text-format lines appended after the registry output.
    pub fn collect_custom_metrics(&self, server_version: &str) -> String {
        let mut output = String::new();
        output.push_str("# HELP sportmap_server_info Server build information\n");
        output.push_str("# TYPE sportmap_server_info gauge\n");
        output.push_str(&format!(
            "sportmap_server_info{{version=\"{}\"}} 1\n",
            server_version
        ));
        output
    }
}
