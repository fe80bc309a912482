//! Connection pool figures for the metrics endpoint

use sqlx::PgPool;

#[derive(Clone)]
pub struct PoolMetrics {
    pool: PgPool,
}

impl PoolMetrics {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open connections, busy or idle.
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    pub fn idle(&self) -> usize {
        self.pool.num_idle()
    }
}
