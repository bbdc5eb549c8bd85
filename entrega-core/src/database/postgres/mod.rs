pub mod locations;
pub mod orders;

pub use locations::PostgresLocationRepository;
pub use orders::PostgresOrderRepository;

use std::fmt;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::{DeliveryError, Result};

/// Bounded connection pool plus the repositories built on top of it.
///
/// Constructed once at process start and handed to the services; there is
/// no process-wide singleton.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
    orders: PostgresOrderRepository,
    locations: PostgresLocationRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn new(connection_string: &str) -> Result<Self> {
        Self::with_pool_size(connection_string, default_max_connections()).await
    }

    pub async fn with_pool_size(
        connection_string: &str,
        max_connections: u32,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            // Request-scoped deadline; a held connection never outlives
            // the request that acquired it.
            .acquire_timeout(Duration::from_secs(5))
            .max_lifetime(Duration::from_secs(1800))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await
            .map_err(|e| {
                DeliveryError::Storage(format!("database connection failed: {e}"))
            })?;

        info!(max_connections, "database pool initialized");

        Ok(Self::from_pool(pool, max_connections))
    }

    /// Wraps an existing pool, e.g. one created by test harnesses.
    pub fn from_pool(pool: PgPool, max_connections: u32) -> Self {
        let orders = PostgresOrderRepository::new(pool.clone());
        let locations = PostgresLocationRepository::new(pool.clone());
        Self {
            pool,
            max_connections,
            orders,
            locations,
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DeliveryError::Storage(format!("migration failed: {e}")))?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn orders(&self) -> &PostgresOrderRepository {
        &self.orders
    }

    pub fn locations(&self) -> &PostgresLocationRepository {
        &self.locations
    }
}

fn default_max_connections() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(10)
}
