use crate::config::Config;
use anyhow::Result;
use deadpool::Runtime;
use diesel::{Connection, PgConnection};
use diesel_async::{pooled_connection::AsyncDieselConnectionManager, AsyncPgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub type DbPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type DbConnection = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type DbPoolError = deadpool::managed::PoolError<diesel_async::pooled_connection::PoolError>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Connection pool plus startup migration handling.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Build the pool, verify connectivity and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self> {
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database.url);

        let pool = DbPool::builder(manager)
            .max_size(config.database.max_connections as usize)
            .runtime(Runtime::Tokio1)
            .build()?;

        let db = Self { pool };

        // Test connection by taking one from the pool
        let _conn = db.get_connection().await?;
        info!("Successfully connected to the database");

        db.run_migrations(&config.database.url)?;

        Ok(db)
    }

    // Migrations run over a plain synchronous connection; diesel_migrations
    // has no async harness.
    fn run_migrations(&self, database_url: &str) -> Result<()> {
        let mut conn = PgConnection::establish(database_url)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("failed to run database migrations: {e}"))?;
        info!("Database migrations applied successfully");
        Ok(())
    }

    /// Get a database connection from the pool
    pub async fn get_connection(&self) -> Result<DbConnection, DbPoolError> {
        self.pool.get().await
    }

    /// Clone a handle to the underlying pool
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
