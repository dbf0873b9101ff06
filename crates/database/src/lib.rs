use std::{env, error::Error};

use sqlx::postgres::PgPoolOptions;

pub mod data_model;
pub mod queries;

const DEFAULT_MAX_CONNECTIONS: u32 = 16;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
    pub max_connections: u32,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
            max_connections,
        })
    }

    pub(self) fn postgres_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    UniqueViolation,
    Other(Box<dyn Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Clone)]
pub struct PgDatabase {
    pool: sqlx::PgPool,
}

impl PgDatabase {
    /// Opens a bounded connection pool and applies pending migrations.
    /// Connections are leased per statement and returned to the pool on
    /// every exit path.
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> std::result::Result<Self, Box<dyn Error>> {
        let pool = PgPoolOptions::new()
            .max_connections(database_connection_info.max_connections)
            .connect(&database_connection_info.postgres_url())
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}
