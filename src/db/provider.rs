use std::future::Future;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// Errors from the persistence layer. `Connection` is process-fatal at
/// startup and an opaque 500 at request scope; `Query` is always an opaque
/// 500. Neither is ever serialized to a client.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("cannot reach the database: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),
}

impl From<mongodb::error::Error> for DbError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Authentication { .. } => {
                DbError::Connection(err.to_string())
            }
            _ => DbError::Query(err.to_string()),
        }
    }
}

/// A database handle whose lifetime is bound to one request. Acquired at the
/// start of the execute step, released on every exit path.
pub struct ScopedConnection {
    client: Client,
    database: Database,
}

impl ScopedConnection {
    /// Cheap handle clone for the repository; the client itself stays here
    /// so `release` can shut it down.
    pub fn database(&self) -> Database {
        self.database.clone()
    }
}

/// Opens one client connection per request from the configured connection
/// string. No pooling or reuse across requests: each request pays the full
/// connect/close cost, which is acceptable at this service's scale.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    uri: String,
    database_name: String,
    connect_timeout: Duration,
}

impl ConnectionProvider {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            uri: config.connection_string(),
            database_name: config.name.clone(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        }
    }

    /// Open a fresh client and select the target logical database.
    pub async fn acquire(&self) -> Result<ScopedConnection, DbError> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;
        options.server_selection_timeout = Some(self.connect_timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&self.database_name);
        Ok(ScopedConnection { client, database })
    }

    /// Close the connection. Best-effort: a failure to close is logged and
    /// never escalated into the response.
    pub async fn release(&self, connection: ScopedConnection) {
        connection.client.shutdown().await;
        debug!("released scoped database connection");
    }

    /// Run `op` with a connection scoped to this call, releasing it whether
    /// `op` succeeds or fails. This is the only way handlers touch the
    /// database, so no connection can outlive its request.
    pub async fn scoped<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(Database) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let connection = self.acquire().await.map_err(E::from)?;
        let result = op(connection.database()).await;
        self.release(connection).await;
        result
    }

    /// Startup probe. The service does not serve traffic without
    /// persistence, so the caller treats a failure here as fatal.
    pub async fn ping(&self) -> Result<(), DbError> {
        let connection = self.acquire().await?;
        let outcome = connection.database().run_command(doc! { "ping": 1 }).await;
        self.release(connection).await;
        match outcome {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("database ping failed: {}", e);
                Err(e.into())
            }
        }
    }
}
