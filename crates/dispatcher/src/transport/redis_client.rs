//! RedisClient - redis-rs backed `KeyValueClient`

use contracts::{ContractError, StoreSinkConfig};
use redis::aio::MultiplexedConnection;
use tracing::{debug, info, instrument};

use crate::transport::KeyValueClient;

const SINK_NAME: &str = "store";

/// Redis connection plus the pending write pipeline
pub struct RedisClient {
    conn: Option<MultiplexedConnection>,
    pipe: redis::Pipeline,
    pending: usize,
}

impl RedisClient {
    /// Open the connection and verify it with `PING`
    ///
    /// # Errors
    /// `ContractError::SinkConnection` on invalid URL, refused connection,
    /// failed `PING`, or when `connect_timeout` elapses.
    #[instrument(
        name = "redis_client_connect",
        skip(config),
        fields(host = %config.host, port = config.port, db = config.db)
    )]
    pub async fn connect(config: &StoreSinkConfig) -> Result<Self, ContractError> {
        let url = config.connection_url();
        let client = redis::Client::open(url.as_str())
            .map_err(|e| ContractError::sink_connection(SINK_NAME, e.to_string()))?;

        let connect = async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            redis::cmd("PING").query_async::<String>(&mut conn).await?;
            Ok::<_, redis::RedisError>(conn)
        };

        let conn = tokio::time::timeout(config.connect_timeout(), connect)
            .await
            .map_err(|_| {
                ContractError::sink_connection(
                    SINK_NAME,
                    format!("no answer from {url} within {:?}", config.connect_timeout()),
                )
            })?
            .map_err(|e| ContractError::sink_connection(SINK_NAME, format!("{url}: {e}")))?;

        info!(%url, "Connected to Redis");

        Ok(Self {
            conn: Some(conn),
            pipe: redis::pipe(),
            pending: 0,
        })
    }
}

impl KeyValueClient for RedisClient {
    fn queue_set(&mut self, key: &str, value: &str) -> Result<(), ContractError> {
        if self.conn.is_none() {
            return Err(ContractError::sink_write(SINK_NAME, "connection closed"));
        }
        self.pipe.set(key, value).ignore();
        self.pending += 1;
        Ok(())
    }

    fn pending(&self) -> usize {
        self.pending
    }

    async fn flush(&mut self) -> Result<usize, ContractError> {
        if self.pending == 0 {
            return Ok(0);
        }
        let sent = std::mem::take(&mut self.pending);

        let Some(conn) = self.conn.as_mut() else {
            self.pipe.clear();
            return Err(ContractError::sink_write(SINK_NAME, "connection closed"));
        };

        let result = self.pipe.exec_async(conn).await;
        self.pipe.clear();

        result
            .map(|()| sent)
            .map_err(|e| ContractError::sink_write(SINK_NAME, format!("pipeline failed: {e}")))
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        if self.conn.take().is_some() {
            debug!("Redis connection dropped");
        }
        Ok(())
    }
}
