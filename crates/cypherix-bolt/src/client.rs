//! Bolt connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query, Row};

use crate::config::BoltConfig;
use crate::error::BoltResult;

/// Pooled connection to the graph server.
#[derive(Clone)]
pub struct BoltClient {
    graph: Graph,
}

impl BoltClient {
    /// Build the pool and ping the server.
    ///
    /// `Graph::connect` only creates the pool; the `RETURN 1` forces a real
    /// handshake so an unreachable server fails here rather than on the first
    /// query.
    pub async fn connect(config: &BoltConfig) -> Result<Self> {
        let bolt_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .context("Failed to build Bolt config")?;

        let graph = Graph::connect(bolt_config)
            .await
            .context("Failed to create Bolt connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .with_context(|| format!("Graph server at {} is not responding", config.uri))?;

        Ok(Self { graph })
    }

    /// Execute a statement that returns no rows.
    pub async fn run(&self, query: Query) -> BoltResult<()> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a statement and collect its rows.
    pub async fn rows(&self, query: Query) -> BoltResult<Vec<Row>> {
        let mut result = self.graph.execute(query).await?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}
