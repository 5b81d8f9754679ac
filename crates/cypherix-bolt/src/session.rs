//! Blocking [`Session`] over the async Bolt driver.

use std::sync::Arc;

use anyhow::Result;
use cypherix_core::{IndexResult, NativeRecord, Parameters, Session};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::client::BoltClient;
use crate::config::BoltConfig;
use crate::convert::{row_count, row_record, to_query};
use crate::error::{BoltError, BoltResult};

/// Session that drives a [`BoltClient`] on its own runtime.
///
/// Every call blocks the calling thread. Do not use it from inside another
/// tokio runtime's worker; `block_on` panics there.
#[derive(Clone)]
pub struct BoltSession {
    runtime: Arc<Runtime>,
    client: BoltClient,
}

impl BoltSession {
    /// Start a runtime and connect.
    pub fn connect(config: &BoltConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("cypherix-bolt")
            .enable_all()
            .build()
            .map_err(BoltError::from)?;

        let client = runtime.block_on(BoltClient::connect(config))?;
        debug!(uri = %config.uri, database = %config.database, "Bolt session connected");

        Ok(Self {
            runtime: Arc::new(runtime),
            client,
        })
    }

    pub fn client(&self) -> &BoltClient {
        &self.client
    }

    /// Run `future` to completion on the session's runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn fetch(&self, statement: &str, parameters: &Parameters) -> BoltResult<Vec<NativeRecord>> {
        let rows = self.block_on(self.client.rows(to_query(statement, parameters)))?;
        rows.iter().map(row_record).collect()
    }

    fn fetch_count(&self, statement: &str, parameters: &Parameters) -> BoltResult<u64> {
        let rows = self.block_on(self.client.rows(to_query(statement, parameters)))?;
        let row = rows.first().ok_or(BoltError::MissingCount)?;
        row_count(row)
    }
}

impl Session for BoltSession {
    fn execute(&self, statement: &str, parameters: &Parameters) -> IndexResult<Vec<NativeRecord>> {
        Ok(self.fetch(statement, parameters)?)
    }

    fn count(&self, statement: &str, parameters: &Parameters) -> IndexResult<u64> {
        Ok(self.fetch_count(statement, parameters)?)
    }
}
