//! Index façade: the public entry point of the query layer.
//!
//! A [`CypherIndex`] turns a predicate tree plus a [`QueryContext`] into a
//! lazily paged [`ResultStream`]. Only the count statement runs eagerly, and
//! only on a count cache miss; rows are fetched when the stream is consumed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{should_sort, ResultCountCache};
use crate::config::IndexConfig;
use crate::cypher::{CypherQuery, EntityKind};
use crate::error::IndexResult;
use crate::factory::{FactoryRegistry, QueryFactory};
use crate::predicate::Predicate;
use crate::session::{NativeNode, NativeRecord, NativeRelationship, Session};
use crate::stream::{RecordMapper, ResultStream, META_LIMITED, META_RESULT_COUNT, META_SORTED};

/// Per-call match shape and window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryContext {
    /// Node label, or relationship type for relationship indexes.
    pub type_label: Option<String>,
    pub source_label: Option<String>,
    pub target_label: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
    /// Overrides [`IndexConfig::page_size`] for this call.
    pub page_size: Option<usize>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.type_label = Some(label.into());
        self
    }

    pub fn between(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_label = Some(source.into());
        self.target_label = Some(target.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Node or relationship index over one session.
///
/// `Send + Sync`: share it behind an `Arc` between request threads. The count
/// cache is the only shared mutable state.
pub struct CypherIndex<T> {
    kind: EntityKind,
    session: Arc<dyn Session>,
    registry: Arc<FactoryRegistry>,
    counts: ResultCountCache,
    mapper: Arc<dyn RecordMapper<T>>,
    config: IndexConfig,
}

impl<T> CypherIndex<T> {
    pub fn new(kind: EntityKind, session: Arc<dyn Session>, mapper: Arc<dyn RecordMapper<T>>, config: IndexConfig) -> Self {
        Self {
            kind,
            session,
            registry: Arc::new(FactoryRegistry::default()),
            counts: ResultCountCache::new(config.query_cache_size),
            mapper,
            config,
        }
    }

    /// Replace the default factory registry.
    pub fn with_registry(mut self, registry: FactoryRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Translate one predicate onto `query` through the registry.
    pub fn create_query(&self, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        self.registry.create_query(self.registry.as_ref(), predicate, query, is_first)
    }

    /// Builder for `predicate` with the root sort attached, without executing
    /// anything.
    pub fn build_query(&self, context: &QueryContext, predicate: &Predicate) -> CypherQuery {
        let page_size = context.page_size.unwrap_or(self.config.page_size);
        let mut query = CypherQuery::new(self.kind, page_size)
            .with_labels(
                context.type_label.clone(),
                context.source_label.clone(),
                context.target_label.clone(),
            )
            .with_limit(context.limit, context.offset);

        self.create_query(predicate, &mut query, true);

        if let Some(sort) = &predicate.sort {
            query.sort(sort.sort_type, &sort.key, sort.descending);
        }
        query
    }

    /// Total rows matched by `query`, served from the count cache when the
    /// same statement shape was counted before.
    pub fn result_count(&self, query: &CypherQuery) -> IndexResult<u64> {
        let hash = query.hash_code();
        if let Some(count) = self.counts.get(hash) {
            debug!(hash, count, "Result count cache hit");
            return Ok(count);
        }

        let statement = query.statement(true, false);
        let count = self.session.count(&statement, query.parameters())?;
        debug!(hash, count, %statement, "Result count cache miss");

        self.counts.put(hash, count);
        Ok(count)
    }

    /// Run `predicate` and return a lazy stream over the mapped results.
    ///
    /// Sorting is requested only when the root predicate carries a sort key
    /// and the result count is below the configured threshold.
    pub fn query(&self, context: &QueryContext, predicate: &Predicate) -> IndexResult<ResultStream<T>> {
        let query = self.build_query(context, predicate);

        let count = self.result_count(&query)?;
        let sorted = query.sort_spec().is_some() && should_sort(count, self.config.sort_threshold);
        let limited = query.is_limited();

        debug!(kind = ?self.kind, count, sorted, limited, "Query prepared");

        let mut stream = ResultStream::new(self.session.clone(), query, sorted, self.mapper.clone());
        stream.set_metadata(META_RESULT_COUNT, i64::try_from(count).unwrap_or(i64::MAX));
        stream.set_metadata(META_LIMITED, limited);
        stream.set_metadata(META_SORTED, sorted);
        Ok(stream)
    }

    /// Drop every cached result count.
    pub fn invalidate_cache(&self) {
        debug!(entries = self.counts.len(), "Invalidating result count cache");
        self.counts.invalidate();
    }

    pub fn cached_counts(&self) -> usize {
        self.counts.len()
    }
}

impl CypherIndex<NativeNode> {
    /// Node index yielding the native nodes themselves.
    pub fn nodes(session: Arc<dyn Session>, config: IndexConfig) -> Self {
        let mapper: Arc<dyn RecordMapper<NativeNode>> = Arc::new(NativeRecord::into_node);
        Self::new(EntityKind::Node, session, mapper, config)
    }
}

impl CypherIndex<NativeRelationship> {
    /// Relationship index yielding the native relationships themselves.
    pub fn relationships(session: Arc<dyn Session>, config: IndexConfig) -> Self {
        let mapper: Arc<dyn RecordMapper<NativeRelationship>> = Arc::new(NativeRecord::into_relationship);
        Self::new(EntityKind::Relationship, session, mapper, config)
    }
}
