//! Lazily paged result streams.
//!
//! A [`ResultStream`] owns the query that produced it and fetches one page
//! at a time through the session:
//!
//! ```text
//! Unstarted --first has_next--> Fetching --page with rows--> Fetching
//!                                   \--empty page or limit reached--> Exhausted
//! ```
//!
//! Records are mapped into domain objects one at a time by the injected
//! [`RecordMapper`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::cypher::CypherQuery;
use crate::error::{IndexError, IndexResult};
use crate::session::{NativeRecord, Session};
use crate::value::Value;

pub const META_RESULT_COUNT: &str = "resultCount";
pub const META_LIMITED: &str = "limited";
pub const META_SORTED: &str = "sorted";

/// Converts native records into domain objects.
pub trait RecordMapper<T>: Send + Sync {
    fn map(&self, record: NativeRecord) -> IndexResult<T>;
}

impl<T, F> RecordMapper<T> for F
where
    F: Fn(NativeRecord) -> IndexResult<T> + Send + Sync,
{
    fn map(&self, record: NativeRecord) -> IndexResult<T> {
        self(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Unstarted,
    Fetching,
    Exhausted,
}

/// Paged cursor over the rows of a fetch statement.
///
/// Owned by one caller; not meant to be shared between threads without
/// external synchronization.
pub struct ResultStream<T> {
    session: Option<Arc<dyn Session>>,
    query: CypherQuery,
    sorted: bool,
    mapper: Arc<dyn RecordMapper<T>>,
    page: std::vec::IntoIter<NativeRecord>,
    state: StreamState,
    metadata: BTreeMap<String, Value>,
}

impl<T> ResultStream<T> {
    pub fn new(session: Arc<dyn Session>, query: CypherQuery, sorted: bool, mapper: Arc<dyn RecordMapper<T>>) -> Self {
        Self {
            session: Some(session),
            query,
            sorted,
            mapper,
            page: Vec::new().into_iter(),
            state: StreamState::Unstarted,
            metadata: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn query(&self) -> &CypherQuery {
        &self.query
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Whether another record is available, fetching the next page if the
    /// current one is used up.
    pub fn has_next(&mut self) -> IndexResult<bool> {
        loop {
            match self.state {
                StreamState::Exhausted => return Ok(false),
                StreamState::Fetching if !self.page.as_slice().is_empty() => return Ok(true),
                StreamState::Unstarted | StreamState::Fetching => self.fetch_page()?,
            }
        }
    }

    /// The next mapped record, or [`IndexError::Exhausted`] past the end.
    pub fn try_next(&mut self) -> IndexResult<T> {
        if !self.has_next()? {
            return Err(IndexError::Exhausted);
        }
        let record = self.page.next().ok_or(IndexError::Exhausted)?;
        self.mapper.map(record)
    }

    /// Release the session handle. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            debug!(pages = self.query.page(), "Result stream closed");
        }
        self.page = Vec::new().into_iter();
        self.state = StreamState::Exhausted;
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_none()
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Total row count reported by the count statement.
    pub fn result_count(&self) -> Option<u64> {
        match self.metadata.get(META_RESULT_COUNT) {
            Some(Value::Integer(count)) => u64::try_from(*count).ok(),
            _ => None,
        }
    }

    pub fn is_limited(&self) -> bool {
        matches!(self.metadata.get(META_LIMITED), Some(Value::Boolean(true)))
    }

    fn fetch_page(&mut self) -> IndexResult<()> {
        let Some(session) = &self.session else {
            self.state = StreamState::Exhausted;
            return Ok(());
        };
        if self.query.page_window().is_none() {
            self.state = StreamState::Exhausted;
            return Ok(());
        }

        let statement = self.query.statement(false, self.sorted);
        debug!(page = self.query.page(), %statement, "Fetching page");

        let records = match session.execute(&statement, self.query.parameters()) {
            Ok(records) => records,
            Err(err) => {
                self.state = StreamState::Exhausted;
                return Err(err);
            }
        };
        self.query.next_page();

        if records.is_empty() {
            self.state = StreamState::Exhausted;
        } else {
            self.state = StreamState::Fetching;
            self.page = records.into_iter();
        }
        Ok(())
    }
}

impl<T> Iterator for ResultStream<T> {
    type Item = IndexResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.try_next()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl<T> Drop for ResultStream<T> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::EntityKind;
    use crate::memory::MemorySession;
    use crate::session::NativeNode;

    fn node(id: i64) -> NativeRecord {
        NativeRecord::Node(NativeNode {
            id,
            labels: Vec::new(),
            properties: BTreeMap::new(),
        })
    }

    fn stream(session: Arc<MemorySession>, page_size: usize) -> ResultStream<i64> {
        let query = CypherQuery::new(EntityKind::Node, page_size);
        let mapper: Arc<dyn RecordMapper<i64>> = Arc::new(|record: NativeRecord| record.into_node().map(|n| n.id));
        ResultStream::new(session, query, false, mapper)
    }

    #[test]
    fn test_pages_until_empty() {
        let session = Arc::new(MemorySession::new((1..=3).map(node).collect()));
        let mut results = stream(session.clone(), 2);

        assert_eq!(results.state(), StreamState::Unstarted);
        assert_eq!(session.fetch_count(), 0);

        assert!(results.has_next().unwrap());
        assert_eq!(results.state(), StreamState::Fetching);
        assert_eq!(results.try_next().unwrap(), 1);
        assert_eq!(results.try_next().unwrap(), 2);
        assert_eq!(session.fetch_count(), 1);

        assert!(results.has_next().unwrap());
        assert_eq!(results.try_next().unwrap(), 3);
        assert_eq!(session.fetch_count(), 2);

        assert!(!results.has_next().unwrap());
        assert_eq!(results.state(), StreamState::Exhausted);
        assert_eq!(session.fetch_count(), 3);

        // Terminal: no further pages are requested.
        assert!(!results.has_next().unwrap());
        assert_eq!(session.fetch_count(), 3);
        assert!(matches!(results.try_next(), Err(IndexError::Exhausted)));
    }

    #[test]
    fn test_iterator_collects_in_page_order() {
        let session = Arc::new(MemorySession::new((1..=5).map(node).collect()));
        let ids: Vec<i64> = stream(session, 2).collect::<IndexResult<_>>().unwrap();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_close_is_idempotent() {
        let session = Arc::new(MemorySession::new((1..=3).map(node).collect()));
        let mut results = stream(session.clone(), 2);
        assert!(results.has_next().unwrap());

        results.close();
        results.close();
        assert!(results.is_closed());
        assert_eq!(results.state(), StreamState::Exhausted);
        assert!(!results.has_next().unwrap());
        assert_eq!(session.fetch_count(), 1);
        assert_eq!(Arc::strong_count(&session), 1);
    }

    #[test]
    fn test_execution_failure_is_terminal() {
        let session = Arc::new(MemorySession::failing("syntax error"));
        let mut results = stream(session.clone(), 2);

        assert!(matches!(results.next(), Some(Err(IndexError::Execution(_)))));
        assert!(results.next().is_none());
        assert_eq!(session.fetch_count(), 1);
    }

    #[test]
    fn test_mapping_failure_surfaces_per_record() {
        let session = Arc::new(MemorySession::new(vec![NativeRecord::Map(BTreeMap::new()), node(9)]));
        let mut results = stream(session, 10);

        assert!(matches!(results.next(), Some(Err(IndexError::Mapping(_)))));
        assert_eq!(results.next().unwrap().unwrap(), 9);
    }

    #[test]
    fn test_metadata() {
        let session = Arc::new(MemorySession::default());
        let mut results = stream(session, 2);
        results.set_metadata(META_RESULT_COUNT, 12i64);
        results.set_metadata(META_LIMITED, true);

        assert_eq!(results.result_count(), Some(12));
        assert!(results.is_limited());
        assert_eq!(results.metadata("missing"), None);
    }
}
