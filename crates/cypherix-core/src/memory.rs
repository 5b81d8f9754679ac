//! In-memory session serving canned records.
//!
//! [`MemorySession`] does not evaluate predicates. It returns its records
//! sliced by the `SKIP`/`LIMIT` window of each fetch statement and records
//! every statement it sees, which is enough to drive result streams and the
//! index in tests and dry runs.

use parking_lot::Mutex;

use crate::cypher::Parameters;
use crate::error::{IndexError, IndexResult};
use crate::session::{NativeRecord, Session};

/// A statement seen by a [`MemorySession`].
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub statement: String,
    pub parameters: Parameters,
    pub is_count: bool,
}

#[derive(Default)]
pub struct MemorySession {
    records: Vec<NativeRecord>,
    count: Option<u64>,
    failure: Option<String>,
    log: Mutex<Vec<Executed>>,
}

impl MemorySession {
    pub fn new(records: Vec<NativeRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Report `count` from count statements instead of the record total.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Fail every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.log.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.log.lock().iter().filter(|e| !e.is_count).count()
    }

    pub fn count_calls(&self) -> usize {
        self.log.lock().iter().filter(|e| e.is_count).count()
    }

    fn record(&self, statement: &str, parameters: &Parameters, is_count: bool) -> IndexResult<()> {
        self.log.lock().push(Executed {
            statement: statement.to_string(),
            parameters: parameters.clone(),
            is_count,
        });

        match &self.failure {
            Some(message) => Err(IndexError::execution(message.clone())),
            None => Ok(()),
        }
    }
}

impl Session for MemorySession {
    fn execute(&self, statement: &str, parameters: &Parameters) -> IndexResult<Vec<NativeRecord>> {
        self.record(statement, parameters, false)?;

        let (skip, limit) = page_window(statement).unwrap_or((0, self.records.len()));
        Ok(self.records.iter().skip(skip).take(limit).cloned().collect())
    }

    fn count(&self, statement: &str, parameters: &Parameters) -> IndexResult<u64> {
        self.record(statement, parameters, true)?;
        Ok(self.count.unwrap_or(self.records.len() as u64))
    }
}

/// Parse the trailing ` SKIP a LIMIT b` of a fetch statement.
fn page_window(statement: &str) -> Option<(usize, usize)> {
    let (_, tail) = statement.rsplit_once(" SKIP ")?;
    let (skip, limit) = tail.split_once(" LIMIT ")?;
    Some((skip.trim().parse().ok()?, limit.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::NativeNode;
    use std::collections::BTreeMap;

    fn node(id: i64) -> NativeRecord {
        NativeRecord::Node(NativeNode {
            id,
            labels: vec!["User".to_string()],
            properties: BTreeMap::new(),
        })
    }

    #[test]
    fn test_serves_page_window() {
        let session = MemorySession::new((0..5).map(node).collect());
        let rows = session
            .execute("MATCH (n) RETURN DISTINCT n SKIP 3 LIMIT 4", &Parameters::new())
            .unwrap();
        assert_eq!(rows, vec![node(3), node(4)]);
        assert_eq!(session.count("MATCH (n) RETURN COUNT(n) AS count", &Parameters::new()).unwrap(), 5);
        assert_eq!(session.fetch_count(), 1);
        assert_eq!(session.count_calls(), 1);
    }

    #[test]
    fn test_failing_session() {
        let session = MemorySession::failing("connection reset");
        let err = session.count("MATCH (n) RETURN COUNT(n) AS count", &Parameters::new()).unwrap_err();
        assert!(matches!(err, IndexError::Execution(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
