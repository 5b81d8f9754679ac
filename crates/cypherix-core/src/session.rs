//! The transactional session seam and native graph records.
//!
//! The query layer never opens or commits transactions. It is handed a
//! [`Session`] and executes rendered statements through it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cypher::Parameters;
use crate::error::{IndexError, IndexResult};
use crate::value::Value;

/// A node as returned by the graph store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativeNode {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, Value>,
}

/// A relationship as returned by the graph store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativeRelationship {
    pub id: i64,
    pub rel_type: String,
    pub start_id: i64,
    pub end_id: i64,
    pub properties: BTreeMap<String, Value>,
}

/// One row of a fetch statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NativeRecord {
    Node(NativeNode),
    Relationship(NativeRelationship),
    Map(BTreeMap<String, Value>),
}

impl NativeRecord {
    pub fn into_node(self) -> IndexResult<NativeNode> {
        match self {
            NativeRecord::Node(node) => Ok(node),
            other => Err(IndexError::mapping(format!("expected a node, got {}", other.kind_name()))),
        }
    }

    pub fn into_relationship(self) -> IndexResult<NativeRelationship> {
        match self {
            NativeRecord::Relationship(rel) => Ok(rel),
            other => Err(IndexError::mapping(format!(
                "expected a relationship, got {}",
                other.kind_name()
            ))),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            NativeRecord::Node(_) => "node",
            NativeRecord::Relationship(_) => "relationship",
            NativeRecord::Map(_) => "map",
        }
    }
}

/// A transactional session against the graph store.
///
/// Both calls block until the store answers. Failures are returned as
/// [`IndexError::Execution`] and are never retried by the query layer.
pub trait Session: Send + Sync {
    /// Run a fetch statement and return its rows.
    fn execute(&self, statement: &str, parameters: &Parameters) -> IndexResult<Vec<NativeRecord>>;

    /// Run a count statement and return the single `count` value.
    fn count(&self, statement: &str, parameters: &Parameters) -> IndexResult<u64>;
}
