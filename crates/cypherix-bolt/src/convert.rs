//! Conversions between cypherix values and Bolt types.

use std::collections::BTreeMap;

use cypherix_core::cypher::ENTITY;
use cypherix_core::{NativeNode, NativeRecord, NativeRelationship, Parameters, Value};
use neo4rs::{BoltNull, BoltType, Node, Query, Relation, Row};
use tracing::warn;

use crate::error::{BoltError, BoltResult};

/// Column the count statement projects.
pub const COUNT_COLUMN: &str = "count";

pub fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Boolean(b) => BoltType::from(*b),
        Value::Integer(i) => BoltType::from(*i),
        Value::Float(x) => BoltType::from(*x),
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Date(at) => BoltType::from(at.timestamp_millis()),
        Value::List(items) => BoltType::from(items.iter().map(to_bolt).collect::<Vec<BoltType>>()),
    }
}

/// Statement with every parameter bound.
pub fn to_query(statement: &str, parameters: &Parameters) -> Query {
    parameters
        .iter()
        .fold(Query::new(statement.to_string()), |query, (name, value)| {
            query.param(name, to_bolt(value))
        })
}

/// Property value read back as JSON. Shapes the query layer has no variant
/// for are kept as their JSON text.
pub fn from_json(json: serde_json::Value) -> Value {
    match serde_json::from_value::<Value>(json.clone()) {
        Ok(value) => value,
        Err(_) => Value::String(json.to_string()),
    }
}

fn properties(keys: Vec<&str>, read: impl Fn(&str) -> BoltResult<serde_json::Value>) -> BTreeMap<String, Value> {
    let mut properties = BTreeMap::new();
    for key in keys {
        match read(key) {
            Ok(json) => {
                properties.insert(key.to_string(), from_json(json));
            }
            Err(err) => warn!(key, %err, "Skipping unreadable property"),
        }
    }
    properties
}

pub fn node_record(node: &Node) -> NativeNode {
    NativeNode {
        id: node.id(),
        labels: node.labels().into_iter().map(str::to_string).collect(),
        properties: properties(node.keys(), |key| {
            node.get::<serde_json::Value>(key).map_err(|e| BoltError::column(key, e))
        }),
    }
}

pub fn relationship_record(rel: &Relation) -> NativeRelationship {
    NativeRelationship {
        id: rel.id(),
        rel_type: rel.typ().to_string(),
        start_id: rel.start_node_id(),
        end_id: rel.end_node_id(),
        properties: properties(rel.keys(), |key| {
            rel.get::<serde_json::Value>(key).map_err(|e| BoltError::column(key, e))
        }),
    }
}

/// Read the entity column of a fetch row.
pub fn row_record(row: &Row) -> BoltResult<NativeRecord> {
    if let Ok(node) = row.get::<Node>(ENTITY) {
        return Ok(NativeRecord::Node(node_record(&node)));
    }
    if let Ok(rel) = row.get::<Relation>(ENTITY) {
        return Ok(NativeRecord::Relationship(relationship_record(&rel)));
    }
    Err(BoltError::UnsupportedRow(ENTITY.to_string()))
}

pub fn row_count(row: &Row) -> BoltResult<u64> {
    let count: i64 = row.get(COUNT_COLUMN).map_err(|e| BoltError::column(COUNT_COLUMN, e))?;
    u64::try_from(count).map_err(|e| BoltError::column(COUNT_COLUMN, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_to_bolt() {
        assert_eq!(to_bolt(&Value::Integer(30)), BoltType::from(30i64));
        assert_eq!(to_bolt(&Value::from("User")), BoltType::from("User"));
        assert_eq!(to_bolt(&Value::Boolean(true)), BoltType::from(true));
        assert!(matches!(to_bolt(&Value::Null), BoltType::Null(_)));
    }

    #[test]
    fn test_list_to_bolt() {
        let bolt = to_bolt(&Value::from(vec!["a", "b"]));
        assert!(matches!(bolt, BoltType::List(_)));
    }

    #[test]
    fn test_json_properties() {
        assert_eq!(from_json(serde_json::json!(42)), Value::Integer(42));
        assert_eq!(from_json(serde_json::json!("x")), Value::from("x"));
        assert_eq!(from_json(serde_json::json!([1.5, null])), Value::List(vec![Value::Float(1.5), Value::Null]));
        assert_eq!(from_json(serde_json::json!({"a": 1})), Value::from(r#"{"a":1}"#));
    }
}
