//! Predicate trees: the search conditions handed in by the ORM layer.
//!
//! A predicate is plain data. Each [`PredicateKind`] is translated by exactly
//! one factory in [`crate::factory`].
//!
//! Predicates serialize as tagged JSON:
//!
//! ```json
//! { "kind": "group", "combinator": "and", "children": [
//!     { "kind": "comparison", "name": "age", "operation": "greater", "value": 30 },
//!     { "kind": "not_empty", "name": "email", "occurrence": "must_not" }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// How a predicate combines with its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    #[default]
    Must,
    Should,
    MustNot,
}

/// Comparison operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    IsNull,
    IsNotNull,
    StartsWith,
    EndsWith,
    Contains,
    CaseInsensitiveStartsWith,
    CaseInsensitiveEndsWith,
    CaseInsensitiveContains,
}

impl ComparisonOp {
    /// `isNull` and `isNotNull` test presence and never bind a value.
    pub fn is_null_test(&self) -> bool {
        matches!(self, ComparisonOp::IsNull | ComparisonOp::IsNotNull)
    }
}

/// Boolean combinator of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    pub fn keyword(&self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

/// Direction of a relationship predicate, seen from the matched entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
    Both,
}

/// How the sort key is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    #[default]
    Lexical,
    Numeric,
}

/// Sort order requested on the root predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub sort_type: SortType,
    #[serde(default)]
    pub descending: bool,
}

fn default_inclusive() -> bool {
    true
}

/// The kind-specific payload of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Comparison {
        operation: ComparisonOp,
        #[serde(default)]
        value: Value,
    },
    Range {
        #[serde(default)]
        start: Value,
        #[serde(default)]
        end: Value,
        #[serde(default = "default_inclusive")]
        include_start: bool,
        #[serde(default = "default_inclusive")]
        include_end: bool,
    },
    Fulltext {
        #[serde(default)]
        value: Value,
    },
    Exact {
        #[serde(default)]
        value: Value,
    },
    /// Distance search around a point, in meters.
    Spatial {
        latitude: f64,
        longitude: f64,
        distance: f64,
    },
    Array {
        #[serde(default)]
        value: Value,
    },
    Type {
        type_name: String,
    },
    Uuid {
        uuid: String,
    },
    Relationship {
        rel_type: String,
        #[serde(default)]
        direction: Direction,
        /// Uuid of the node on the other end, if constrained.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        related: Option<String>,
    },
    NotEmpty,
    Empty,
    Group {
        #[serde(default)]
        combinator: Combinator,
        #[serde(default)]
        children: Vec<Predicate>,
    },
}

/// Tag used to dispatch a predicate to its factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    Comparison,
    Range,
    Fulltext,
    Exact,
    Spatial,
    Array,
    Type,
    Uuid,
    Relationship,
    NotEmpty,
    Empty,
    Group,
}

impl PredicateKind {
    pub const ALL: [PredicateKind; 12] = [
        PredicateKind::Comparison,
        PredicateKind::Range,
        PredicateKind::Fulltext,
        PredicateKind::Exact,
        PredicateKind::Spatial,
        PredicateKind::Array,
        PredicateKind::Type,
        PredicateKind::Uuid,
        PredicateKind::Relationship,
        PredicateKind::NotEmpty,
        PredicateKind::Empty,
        PredicateKind::Group,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`PredicateKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// A single search condition or a boolean group of conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub occurrence: Occurrence,
    #[serde(flatten)]
    pub condition: Condition,
    /// Only honoured on the root predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl Predicate {
    fn new(name: Option<String>, condition: Condition) -> Self {
        Self {
            name,
            occurrence: Occurrence::Must,
            condition,
            sort: None,
        }
    }

    pub fn comparison(name: impl Into<String>, operation: ComparisonOp, value: impl Into<Value>) -> Self {
        Self::new(
            Some(name.into()),
            Condition::Comparison {
                operation,
                value: value.into(),
            },
        )
    }

    /// Null test; `operation` should be `IsNull` or `IsNotNull`.
    pub fn null_test(name: impl Into<String>, operation: ComparisonOp) -> Self {
        Self::comparison(name, operation, Value::Null)
    }

    /// Inclusive range; pass `Value::Null` for an open end.
    pub fn range(name: impl Into<String>, start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::range_with(name, start, end, true, true)
    }

    pub fn range_with(
        name: impl Into<String>,
        start: impl Into<Value>,
        end: impl Into<Value>,
        include_start: bool,
        include_end: bool,
    ) -> Self {
        Self::new(
            Some(name.into()),
            Condition::Range {
                start: start.into(),
                end: end.into(),
                include_start,
                include_end,
            },
        )
    }

    pub fn fulltext(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Some(name.into()), Condition::Fulltext { value: value.into() })
    }

    pub fn exact(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Some(name.into()), Condition::Exact { value: value.into() })
    }

    pub fn spatial(latitude: f64, longitude: f64, distance: f64) -> Self {
        Self::new(
            None,
            Condition::Spatial {
                latitude,
                longitude,
                distance,
            },
        )
    }

    pub fn array(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Some(name.into()), Condition::Array { value: value.into() })
    }

    pub fn type_of(type_name: impl Into<String>) -> Self {
        Self::new(
            None,
            Condition::Type {
                type_name: type_name.into(),
            },
        )
    }

    pub fn uuid(uuid: impl Into<String>) -> Self {
        Self::new(None, Condition::Uuid { uuid: uuid.into() })
    }

    pub fn relationship(rel_type: impl Into<String>, direction: Direction, related: Option<String>) -> Self {
        Self::new(
            None,
            Condition::Relationship {
                rel_type: rel_type.into(),
                direction,
                related,
            },
        )
    }

    pub fn not_empty(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()), Condition::NotEmpty)
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()), Condition::Empty)
    }

    pub fn group(combinator: Combinator, children: Vec<Predicate>) -> Self {
        Self::new(None, Condition::Group { combinator, children })
    }

    pub fn and(children: Vec<Predicate>) -> Self {
        Self::group(Combinator::And, children)
    }

    pub fn or(children: Vec<Predicate>) -> Self {
        Self::group(Combinator::Or, children)
    }

    pub fn occurs(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn should(self) -> Self {
        self.occurs(Occurrence::Should)
    }

    pub fn must_not(self) -> Self {
        self.occurs(Occurrence::MustNot)
    }

    pub fn sorted_by(mut self, key: impl Into<String>, sort_type: SortType, descending: bool) -> Self {
        self.sort = Some(SortSpec {
            key: key.into(),
            sort_type,
            descending,
        });
        self
    }

    pub fn kind(&self) -> PredicateKind {
        match self.condition {
            Condition::Comparison { .. } => PredicateKind::Comparison,
            Condition::Range { .. } => PredicateKind::Range,
            Condition::Fulltext { .. } => PredicateKind::Fulltext,
            Condition::Exact { .. } => PredicateKind::Exact,
            Condition::Spatial { .. } => PredicateKind::Spatial,
            Condition::Array { .. } => PredicateKind::Array,
            Condition::Type { .. } => PredicateKind::Type,
            Condition::Uuid { .. } => PredicateKind::Uuid,
            Condition::Relationship { .. } => PredicateKind::Relationship,
            Condition::NotEmpty => PredicateKind::NotEmpty,
            Condition::Empty => PredicateKind::Empty,
            Condition::Group { .. } => PredicateKind::Group,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort.as_ref().map(|s| s.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_index_matches_all() {
        for (i, kind) in PredicateKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_parse_group_document() {
        let json = r#"{
            "kind": "group",
            "combinator": "or",
            "sort": { "key": "name", "descending": true },
            "children": [
                { "kind": "comparison", "name": "age", "operation": "greaterOrEqual", "value": 18 },
                { "kind": "not_empty", "name": "email", "occurrence": "must_not" },
                { "kind": "range", "name": "score", "start": 1, "include_end": false }
            ]
        }"#;
        let predicate: Predicate = serde_json::from_str(json).unwrap();

        assert_eq!(predicate.kind(), PredicateKind::Group);
        assert_eq!(predicate.sort_key(), Some("name"));

        let Condition::Group { combinator, children } = &predicate.condition else {
            panic!("expected group");
        };
        assert_eq!(*combinator, Combinator::Or);
        assert_eq!(children.len(), 3);
        assert_eq!(
            children[0],
            Predicate::comparison("age", ComparisonOp::GreaterOrEqual, 18)
        );
        assert_eq!(children[1], Predicate::not_empty("email").must_not());
        assert_eq!(
            children[2],
            Predicate::range_with("score", 1, Value::Null, true, false)
        );
    }

    #[test]
    fn test_serialize_roundtrips_through_json() {
        let predicate = Predicate::and(vec![
            Predicate::type_of("User"),
            Predicate::relationship("AUTHOR", Direction::Incoming, Some("abc".to_string())),
        ])
        .sorted_by("createdDate", SortType::Numeric, false);

        let json = serde_json::to_string(&predicate).unwrap();
        let back: Predicate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, predicate);
    }
}
