//! Predicate → Cypher fragment translation.
//!
//! Each [`PredicateKind`] has one [`QueryFactory`] that appends its fragment to
//! the [`CypherQuery`] being assembled. The [`FactoryRegistry`] dispatches on
//! the kind tag and is itself a factory, so group factories recurse through it.
//!
//! A kind with no registered factory is logged and skipped: the statement is
//! built without that clause.

mod array;
mod comparison;
mod empty;
mod group;
mod keyword;
mod range;
mod relationship;
mod spatial;
mod type_query;

pub use array::ArrayQueryFactory;
pub use comparison::ComparisonQueryFactory;
pub use empty::{EmptyQueryFactory, NotEmptyQueryFactory};
pub use group::GroupQueryFactory;
pub use keyword::KeywordQueryFactory;
pub use range::RangeQueryFactory;
pub use relationship::RelationshipQueryFactory;
pub use spatial::SpatialQueryFactory;
pub use type_query::{TypeQueryFactory, UuidQueryFactory};

use tracing::warn;

use crate::cypher::CypherQuery;
use crate::predicate::{Combinator, Occurrence, Predicate, PredicateKind};

/// Attribute holding an entity's type name.
pub const TYPE_KEY: &str = "type";

/// Attribute holding an entity's uuid.
pub const UUID_KEY: &str = "id";

/// Translates one predicate into a fragment on `query`.
///
/// `parent` is the registry, for factories that recurse into children.
/// `is_first` is true when no sibling has emitted a fragment yet in the
/// enclosing group; only then is the join keyword omitted. Returns whether a
/// fragment was emitted.
pub trait QueryFactory: Send + Sync {
    fn create_query(&self, parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool;
}

/// Emit the keyword joining a fragment to its preceding sibling.
///
/// `Should` joins with `OR`, `Must` with the enclosing group's combinator and
/// `MustNot` with `AND NOT` (just `NOT` when first).
pub fn check_occur(query: &mut CypherQuery, occurrence: Occurrence, is_first: bool) {
    match occurrence {
        Occurrence::Must => {
            if !is_first {
                match query.current_combinator() {
                    Combinator::And => query.and(),
                    Combinator::Or => query.or(),
                }
            }
        }
        Occurrence::Should => {
            if !is_first {
                query.or();
            }
        }
        Occurrence::MustNot => {
            if !is_first {
                query.and();
            }
            query.not();
        }
    }
}

/// Dispatch table from predicate kind to factory.
pub struct FactoryRegistry {
    factories: [Option<Box<dyn QueryFactory>>; PredicateKind::COUNT],
}

impl FactoryRegistry {
    /// Registry with no factories at all.
    pub fn empty() -> Self {
        Self {
            factories: std::array::from_fn(|_| None),
        }
    }

    pub fn register(&mut self, kind: PredicateKind, factory: impl QueryFactory + 'static) {
        self.factories[kind.index()] = Some(Box::new(factory));
    }

    /// Copy of the default registry minus `kind`.
    pub fn without(mut self, kind: PredicateKind) -> Self {
        self.factories[kind.index()] = None;
        self
    }

    pub fn is_registered(&self, kind: PredicateKind) -> bool {
        self.factories[kind.index()].is_some()
    }

    pub fn factory(&self, kind: PredicateKind) -> Option<&dyn QueryFactory> {
        self.factories[kind.index()].as_deref()
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(PredicateKind::Comparison, ComparisonQueryFactory);
        registry.register(PredicateKind::Range, RangeQueryFactory);
        registry.register(PredicateKind::Fulltext, KeywordQueryFactory);
        registry.register(PredicateKind::Exact, KeywordQueryFactory);
        registry.register(PredicateKind::Spatial, SpatialQueryFactory);
        registry.register(PredicateKind::Array, ArrayQueryFactory);
        registry.register(PredicateKind::Type, TypeQueryFactory);
        registry.register(PredicateKind::Uuid, UuidQueryFactory);
        registry.register(PredicateKind::Relationship, RelationshipQueryFactory);
        registry.register(PredicateKind::NotEmpty, NotEmptyQueryFactory);
        registry.register(PredicateKind::Empty, EmptyQueryFactory);
        registry.register(PredicateKind::Group, GroupQueryFactory);
        registry
    }
}

impl QueryFactory for FactoryRegistry {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let kind = predicate.kind();

        match self.factory(kind) {
            Some(factory) => factory.create_query(self, predicate, query, is_first),
            None => {
                warn!(?kind, name = predicate.name(), "No query factory registered for predicate kind, clause dropped");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::EntityKind;
    use crate::predicate::{ComparisonOp, Direction};
    use crate::value::Value;

    fn render(registry: &FactoryRegistry, predicate: &Predicate) -> (bool, CypherQuery) {
        let mut query = CypherQuery::new(EntityKind::Node, 25);
        let created = registry.create_query(registry, predicate, &mut query, true);
        (created, query)
    }

    fn where_clause(query: &CypherQuery) -> String {
        let statement = query.statement(true, false);
        let start = statement.find(" WHERE ").map(|i| i + 7).unwrap_or(0);
        let end = statement.find(" RETURN ").unwrap_or(statement.len());
        statement[start..end].to_string()
    }

    #[test]
    fn test_single_comparison() {
        let registry = FactoryRegistry::default();
        let (created, query) = render(&registry, &Predicate::comparison("age", ComparisonOp::Greater, 30));

        assert!(created);
        assert_eq!(where_clause(&query), "n.`age` > $age_param");
        assert!(!query.statement(true, true).contains("ORDER BY"));
    }

    #[test]
    fn test_and_group_with_null_test() {
        let registry = FactoryRegistry::default();
        let predicate = Predicate::and(vec![
            Predicate::comparison("type", ComparisonOp::Equal, "User"),
            Predicate::null_test("active", ComparisonOp::IsNotNull),
        ]);
        let (created, query) = render(&registry, &predicate);

        assert!(created);
        assert_eq!(where_clause(&query), "(n.`type` = $type_param AND n.`active` IS NOT NULL)");
        assert_eq!(query.parameters().len(), 1);
    }

    #[test]
    fn test_occurrence_keywords() {
        let registry = FactoryRegistry::default();
        let predicate = Predicate::and(vec![
            Predicate::exact("a", 1),
            Predicate::exact("b", 2).should(),
            Predicate::exact("c", 3).must_not(),
        ]);
        let (_, query) = render(&registry, &predicate);

        assert_eq!(
            where_clause(&query),
            "(n.`a` = $a_param OR n.`b` = $b_param AND NOT n.`c` = $c_param)"
        );
    }

    #[test]
    fn test_or_group_joins_must_children_with_or() {
        let registry = FactoryRegistry::default();
        let predicate = Predicate::and(vec![
            Predicate::type_of("User"),
            Predicate::or(vec![Predicate::exact("name", "a"), Predicate::exact("name", "b")]),
        ]);
        let (_, query) = render(&registry, &predicate);

        assert_eq!(
            where_clause(&query),
            "(n.`type` = $type_param AND (n.`name` = $name_param OR n.`name` = $name_param_1))"
        );
    }

    #[test]
    fn test_first_child_negated() {
        let registry = FactoryRegistry::default();
        let predicate = Predicate::and(vec![Predicate::empty("deleted").must_not(), Predicate::uuid("abc")]);
        let (_, query) = render(&registry, &predicate);

        assert_eq!(where_clause(&query), "(NOT n.`deleted` IS NULL AND n.`id` = $id_param)");
    }

    #[test]
    fn test_unregistered_kind_is_dropped() {
        let registry = FactoryRegistry::default().without(PredicateKind::Spatial);
        assert!(!registry.is_registered(PredicateKind::Spatial));

        let (created, query) = render(&registry, &Predicate::spatial(52.5, 13.4, 1000.0));
        assert!(!created);
        assert_eq!(query.statement(true, false), "MATCH (n) RETURN COUNT(n) AS count");

        // The dropped clause does not leave a dangling keyword behind.
        let predicate = Predicate::and(vec![
            Predicate::spatial(52.5, 13.4, 1000.0),
            Predicate::exact("name", "x"),
        ]);
        let (created, query) = render(&registry, &predicate);
        assert!(created);
        assert_eq!(where_clause(&query), "(n.`name` = $name_param)");
    }

    #[test]
    fn test_group_of_dropped_children_rolls_back() {
        let registry = FactoryRegistry::default().without(PredicateKind::Spatial);
        let predicate = Predicate::and(vec![
            Predicate::exact("name", "x"),
            Predicate::or(vec![Predicate::spatial(1.0, 2.0, 3.0)]),
            Predicate::exact("age", 3),
        ]);
        let (_, query) = render(&registry, &predicate);

        assert_eq!(where_clause(&query), "(n.`name` = $name_param AND n.`age` = $age_param)");
    }

    #[test]
    fn test_empty_group_is_skipped() {
        let registry = FactoryRegistry::default();
        let (created, query) = render(&registry, &Predicate::and(Vec::new()));
        assert!(!created);
        assert!(query.is_empty());
    }

    #[test]
    fn test_fragment_order_follows_insertion() {
        let registry = FactoryRegistry::default();
        let names = ["zeta", "alpha", "mid", "beta"];
        let predicate = Predicate::and(names.iter().map(|n| Predicate::not_empty(*n)).collect());
        let (_, query) = render(&registry, &predicate);

        let clause = where_clause(&query);
        let positions: Vec<usize> = names
            .iter()
            .map(|n| clause.find(&format!("`{n}`")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_tree_hashes_identically() {
        let registry = FactoryRegistry::default();
        let predicate = Predicate::and(vec![
            Predicate::range("age", 18, 65),
            Predicate::fulltext("name", "Ann"),
            Predicate::relationship("MEMBER_OF", Direction::Outgoing, Some("g1".into())),
        ]);
        let (_, a) = render(&registry, &predicate);
        let (_, b) = render(&registry, &predicate);

        assert_eq!(a.hash_code(), b.hash_code());
        let values_a: Vec<&Value> = a.parameters().values().collect();
        let values_b: Vec<&Value> = b.parameters().values().collect();
        assert_eq!(values_a, values_b);
    }
}
