use super::{check_occur, QueryFactory};
use crate::cypher::CypherQuery;
use crate::predicate::{Condition, Predicate};

/// `n.`key` IS NOT NULL`.
///
/// The operator is never flipped; `MustNot` negates the whole fragment
/// through the join keyword like any other clause.
pub struct NotEmptyQueryFactory;

impl QueryFactory for NotEmptyQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let (Condition::NotEmpty, Some(name)) = (&predicate.condition, predicate.name()) else {
            return false;
        };

        check_occur(query, predicate.occurrence, is_first);

        query.add_null_test(name, "IS NOT");
        true
    }
}

/// `n.`key` IS NULL`.
pub struct EmptyQueryFactory;

impl QueryFactory for EmptyQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let (Condition::Empty, Some(name)) = (&predicate.condition, predicate.name()) else {
            return false;
        };

        check_occur(query, predicate.occurrence, is_first);
        query.add_null_test(name, "IS");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::EntityKind;
    use crate::value::Value;

    #[test]
    fn test_not_empty_negated_by_must_not() {
        let mut query = CypherQuery::new(EntityKind::Node, 10);
        let predicate = Predicate::not_empty("email").must_not();
        assert!(NotEmptyQueryFactory.create_query(&NotEmptyQueryFactory, &predicate, &mut query, true));

        assert_eq!(
            query.statement(true, false),
            "MATCH (n) WHERE NOT n.`email` IS NOT NULL RETURN COUNT(n) AS count"
        );
    }

    #[test]
    fn test_not_empty_must_not_after_sibling() {
        let mut query = CypherQuery::new(EntityKind::Node, 10);
        query.add_simple_parameter("a", "=", Value::Integer(1));
        let predicate = Predicate::not_empty("email").must_not();
        assert!(NotEmptyQueryFactory.create_query(&NotEmptyQueryFactory, &predicate, &mut query, false));

        assert_eq!(
            query.statement(true, false),
            "MATCH (n) WHERE n.`a` = $a_param AND NOT n.`email` IS NOT NULL RETURN COUNT(n) AS count"
        );
    }

    #[test]
    fn test_empty_honours_must_not() {
        let mut query = CypherQuery::new(EntityKind::Node, 10);
        let predicate = Predicate::empty("email").must_not();
        assert!(EmptyQueryFactory.create_query(&EmptyQueryFactory, &predicate, &mut query, true));

        assert_eq!(
            query.statement(true, false),
            "MATCH (n) WHERE NOT n.`email` IS NULL RETURN COUNT(n) AS count"
        );
    }
}
