use super::{check_occur, QueryFactory, TYPE_KEY, UUID_KEY};
use crate::cypher::CypherQuery;
use crate::predicate::{Condition, Predicate};
use crate::value::Value;

/// Matches the entity's type name.
pub struct TypeQueryFactory;

impl QueryFactory for TypeQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let Condition::Type { type_name } = &predicate.condition else {
            return false;
        };

        check_occur(query, predicate.occurrence, is_first);
        query.add_simple_parameter(TYPE_KEY, "=", Value::from(type_name.as_str()));
        true
    }
}

/// Matches the entity's uuid.
pub struct UuidQueryFactory;

impl QueryFactory for UuidQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let Condition::Uuid { uuid } = &predicate.condition else {
            return false;
        };

        check_occur(query, predicate.occurrence, is_first);
        query.add_simple_parameter(UUID_KEY, "=", Value::from(uuid.as_str()));
        true
    }
}
