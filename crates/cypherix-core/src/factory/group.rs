use super::{check_occur, QueryFactory};
use crate::cypher::CypherQuery;
use crate::predicate::{Condition, Predicate};

/// Parenthesised boolean group; children resolve through the parent registry.
pub struct GroupQueryFactory;

impl QueryFactory for GroupQueryFactory {
    fn create_query(&self, parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let Condition::Group { combinator, children } = &predicate.condition else {
            return false;
        };
        if children.is_empty() {
            return false;
        }

        let checkpoint = query.checkpoint();

        check_occur(query, predicate.occurrence, is_first);
        query.begin_group(*combinator);

        let mut first_within_group = true;
        for child in children {
            if parent.create_query(parent, child, query, first_within_group) {
                first_within_group = false;
            }
        }

        // Every child was dropped: an empty "()" is not valid Cypher.
        if first_within_group {
            query.rollback(checkpoint);
            return false;
        }

        query.end_group();
        true
    }
}
