use tracing::warn;

use super::{check_occur, QueryFactory, UUID_KEY};
use crate::cypher::{quote, CypherQuery, EntityKind, Part, ENTITY};
use crate::predicate::{Condition, Direction, Predicate};
use crate::value::Value;

/// Existence of a relationship, optionally to a specific node.
///
/// Only meaningful on node statements; on a relationship index the matched
/// entity is itself a relationship and the clause is dropped.
pub struct RelationshipQueryFactory;

impl QueryFactory for RelationshipQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let Condition::Relationship {
            rel_type,
            direction,
            related,
        } = &predicate.condition
        else {
            return false;
        };
        if rel_type.is_empty() {
            return false;
        }
        if query.kind() == EntityKind::Relationship {
            warn!(rel_type = rel_type.as_str(), "Relationship predicate on a relationship index, clause dropped");
            return false;
        }

        check_occur(query, predicate.occurrence, is_first);

        let rel = quote(rel_type);
        let pattern = match direction {
            Direction::Outgoing => format!("({ENTITY})-[:{rel}]->(m)"),
            Direction::Incoming => format!("({ENTITY})<-[:{rel}]-(m)"),
            Direction::Both => format!("({ENTITY})-[:{rel}]-(m)"),
        };

        let parts = match related {
            Some(uuid) => {
                let param = query.bind(UUID_KEY, Value::from(uuid.as_str()));
                vec![
                    Part::Text(format!("EXISTS {{ {pattern} WHERE m.{} = ", quote(UUID_KEY))),
                    Part::Param(param),
                    Part::Text(" }".to_string()),
                ]
            }
            None => vec![Part::Text(format!("EXISTS {{ {pattern} }}"))],
        };

        query.add_composite(parts);
        true
    }
}
