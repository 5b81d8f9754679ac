use super::{check_occur, QueryFactory};
use crate::cypher::{property, CypherQuery, Part};
use crate::predicate::{Condition, Predicate};
use crate::value::Value;

/// Membership in an array property.
///
/// A scalar renders `$v IN n.`key``; a list requires every element to be
/// present.
pub struct ArrayQueryFactory;

impl QueryFactory for ArrayQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let (Condition::Array { value }, Some(name)) = (&predicate.condition, predicate.name()) else {
            return false;
        };

        check_occur(query, predicate.occurrence, is_first);

        if value.is_null() {
            query.add_null_test(name, "IS");
            return true;
        }

        let key = property(name);
        let param = query.bind(name, value.clone());
        let parts = match value {
            Value::List(_) => vec![
                Part::Text("ALL(x IN ".to_string()),
                Part::Param(param),
                Part::Text(format!(" WHERE x IN {key})")),
            ],
            _ => vec![Part::Param(param), Part::Text(format!(" IN {key}"))],
        };

        query.add_composite(parts);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::EntityKind;

    fn statement(predicate: &Predicate) -> String {
        let mut query = CypherQuery::new(EntityKind::Node, 10);
        assert!(ArrayQueryFactory.create_query(&ArrayQueryFactory, predicate, &mut query, true));
        query.statement(true, false)
    }

    #[test]
    fn test_scalar_membership() {
        assert!(statement(&Predicate::array("tags", "rust")).contains("WHERE $tags_param IN n.`tags` RETURN"));
    }

    #[test]
    fn test_list_requires_all() {
        assert!(statement(&Predicate::array("tags", vec!["a", "b"]))
            .contains("WHERE ALL(x IN $tags_param WHERE x IN n.`tags`) RETURN"));
    }
}
