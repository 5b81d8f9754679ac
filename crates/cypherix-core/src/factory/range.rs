use super::{check_occur, QueryFactory};
use crate::cypher::{property, CypherQuery, Part};
use crate::predicate::{Condition, Predicate};

/// Bounded or half-open ranges.
pub struct RangeQueryFactory;

impl QueryFactory for RangeQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let Condition::Range {
            start,
            end,
            include_start,
            include_end,
        } = &predicate.condition
        else {
            return false;
        };
        let Some(name) = predicate.name() else {
            return false;
        };

        let start = (!start.is_null()).then_some(start);
        let end = (!end.is_null()).then_some(end);
        if start.is_none() && end.is_none() {
            return false;
        }

        check_occur(query, predicate.occurrence, is_first);

        let key = property(name);
        let both = start.is_some() && end.is_some();
        let mut parts = Vec::with_capacity(5);

        if both {
            parts.push(Part::Text("(".to_string()));
        }
        if let Some(start) = start {
            let op = if *include_start { ">=" } else { ">" };
            parts.push(Part::Text(format!("{key} {op} ")));
            parts.push(Part::Param(query.bind(name, start.clone())));
        }
        if both {
            parts.push(Part::Text(" AND ".to_string()));
        }
        if let Some(end) = end {
            let op = if *include_end { "<=" } else { "<" };
            parts.push(Part::Text(format!("{key} {op} ")));
            parts.push(Part::Param(query.bind(name, end.clone())));
        }
        if both {
            parts.push(Part::Text(")".to_string()));
        }

        query.add_composite(parts);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::EntityKind;
    use crate::value::Value;

    fn build(predicate: &Predicate) -> Option<CypherQuery> {
        let mut query = CypherQuery::new(EntityKind::Node, 10);
        RangeQueryFactory
            .create_query(&RangeQueryFactory, predicate, &mut query, true)
            .then_some(query)
    }

    #[test]
    fn test_closed_range() {
        let query = build(&Predicate::range("age", 18, 65)).unwrap();
        assert!(query
            .statement(true, false)
            .contains("(n.`age` >= $age_param AND n.`age` <= $age_param_1)"));
        assert_eq!(query.parameters().get("age_param_1"), Some(&Value::Integer(65)));
    }

    #[test]
    fn test_exclusive_half_open_range() {
        let query = build(&Predicate::range_with("age", Value::Null, 10, true, false)).unwrap();
        assert!(query.statement(true, false).contains("WHERE n.`age` < $age_param RETURN"));
    }

    #[test]
    fn test_unbounded_range_is_dropped() {
        assert!(build(&Predicate::range("age", Value::Null, Value::Null)).is_none());
    }
}
