use super::{check_occur, QueryFactory};
use crate::cypher::CypherQuery;
use crate::predicate::{Condition, Predicate};
use crate::value::Value;

/// Exact and fulltext matches.
///
/// Exact values compare with `=`. Fulltext strings become a case-insensitive
/// regular expression matching the text anywhere in the property; non-string
/// fulltext values compare exactly. Tokenization is left to the caller.
pub struct KeywordQueryFactory;

impl QueryFactory for KeywordQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let (value, exact) = match &predicate.condition {
            Condition::Exact { value } => (value, true),
            Condition::Fulltext { value } => (value, false),
            _ => return false,
        };
        let Some(name) = predicate.name() else {
            return false;
        };

        check_occur(query, predicate.occurrence, is_first);

        if value.is_null() {
            query.add_null_test(name, "IS");
            return true;
        }

        match (exact, value.as_str()) {
            (false, Some(text)) => {
                let pattern = format!("(?i).*{}.*", escape_regex(text));
                query.add_simple_parameter(name, "=~", Value::String(pattern));
            }
            _ => query.add_simple_parameter(name, "=", value.clone()),
        }

        true
    }
}

fn escape_regex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::EntityKind;

    fn build(predicate: &Predicate) -> CypherQuery {
        let mut query = CypherQuery::new(EntityKind::Node, 10);
        assert!(KeywordQueryFactory.create_query(&KeywordQueryFactory, predicate, &mut query, true));
        query
    }

    #[test]
    fn test_fulltext_string_is_regex() {
        let query = build(&Predicate::fulltext("title", "a.b (draft)"));
        assert!(query.statement(true, false).contains("n.`title` =~ $title_param"));
        assert_eq!(
            query.parameters().get("title_param"),
            Some(&Value::from(r"(?i).*a\.b \(draft\).*"))
        );
    }

    #[test]
    fn test_fulltext_number_is_exact() {
        let query = build(&Predicate::fulltext("count", 4));
        assert!(query.statement(true, false).contains("n.`count` = $count_param"));
    }

    #[test]
    fn test_exact_null() {
        let query = build(&Predicate::exact("title", Value::Null));
        assert!(query.statement(true, false).contains("n.`title` IS NULL"));
        assert!(query.parameters().is_empty());
    }
}
