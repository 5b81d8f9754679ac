use tracing::debug;

use super::{check_occur, QueryFactory};
use crate::cypher::CypherQuery;
use crate::predicate::{ComparisonOp, Condition, Predicate};

/// Comparison predicates: operators, null tests and case-insensitive matches.
pub struct ComparisonQueryFactory;

impl QueryFactory for ComparisonQueryFactory {
    fn create_query(&self, _parent: &dyn QueryFactory, predicate: &Predicate, query: &mut CypherQuery, is_first: bool) -> bool {
        let Condition::Comparison { operation, value } = &predicate.condition else {
            return false;
        };
        let Some(name) = predicate.name() else {
            return false;
        };

        let value = value.read_value();
        if value.is_null() && !operation.is_null_test() {
            debug!(name, ?operation, "Comparison without a value, clause dropped");
            return false;
        }

        check_occur(query, predicate.occurrence, is_first);

        let operator = match operation {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "<>",
            ComparisonOp::Greater => ">",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::Less => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::StartsWith => "STARTS WITH",
            ComparisonOp::EndsWith => "ENDS WITH",
            ComparisonOp::Contains => "CONTAINS",
            ComparisonOp::IsNull => {
                query.add_null_test(name, "IS");
                return true;
            }
            ComparisonOp::IsNotNull => {
                query.add_null_test(name, "IS NOT");
                return true;
            }
            // Case-insensitive variants set both flags together.
            ComparisonOp::CaseInsensitiveStartsWith => {
                query.add_parameter(name, "STARTS WITH", value.to_lowercase(), true, true);
                return true;
            }
            ComparisonOp::CaseInsensitiveEndsWith => {
                query.add_parameter(name, "ENDS WITH", value.to_lowercase(), true, true);
                return true;
            }
            ComparisonOp::CaseInsensitiveContains => {
                query.add_parameter(name, "CONTAINS", value.to_lowercase(), true, true);
                return true;
            }
        };

        query.add_simple_parameter(name, operator, value);
        true
    }
}
