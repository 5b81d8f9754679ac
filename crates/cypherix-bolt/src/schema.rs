//! Index bootstrap for the attributes every predicate grammar relies on.

use cypherix_core::cypher::quote;
use cypherix_core::factory::{TYPE_KEY, UUID_KEY};
use neo4rs::Query;
use tracing::info;

use crate::error::BoltResult;
use crate::session::BoltSession;

/// `CREATE INDEX ... IF NOT EXISTS` statements for the `id` and `type`
/// attributes of each label.
pub fn schema_statements(labels: &[String]) -> Vec<String> {
    let mut statements = Vec::with_capacity(labels.len() * 2);
    for label in labels {
        let prefix: String = label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        for key in [UUID_KEY, TYPE_KEY] {
            statements.push(format!(
                "CREATE INDEX {prefix}_{key} IF NOT EXISTS FOR (n:{}) ON (n.{})",
                quote(label),
                quote(key)
            ));
        }
    }
    statements
}

/// Create the indexes. Safe to run multiple times.
pub fn initialize_schema(session: &BoltSession, labels: &[String]) -> BoltResult<usize> {
    info!("Initializing graph schema...");

    let statements = schema_statements(labels);
    for statement in &statements {
        session.block_on(session.client().run(Query::new(statement.clone())))?;
    }

    info!("Graph schema initialized ({} statements)", statements.len());
    Ok(statements.len())
}
