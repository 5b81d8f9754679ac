//! CLI command definitions and handlers.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cypherix_core::{EntityKind, Predicate, QueryContext};

use crate::config::AppConfig;

pub mod explain;
pub mod query;
pub mod schema;

/// Translate search predicates into Cypher and run them
#[derive(Parser)]
#[command(name = "cypherix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./cypherix.toml when present)
    #[arg(short, long, global = true, env = "CYPHERIX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the statements for a predicate without a server
    Explain(explain::ExplainArgs),

    /// Run a predicate and print the matching entities
    Query(query::QueryArgs),

    /// Print the number of entities a predicate matches
    Count(PredicateArgs),

    /// Create the id and type indexes for the given labels
    Schema(schema::SchemaArgs),
}

/// Predicate source and match shape shared by every query command.
#[derive(Args, Debug, Clone)]
pub struct PredicateArgs {
    /// Predicate JSON file, or "-" for stdin
    pub file: PathBuf,

    /// Match relationships instead of nodes
    #[arg(short, long)]
    pub relationships: bool,

    /// Node label, or relationship type with --relationships
    #[arg(short, long)]
    pub label: Option<String>,

    /// Start node label (relationships only)
    #[arg(long)]
    pub source: Option<String>,

    /// End node label (relationships only)
    #[arg(long)]
    pub target: Option<String>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Results to skip
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Rows per page fetch
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl PredicateArgs {
    pub fn kind(&self) -> EntityKind {
        if self.relationships {
            EntityKind::Relationship
        } else {
            EntityKind::Node
        }
    }

    pub fn context(&self) -> QueryContext {
        QueryContext {
            type_label: self.label.clone(),
            source_label: self.source.clone(),
            target_label: self.target.clone(),
            limit: self.limit,
            offset: self.offset,
            page_size: self.page_size,
        }
    }

    pub fn predicate(&self) -> Result<Predicate> {
        load_predicate(&self.file)
    }
}

/// Read a predicate tree from a JSON file, or stdin for "-".
pub fn load_predicate(path: &Path) -> Result<Predicate> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("Failed to read predicate from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    parse_predicate(&text)
}

pub fn parse_predicate(text: &str) -> Result<Predicate> {
    serde_json::from_str(text).context("Invalid predicate JSON")
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Explain(args) => explain::execute(&args, &config),
            Commands::Query(args) => query::execute(&args, &config),
            Commands::Count(args) => query::count(&args, &config),
            Commands::Schema(args) => schema::execute(&args, &config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cypherix_core::{ComparisonOp, PredicateKind};

    #[test]
    fn test_parse_predicate() {
        let predicate = parse_predicate(
            r#"{
                "kind": "group",
                "combinator": "and",
                "children": [
                    { "kind": "comparison", "name": "type", "operation": "equal", "value": "User" },
                    { "kind": "comparison", "name": "active", "operation": "isNotNull", "value": null }
                ],
                "sort": { "key": "name" }
            }"#,
        )
        .unwrap();

        assert_eq!(predicate.kind(), PredicateKind::Group);
        assert_eq!(predicate.sort_key(), Some("name"));
        assert_eq!(
            predicate,
            Predicate::and(vec![
                Predicate::comparison("type", ComparisonOp::Equal, "User"),
                Predicate::null_test("active", ComparisonOp::IsNotNull),
            ])
            .sorted_by("name", cypherix_core::SortType::Lexical, false)
        );
    }

    #[test]
    fn test_invalid_predicate() {
        assert!(parse_predicate(r#"{ "kind": "nope" }"#).is_err());
    }

    #[test]
    fn test_cli_parses_query_args() {
        let cli = Cli::try_parse_from([
            "cypherix", "explain", "p.json", "--relationships", "--label", "AUTHOR", "--source", "User", "--limit", "10",
        ])
        .unwrap();

        let Commands::Explain(args) = cli.command else {
            panic!("expected explain");
        };
        assert_eq!(args.predicate.kind(), EntityKind::Relationship);
        let context = args.predicate.context();
        assert_eq!(context.type_label.as_deref(), Some("AUTHOR"));
        assert_eq!(context.source_label.as_deref(), Some("User"));
        assert_eq!(context.limit, Some(10));
        assert_eq!(context.offset, 0);
    }
}
