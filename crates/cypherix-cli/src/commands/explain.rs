//! Render statements without a server.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use cypherix_core::{EntityKind, IndexConfig, MemorySession, Parameters, Predicate, QueryContext};
use serde::Serialize;

use super::query::record_index;
use super::PredicateArgs;
use crate::config::AppConfig;
use crate::output;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub predicate: PredicateArgs,

    /// Print the explanation as JSON
    #[arg(long)]
    pub json: bool,
}

/// Everything the index would send to the server for one predicate.
#[derive(Debug, Serialize)]
pub struct Explanation {
    pub kind: EntityKind,
    pub count_statement: String,
    /// First page; carries `ORDER BY` when the predicate has a sort key.
    pub fetch_statement: String,
    pub parameters: Parameters,
    pub hash: u64,
    /// Rows at or above this count are fetched unsorted.
    pub sort_threshold: u64,
}

pub fn explain(kind: EntityKind, context: &QueryContext, predicate: &Predicate, config: &IndexConfig) -> Explanation {
    let index = record_index(kind, Arc::new(MemorySession::default()), config.clone());
    let query = index.build_query(context, predicate);

    Explanation {
        kind,
        count_statement: query.statement(true, false),
        fetch_statement: query.statement(false, true),
        parameters: query.parameters().clone(),
        hash: query.hash_code(),
        sort_threshold: config.sort_threshold,
    }
}

pub fn execute(args: &ExplainArgs, config: &AppConfig) -> Result<()> {
    let predicate = args.predicate.predicate()?;
    let explanation = explain(args.predicate.kind(), &args.predicate.context(), &predicate, &config.index);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&explanation)?);
    } else {
        output::print_explanation(&explanation);
    }
    Ok(())
}
