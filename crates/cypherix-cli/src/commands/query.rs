//! Run and count predicates against the configured server.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use cypherix_bolt::BoltSession;
use cypherix_core::{CypherIndex, EntityKind, IndexConfig, IndexResult, NativeRecord, RecordMapper, Session};
use tracing::debug;

use super::PredicateArgs;
use crate::config::AppConfig;
use crate::output;

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub predicate: PredicateArgs,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

/// Index that yields the native records unchanged.
pub fn record_index(kind: EntityKind, session: Arc<dyn Session>, config: IndexConfig) -> CypherIndex<NativeRecord> {
    let mapper: Arc<dyn RecordMapper<NativeRecord>> = Arc::new(|record: NativeRecord| -> IndexResult<NativeRecord> { Ok(record) });
    CypherIndex::new(kind, session, mapper, config)
}

fn connect(config: &AppConfig) -> Result<Arc<dyn Session>> {
    debug!(uri = %config.bolt.uri, "Connecting");
    let session: Arc<dyn Session> = Arc::new(BoltSession::connect(&config.bolt)?);
    Ok(session)
}

pub fn execute(args: &QueryArgs, config: &AppConfig) -> Result<()> {
    let predicate = args.predicate.predicate()?;
    let index = record_index(args.predicate.kind(), connect(config)?, config.index.clone());

    let mut stream = index.query(&args.predicate.context(), &predicate)?;
    if !args.json {
        output::print_stream_header(&stream);
    }

    let mut shown = 0usize;
    for record in stream.by_ref() {
        let record = record?;
        shown += 1;
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            output::print_record(shown, &record);
        }
    }
    stream.close();

    if !args.json {
        if shown == 0 {
            println!("{}", "No results.".dimmed());
        } else {
            println!();
            println!("{} result(s)", shown);
        }
    }
    Ok(())
}

pub fn count(args: &PredicateArgs, config: &AppConfig) -> Result<()> {
    let predicate = args.predicate()?;
    let index = record_index(args.kind(), connect(config)?, config.index.clone());

    let query = index.build_query(&args.context(), &predicate);
    let count = index.result_count(&query)?;
    println!("{}", count.to_string().green().bold());
    Ok(())
}
