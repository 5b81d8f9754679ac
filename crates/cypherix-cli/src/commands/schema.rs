//! Schema bootstrap command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use cypherix_bolt::{initialize_schema, BoltSession};

use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Label to index; repeat for several
    #[arg(short, long = "label", required = true)]
    pub labels: Vec<String>,
}

pub fn execute(args: &SchemaArgs, config: &AppConfig) -> Result<()> {
    println!("{}", "Creating graph indexes...".bold());

    let session = BoltSession::connect(&config.bolt)?;
    let created = initialize_schema(&session, &args.labels)?;

    println!("{} {} index statement(s) applied", "✓".green(), created);
    Ok(())
}
