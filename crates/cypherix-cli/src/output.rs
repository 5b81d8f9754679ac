//! Terminal output formatting.

use colored::Colorize;
use cypherix_core::{NativeRecord, ResultStream, Value};

use crate::commands::explain::Explanation;

pub fn print_explanation(explanation: &Explanation) {
    println!("{} {}", "Count".bold(), format!("({:?})", explanation.kind).dimmed());
    println!("  {}", explanation.count_statement.cyan());
    println!();
    println!("{}", "Fetch".bold());
    println!("  {}", explanation.fetch_statement.cyan());
    println!(
        "  {}",
        format!("sorted only below {} rows", explanation.sort_threshold).dimmed()
    );

    println!();
    println!("{}", "Parameters".bold());
    if explanation.parameters.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (name, value) in &explanation.parameters {
        println!("  ${} = {}", name.yellow(), format_value(value));
    }

    println!();
    println!("{}: {:016x}", "Hash".bold(), explanation.hash);
}

pub fn print_stream_header<T>(stream: &ResultStream<T>) {
    let count = stream
        .result_count()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string());
    let order = if stream.is_sorted() { "sorted".green() } else { "unsorted".yellow() };

    println!("{} {} ({})", count.bold(), "matching".dimmed(), order);
    println!("{}", "─".repeat(50));
}

pub fn print_record(position: usize, record: &NativeRecord) {
    let position = format!("{position}:").dimmed();
    match record {
        NativeRecord::Node(node) => {
            println!("{} {} {}", position, format!("({})", node.id).cyan(), node.labels.join(":").magenta());
            for (key, value) in &node.properties {
                println!("    {}: {}", key, format_value(value));
            }
        }
        NativeRecord::Relationship(rel) => {
            println!(
                "{} {} ({})-[{}]->({})",
                position,
                format!("[{}]", rel.id).cyan(),
                rel.start_id,
                rel.rel_type.magenta(),
                rel.end_id
            );
            for (key, value) in &rel.properties {
                println!("    {}: {}", key, format_value(value));
            }
        }
        NativeRecord::Map(map) => {
            println!("{}", position);
            for (key, value) in map {
                println!("    {}: {}", key, format_value(value));
            }
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        Value::Null => "null".dimmed().to_string(),
        other => other.to_string(),
    }
}
