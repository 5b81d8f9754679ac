//! # cypherix Bolt
//!
//! Runs cypherix statements against a Neo4j-compatible server over Bolt.
//!
//! The driver is async; [`BoltSession`] owns a small tokio runtime and
//! blocks on it so the query layer stays synchronous.

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod schema;
pub mod session;

pub use client::BoltClient;
pub use config::BoltConfig;
pub use error::{BoltError, BoltResult};
pub use schema::initialize_schema;
pub use session::BoltSession;
