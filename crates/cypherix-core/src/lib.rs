//! Graph query translation layer.
//!
//! Turns composable search predicates into parameterised Cypher statements,
//! executes them through a transactional [`Session`] and returns lazily paged
//! [`ResultStream`]s. Row counts per statement shape are cached to decide
//! whether sorting a result set is affordable.
//!
//! ```text
//! caller -> CypherIndex -> FactoryRegistry -> CypherQuery
//!        -> Session (count, then pages) -> ResultStream -> RecordMapper
//! ```

pub mod cache;
pub mod config;
pub mod cypher;
pub mod error;
pub mod factory;
pub mod index;
pub mod memory;
pub mod predicate;
pub mod session;
pub mod stream;
pub mod value;

pub use cache::ResultCountCache;
pub use config::IndexConfig;
pub use cypher::{CypherQuery, EntityKind, Parameters};
pub use error::{IndexError, IndexResult};
pub use factory::{FactoryRegistry, QueryFactory};
pub use index::{CypherIndex, QueryContext};
pub use memory::MemorySession;
pub use predicate::{Combinator, ComparisonOp, Condition, Direction, Occurrence, Predicate, PredicateKind, SortSpec, SortType};
pub use session::{NativeNode, NativeRecord, NativeRelationship, Session};
pub use stream::{RecordMapper, ResultStream, StreamState};
pub use value::Value;
