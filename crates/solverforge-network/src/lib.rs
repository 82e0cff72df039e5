//! Incremental constraint scoring over a tuple-propagation network.
//!
//! This crate turns declarative constraint streams into a live dataflow graph:
//! - Streams are declared with [`ConstraintDefinition`] (source, filter, join,
//!   conditional existence, group-by, penalize/reward)
//! - A [`NetworkBlueprint`] validates them once and builds isolated [`Session`]s
//! - Each session keeps its score current as facts are inserted, updated and
//!   retracted, without ever recomputing it from scratch
//!
//! # Architecture
//!
//! Node kinds form a closed enum dispatched by pattern match. Facts and tuples
//! live in arenas addressed by opaque handles, and every node caches the
//! derived values it needs to undo a match, so retraction never re-runs user
//! closures. [`batch`] evaluates the same definitions from scratch and serves
//! as the verification oracle.

// Stream closures are stored as shared trait objects
#![allow(clippy::type_complexity)]

pub mod analysis;
pub mod batch;
mod blueprint;
pub mod error;
pub mod fact_store;
pub mod hierarchy;
mod index;
mod network;
mod node;
mod session;
pub mod stream;
pub mod tuple;
pub mod value;
mod verify;

// ============================================================================
// Network construction
// ============================================================================

pub use blueprint::NetworkBlueprint;
pub use hierarchy::ClassHierarchy;
pub use stream::{group_key, ConstraintDefinition, ExistenceMode, StreamOp};

// ============================================================================
// Runtime
// ============================================================================

pub use error::{NetworkError, Result};
pub use fact_store::{FactHandle, FactStore};
pub use session::Session;
pub use tuple::{TupleId, TupleRef, MAX_CARDINALITY};
pub use value::{IntoValue, Value, ValueKind};

// ============================================================================
// Analysis and verification
// ============================================================================

pub use analysis::{
    ConstraintAnalysis, ConstraintMatch, ConstraintResult, Indictment, ScoreExplanation,
};
pub use verify::verify_incremental;
