//! Error types for network construction and session operations.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised while building a blueprint or mutating a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Two definitions share the same `(package, name)` identity.
    #[error("Duplicate constraint: {0}")]
    DuplicateConstraint(String),

    /// A stream does not start with a source operation.
    #[error("Constraint {constraint} does not start with for_each")]
    MissingSource { constraint: String },

    /// A source operation appears after the start of a stream.
    #[error("Constraint {constraint}: for_each at position {position} may only start a stream")]
    MisplacedSource { constraint: String, position: usize },

    /// A stream ends without penalize/reward.
    #[error("Constraint {constraint} has no terminal penalize/reward")]
    MissingTerminal { constraint: String },

    /// A joiner's left and right key functions produce different kinds.
    #[error(
        "Constraint {constraint}: joiner {joiner} compares {left:?} keys with {right:?} keys"
    )]
    IncompatibleJoinerKeys {
        constraint: String,
        joiner: usize,
        left: ValueKind,
        right: ValueKind,
    },

    /// An ordering joiner extracts keys without a meaningful order.
    #[error("Constraint {constraint}: ordering joiner {joiner} cannot range over {kind:?} keys")]
    UnorderedJoinerKey {
        constraint: String,
        joiner: usize,
        kind: ValueKind,
    },

    /// A tuple would carry more than four elements.
    #[error("Constraint {constraint}: tuple cardinality {cardinality} exceeds 4")]
    CardinalityExceeded {
        constraint: String,
        cardinality: usize,
    },

    /// A group-by declares neither keys nor collectors.
    #[error("Constraint {constraint}: group_by needs at least one key or collector")]
    EmptyGroupBy { constraint: String },

    /// A fact with this id is already live.
    #[error("Fact {id} is already inserted")]
    DuplicateFact { id: String },

    /// No live fact has this id.
    #[error("Fact {id} is not known to the session")]
    UnknownFact { id: String },

    /// The incremental score diverged from a from-scratch evaluation.
    #[error(
        "Score corruption in {constraint}: incremental {incremental}, recomputed {expected}"
    )]
    ScoreCorruption {
        constraint: String,
        incremental: String,
        expected: String,
    },

    /// A previous propagation was interrupted; the session must be rebuilt.
    #[error("Session is corrupted by an interrupted propagation")]
    Corrupted,
}

/// Result type alias for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
