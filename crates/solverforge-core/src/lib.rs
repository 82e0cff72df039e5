//! SolverForge Core - shared vocabulary of the propagation network
//!
//! This crate provides the types every other SolverForge crate speaks:
//! - Score types for representing the aggregate constraint impact
//! - Constraint identity (`ConstraintRef`) and impact direction (`ImpactType`)
//! - The `Fact` trait implemented by every domain object fed to a session

pub mod constraint;
pub mod fact;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use fact::Fact;
pub use score::{
    HardMediumSoftScore, HardSoftScore, ParseableScore, Score, ScoreLevel, ScoreParseError,
    SimpleScore,
};
