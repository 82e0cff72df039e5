//! Constraint identity and impact direction.
//!
//! A constraint is identified by its `(package, name)` pair; a network
//! rejects two definitions sharing the same pair.

use std::fmt;

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use solverforge_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("roster", "Unassigned shift");
/// assert_eq!(cr.full_name(), "roster/Unassigned shift");
///
/// let bare = ConstraintRef::new("", "Overtime");
/// assert_eq!(bare.full_name(), "Overtime");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintRef {
    /// Package/module containing the constraint.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    /// Creates a new constraint reference.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Returns the fully qualified name.
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }
}

impl fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}/{}", self.package, self.name)
        }
    }
}

/// Direction in which a constraint match moves the score.
///
/// # Example
///
/// ```
/// use solverforge_core::ImpactType;
///
/// assert_eq!(ImpactType::Penalty.sign(), -1);
/// assert_eq!(ImpactType::Reward.sign(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactType {
    /// Penalize (subtract from score).
    Penalty,
    /// Reward (add to score).
    Reward,
}

impl ImpactType {
    /// Returns `-1` for penalties and `+1` for rewards.
    #[inline]
    pub const fn sign(self) -> i64 {
        match self {
            ImpactType::Penalty => -1,
            ImpactType::Reward => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_ref_display_matches_full_name() {
        let cr = ConstraintRef::new("roster", "Overlap");
        assert_eq!(cr.to_string(), cr.full_name());
        assert_eq!(ConstraintRef::new("", "Overlap").to_string(), "Overlap");
    }

    #[test]
    fn test_constraint_ref_identity() {
        let a = ConstraintRef::new("roster", "Overlap");
        let b = ConstraintRef::new("other", "Overlap");
        assert_ne!(a, b);
        assert_eq!(a, ConstraintRef::new("roster", "Overlap"));
    }

    #[test]
    fn test_impact_sign() {
        assert_eq!(ImpactType::Penalty.sign(), -1);
        assert_eq!(ImpactType::Reward.sign(), 1);
    }
}
