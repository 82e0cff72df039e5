//! HardSoftScore - Two-level score with hard and soft constraints

level_score! {
    /// A score with separate hard and soft constraint levels.
    ///
    /// Hard scores are compared first; soft scores only break ties.
    ///
    /// # Examples
    ///
    /// ```
    /// use solverforge_core::{HardSoftScore, ParseableScore};
    ///
    /// let infeasible = HardSoftScore::of(-1, -100);
    /// let feasible = HardSoftScore::of(0, -200);
    /// assert!(feasible > infeasible);
    ///
    /// assert_eq!(feasible.to_string(), "0hard/-200soft");
    /// assert_eq!(HardSoftScore::parse("0hard/-200soft").unwrap(), feasible);
    /// ```
    HardSoftScore {
        hard => "hard" as Hard,
        soft => "soft" as Soft,
    }
    feasible: hard
}

impl HardSoftScore {
    /// One hard point, the usual weight of a hard constraint.
    pub const ONE_HARD: HardSoftScore = HardSoftScore::of(1, 0);

    /// One soft point, the usual weight of a soft constraint.
    pub const ONE_SOFT: HardSoftScore = HardSoftScore::of(0, 1);

    /// Creates a score with only a hard component.
    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        HardSoftScore::of(hard, 0)
    }

    /// Creates a score with only a soft component.
    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        HardSoftScore::of(0, soft)
    }
}
