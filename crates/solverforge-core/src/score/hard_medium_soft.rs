//! HardMediumSoftScore - Three-level score

level_score! {
    /// A score with hard, medium and soft levels.
    ///
    /// The medium level typically carries "assign as much as possible"
    /// objectives that outrank soft preferences.
    ///
    /// # Examples
    ///
    /// ```
    /// use solverforge_core::{HardMediumSoftScore, Score, ScoreLevel};
    ///
    /// let score = HardMediumSoftScore::of(0, -3, -40);
    /// assert!(score.is_feasible());
    /// assert_eq!(HardMediumSoftScore::level_label(1), ScoreLevel::Medium);
    /// assert_eq!(score.to_string(), "0hard/-3medium/-40soft");
    /// ```
    HardMediumSoftScore {
        hard => "hard" as Hard,
        medium => "medium" as Medium,
        soft => "soft" as Soft,
    }
    feasible: hard
}

impl HardMediumSoftScore {
    /// One hard point.
    pub const ONE_HARD: HardMediumSoftScore = HardMediumSoftScore::of(1, 0, 0);

    /// One medium point.
    pub const ONE_MEDIUM: HardMediumSoftScore = HardMediumSoftScore::of(0, 1, 0);

    /// One soft point.
    pub const ONE_SOFT: HardMediumSoftScore = HardMediumSoftScore::of(0, 0, 1);
}
