//! SimpleScore - Single-level score implementation

level_score! {
    /// A simple score with a single integer value.
    ///
    /// Useful when every constraint shares one priority.
    ///
    /// # Examples
    ///
    /// ```
    /// use solverforge_core::{SimpleScore, Score};
    ///
    /// let score1 = SimpleScore::of(-5);
    /// let score2 = SimpleScore::of(-3);
    ///
    /// assert!(score2 > score1);
    /// assert!(!score1.is_feasible());
    /// assert_eq!(score1.to_string(), "-5");
    /// ```
    SimpleScore {
        score => "" as Soft,
    }
    feasible: score
}

impl SimpleScore {
    /// A score of 1, the usual penalty weight.
    pub const ONE: SimpleScore = SimpleScore::of(1);
}

impl From<i64> for SimpleScore {
    fn from(score: i64) -> Self {
        SimpleScore::of(score)
    }
}
