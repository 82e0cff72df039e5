//! Tests for score types.

use super::*;

mod simple_score {
    use super::*;

    #[test]
    fn test_feasibility() {
        assert!(SimpleScore::of(0).is_feasible());
        assert!(SimpleScore::of(10).is_feasible());
        assert!(!SimpleScore::of(-1).is_feasible());
    }

    #[test]
    fn test_arithmetic() {
        let s1 = SimpleScore::of(10);
        let s2 = SimpleScore::of(3);

        assert_eq!(s1 + s2, SimpleScore::of(13));
        assert_eq!(s1 - s2, SimpleScore::of(7));
        assert_eq!(-s1, SimpleScore::of(-10));
        assert_eq!(s2.multiply(-4), SimpleScore::of(-12));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(SimpleScore::parse("42").unwrap(), SimpleScore::of(42));
        assert_eq!(SimpleScore::parse(" -10 ").unwrap(), SimpleScore::of(-10));
        assert!(SimpleScore::parse("1/2").is_err());
        assert_eq!(SimpleScore::of(-7).to_string(), "-7");
    }

    #[test]
    fn test_level_numbers() {
        let score = SimpleScore::of(-5);
        assert_eq!(score.to_level_numbers(), vec![-5]);
        assert_eq!(SimpleScore::from_level_numbers(&[-5]), score);
        assert_eq!(SimpleScore::levels_count(), 1);
    }
}

mod hard_soft_score {
    use super::*;

    #[test]
    fn test_hard_dominates_soft() {
        let s1 = HardSoftScore::of(-1, 0);
        let s2 = HardSoftScore::of(0, -1000);
        assert!(s2 > s1);
        assert!(HardSoftScore::of(0, -5) > HardSoftScore::of(0, -10));
    }

    #[test]
    fn test_pointwise_arithmetic() {
        let s1 = HardSoftScore::of(-2, -100);
        let s2 = HardSoftScore::of(-1, -50);

        assert_eq!(s1 + s2, HardSoftScore::of(-3, -150));
        assert_eq!(s1 - s2, HardSoftScore::of(-1, -50));
        assert_eq!((s1 + s2) - s2, s1);
        assert_eq!(HardSoftScore::ONE_HARD.multiply(3), HardSoftScore::of_hard(3));
    }

    #[test]
    fn test_parse_round_trip() {
        let score = HardSoftScore::of(-3, 25);
        assert_eq!(score.to_string(), "-3hard/25soft");
        assert_eq!(HardSoftScore::parse("-3hard/25soft").unwrap(), score);
    }

    #[test]
    fn test_parse_errors() {
        assert!(HardSoftScore::parse("-3hard").is_err());
        assert!(HardSoftScore::parse("-3soft/25hard").is_err());
        assert!(HardSoftScore::parse("1hard/2soft/3soft").is_err());
        assert!(HardSoftScore::parse("xhard/2soft").is_err());
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(HardSoftScore::level_label(0), ScoreLevel::Hard);
        assert_eq!(HardSoftScore::level_label(1), ScoreLevel::Soft);
    }

    #[test]
    #[should_panic(expected = "HardSoftScore has 2 levels")]
    fn test_level_label_out_of_range() {
        HardSoftScore::level_label(2);
    }

    #[test]
    #[should_panic(expected = "requires exactly 2 levels")]
    fn test_from_level_numbers_wrong_length() {
        HardSoftScore::from_level_numbers(&[1, 2, 3]);
    }

    #[test]
    fn test_zero() {
        assert!(HardSoftScore::zero().is_zero());
        assert!(!HardSoftScore::ONE_SOFT.is_zero());
        assert_eq!(HardSoftScore::default(), HardSoftScore::ZERO);
    }
}

mod hard_medium_soft_score {
    use super::*;

    #[test]
    fn test_ordering() {
        let a = HardMediumSoftScore::of(0, -1, 100);
        let b = HardMediumSoftScore::of(0, 0, -100);
        let c = HardMediumSoftScore::of(-1, 10, 10);
        assert!(b > a);
        assert!(a > c);
        assert!(!c.is_feasible());
    }

    #[test]
    fn test_parse_round_trip() {
        let score = HardMediumSoftScore::of(-1, -2, -3);
        assert_eq!(score.to_string(), "-1hard/-2medium/-3soft");
        assert_eq!(HardMediumSoftScore::parse(&score.to_string()).unwrap(), score);
        assert_eq!(
            HardMediumSoftScore::from_level_numbers(&score.to_level_numbers()),
            score
        );
    }
}
