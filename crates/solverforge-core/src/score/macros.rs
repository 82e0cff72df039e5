//! Declarative macro generating field-based score types.
//!
//! Every SolverForge score is a fixed set of named `i64` levels compared
//! lexicographically. `level_score!` generates the struct together with its
//! constructors, accessors, `Score` impl, ordering, arithmetic, formatting
//! and slash-separated parsing.

/// Generates a level-based score type.
///
/// Fields are listed highest priority first, each with its textual suffix and
/// its `ScoreLevel`. `feasible` names the level whose sign decides
/// feasibility.
///
/// # Usage
/// ```ignore
/// level_score! {
///     /// Doc comment for the type.
///     HardSoftScore {
///         hard => "hard" as Hard,
///         soft => "soft" as Soft,
///     }
///     feasible: hard
/// }
/// ```
macro_rules! level_score {
    (
        $(#[$meta:meta])*
        $type:ident {
            $($field:ident => $suffix:literal as $level:ident),+ $(,)?
        }
        feasible: $feasible:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $type {
            $($field: i64),+
        }

        impl $type {
            /// The zero score.
            pub const ZERO: $type = $type { $($field: 0),+ };

            /// Creates a score from its levels, highest priority first.
            #[inline]
            pub const fn of($($field: i64),+) -> Self {
                $type { $($field),+ }
            }

            $(
                #[doc = concat!("Returns the `", stringify!($field), "` level.")]
                #[inline]
                pub const fn $field(&self) -> i64 {
                    self.$field
                }
            )+

            const LABELS: &'static [$crate::score::ScoreLevel] =
                &[$($crate::score::ScoreLevel::$level),+];
        }

        impl $crate::score::Score for $type {
            #[inline]
            fn is_feasible(&self) -> bool {
                self.$feasible >= 0
            }

            #[inline]
            fn zero() -> Self {
                $type::ZERO
            }

            #[inline]
            fn levels_count() -> usize {
                Self::LABELS.len()
            }

            fn to_level_numbers(&self) -> Vec<i64> {
                vec![$(self.$field),+]
            }

            fn from_level_numbers(levels: &[i64]) -> Self {
                assert_eq!(
                    levels.len(),
                    Self::LABELS.len(),
                    "{} requires exactly {} levels",
                    stringify!($type),
                    Self::LABELS.len()
                );
                let mut levels = levels.iter().copied();
                $(
                    let $field = levels.next().unwrap_or_default();
                )+
                $type::of($($field),+)
            }

            #[inline]
            fn multiply(&self, multiplicand: i64) -> Self {
                $type::of($(self.$field * multiplicand),+)
            }

            fn level_label(index: usize) -> $crate::score::ScoreLevel {
                match Self::LABELS.get(index) {
                    Some(label) => *label,
                    None => panic!(
                        "{} has {} levels, got index {}",
                        stringify!($type),
                        Self::LABELS.len(),
                        index
                    ),
                }
            }
        }

        impl Ord for $type {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                $(
                    match self.$field.cmp(&other.$field) {
                        std::cmp::Ordering::Equal => {}
                        ordering => return ordering,
                    }
                )+
                std::cmp::Ordering::Equal
            }
        }

        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            #[inline]
            fn add(self, other: Self) -> Self {
                $type::of($(self.$field + other.$field),+)
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            #[inline]
            fn sub(self, other: Self) -> Self {
                $type::of($(self.$field - other.$field),+)
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                $type::of($(-self.$field),+)
            }
        }

        impl std::fmt::Debug for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let levels: Vec<String> = vec![$(self.$field.to_string()),+];
                write!(f, "{}({})", stringify!($type), levels.join(", "))
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::score::ParseableScore::to_string_repr(self))
            }
        }

        impl $crate::score::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::ScoreParseError> {
                let s = s.trim();
                let mut parts = s.split('/');
                $(
                    let $field = {
                        let part = parts
                            .next()
                            .map(str::trim)
                            .ok_or_else(|| $crate::score::ScoreParseError {
                                message: format!(
                                    "Invalid {} '{}': missing {} level",
                                    stringify!($type), s, stringify!($field)
                                ),
                            })?;
                        let digits = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::ScoreParseError {
                                message: format!(
                                    "{} part '{}' must end with '{}'",
                                    stringify!($field), part, $suffix
                                ),
                            }
                        })?;
                        digits.parse::<i64>().map_err(|e| $crate::score::ScoreParseError {
                            message: format!(
                                "Invalid {} level '{}': {}",
                                stringify!($field), digits, e
                            ),
                        })?
                    };
                )+
                if parts.next().is_some() {
                    return Err($crate::score::ScoreParseError {
                        message: format!(
                            "Invalid {} '{}': expected {} levels separated by '/'",
                            stringify!($type), s, Self::LABELS.len()
                        ),
                    });
                }
                Ok($type::of($($field),+))
            }

            fn to_string_repr(&self) -> String {
                let parts: Vec<String> = vec![$(format!("{}{}", self.$field, $suffix)),+];
                parts.join("/")
            }
        }
    };
}
