use crate::Error;
use std::fmt;
use std::ops::{Range, RangeFrom, RangeInclusive};

/// How many times a declared expectation is allowed to match, as an inclusive `min..=max`
/// range.
///
/// Use the named constructors in tests:
///
/// ```rust
/// use mockrest::ExpectedCount;
///
/// assert_eq!(ExpectedCount::once().min(), 1);
/// assert_eq!(ExpectedCount::times(3).max(), 3);
/// assert_eq!(ExpectedCount::at_most(2).min(), 1);
/// assert_eq!(ExpectedCount::at_least(2).max(), u64::MAX);
/// ```
///
/// `u64` values and ranges convert as well: `2` is `times(2)`, `1..=3` is `between(1, 3)` and
/// `2..` is "at least two, no upper bound".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExpectedCount {
    min: u64,
    max: u64,
}

impl ExpectedCount {
    /// Build a count from an inclusive range, rejecting `max < min`.
    pub fn new(min: u64, max: u64) -> Result<Self, Error> {
        if max < min {
            return Err(Error::InvalidCount(format!(
                "'max' ({}) must be >= 'min' ({})",
                max, min
            )));
        }
        Ok(Self { min, max })
    }

    /// The expectation must not match at all.
    pub fn never() -> Self {
        Self { min: 0, max: 0 }
    }

    /// Exactly one match.
    pub fn once() -> Self {
        Self { min: 1, max: 1 }
    }

    /// Exactly `count` matches.
    ///
    /// # Panics
    /// If `count` is 0. Use [`ExpectedCount::never`] instead.
    pub fn times(count: u64) -> Self {
        assert!(count >= 1, "'count' must be >= 1");
        Self {
            min: count,
            max: count,
        }
    }

    /// At least `min` matches, no upper bound.
    ///
    /// # Panics
    /// If `min` is 0.
    pub fn at_least(min: u64) -> Self {
        assert!(min >= 1, "'min' must be >= 1");
        Self { min, max: u64::MAX }
    }

    /// Between one and `max` matches.
    ///
    /// # Panics
    /// If `max` is 0.
    pub fn at_most(max: u64) -> Self {
        assert!(max >= 1, "'max' must be >= 1");
        Self { min: 1, max }
    }

    /// Between `min` and `max` matches, both inclusive.
    ///
    /// # Panics
    /// If `max < min`. [`ExpectedCount::new`] is the non-panicking equivalent.
    pub fn between(min: u64, max: u64) -> Self {
        match Self::new(min, max) {
            Ok(count) => count,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }
}

impl fmt::Display for ExpectedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "== {}", self.min)
        } else if self.max == u64::MAX {
            write!(f, "{} <= x", self.min)
        } else {
            write!(f, "{} <= x <= {}", self.min, self.max)
        }
    }
}

impl From<u64> for ExpectedCount {
    fn from(count: u64) -> Self {
        if count == 0 {
            Self::never()
        } else {
            Self::times(count)
        }
    }
}

impl From<RangeInclusive<u64>> for ExpectedCount {
    fn from(r: RangeInclusive<u64>) -> Self {
        Self::between(*r.start(), *r.end())
    }
}

impl From<RangeFrom<u64>> for ExpectedCount {
    fn from(r: RangeFrom<u64>) -> Self {
        Self {
            min: r.start,
            max: u64::MAX,
        }
    }
}

impl From<Range<u64>> for ExpectedCount {
    /// # Panics
    /// If the range is empty.
    fn from(r: Range<u64>) -> Self {
        assert!(r.start < r.end, "Cannot expect a count from an empty range");
        Self::between(r.start, r.end - 1)
    }
}
