//! Traversal cost arithmetic.
//!
//! Walls and unknown terrain carry [`Cost::Unreachable`], which behaves like
//! positive infinity: it compares greater than every finite cost and absorbs
//! any addition instead of wrapping.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Serialize, Serializer};

/// Accumulated or per-tile traversal cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cost {
    Finite(u64),
    Unreachable,
}

impl Cost {
    pub const ZERO: Cost = Cost::Finite(0);

    pub fn is_finite(self) -> bool {
        matches!(self, Cost::Finite(_))
    }

    pub fn is_unreachable(self) -> bool {
        matches!(self, Cost::Unreachable)
    }

    /// Finite value, or `None` for [`Cost::Unreachable`].
    pub fn value(self) -> Option<u64> {
        match self {
            Cost::Finite(value) => Some(value),
            Cost::Unreachable => None,
        }
    }

    /// Floating point view used for frontier priorities.
    pub fn as_f64(self) -> f64 {
        match self {
            Cost::Finite(value) => value as f64,
            Cost::Unreachable => f64::INFINITY,
        }
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::ZERO
    }
}

impl From<u64> for Cost {
    fn from(value: u64) -> Self {
        Cost::Finite(value)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        match (self, rhs) {
            (Cost::Finite(a), Cost::Finite(b)) => {
                a.checked_add(b).map_or(Cost::Unreachable, Cost::Finite)
            }
            _ => Cost::Unreachable,
        }
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        *self = *self + rhs;
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cost::Finite(a), Cost::Finite(b)) => a.cmp(b),
            (Cost::Finite(_), Cost::Unreachable) => Ordering::Less,
            (Cost::Unreachable, Cost::Finite(_)) => Ordering::Greater,
            (Cost::Unreachable, Cost::Unreachable) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(value) => write!(f, "{}", value),
            Cost::Unreachable => f.write_str("unreachable"),
        }
    }
}

// Serialised as a plain number, with `null` standing in for unreachable.
impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cost::Finite(value) => serializer.serialize_u64(*value),
            Cost::Unreachable => serializer.serialize_none(),
        }
    }
}
