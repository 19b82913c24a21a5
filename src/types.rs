// src/types.rs

use std::fmt;

/// Which way dependency edges are read when computing the printed order.
///
/// - `Forward`: a dependency comes before its dependents (apply order).
/// - `Reverse`: every edge is flipped first, so dependents are listed before
///   the stacks they depend on (teardown order).
///
/// Execution ignores this and always waits for dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn from_reverse_flag(reverse: bool) -> Self {
        if reverse {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, Direction::Reverse)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("dependency order"),
            Direction::Reverse => f.write_str("reverse dependency order"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_wording() {
        assert_eq!(Direction::from_reverse_flag(false).to_string(), "dependency order");
        assert_eq!(
            Direction::from_reverse_flag(true).to_string(),
            "reverse dependency order"
        );
    }
}
