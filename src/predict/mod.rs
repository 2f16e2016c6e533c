//! Prediction: FIRST and FOLLOW set computation and LL(1) table
//! construction.

pub mod first;
pub mod follow;
pub mod table;

use std::fmt;

pub use self::first::{FirstSet, FirstSets};
pub use self::follow::FollowSets;
pub use self::table::PredictionTable;

/// One token of lookahead: a terminal, or the end-of-input marker.
#[derive(Clone, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lookahead {
    /// A terminal at the read position.
    Terminal(String),
    /// The input is exhausted.
    End,
}

impl Lookahead {
    /// Creates a terminal lookahead.
    pub fn terminal(name: impl Into<String>) -> Self {
        Lookahead::Terminal(name.into())
    }
}

impl fmt::Display for Lookahead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookahead::Terminal(name) => f.write_str(name),
            Lookahead::End => f.write_str("$"),
        }
    }
}
