//! Grammar symbols.

use std::fmt;

/// A symbol occurring in production bodies.
///
/// Terminals and nonterminals are disjoint name spaces; the builder
/// rejects a name declared as both. `Epsilon` is accepted by the builder
/// as the sole element of a body and normalized away, so bodies inside a
/// built [`Grammar`] never contain it.
///
/// [`Grammar`]: crate::grammar::Grammar
#[derive(Clone, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbol {
    /// A terminal symbol.
    Terminal(String),
    /// A nonterminal symbol.
    NonTerminal(String),
    /// The empty string.
    Epsilon,
}

impl Symbol {
    /// Creates a terminal symbol.
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(name.into())
    }

    /// Creates a nonterminal symbol.
    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::NonTerminal(name.into())
    }

    /// The symbol's name; `None` for epsilon.
    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => Some(name),
            Symbol::Epsilon => None,
        }
    }

    /// Checks whether this is a terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Checks whether this is a nonterminal.
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => f.write_str(name),
            Symbol::Epsilon => f.write_str("ε"),
        }
    }
}
