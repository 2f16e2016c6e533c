//! Diagnostics and the error taxonomy.
//!
//! Every component signals failure through a result value. Analysis steps
//! additionally produce [`Diagnostic`] reports, which are informational and
//! never silently dropped: callers decide whether to auto-remediate or
//! surface them.

use std::fmt;

use thiserror::Error;

use crate::grammar::Production;
use crate::predict::Lookahead;
use crate::symbol::Symbol;

/// A report produced by analysis and normalization steps.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A declared nonterminal with no alternatives.
    DeadNonTerminal {
        /// The dead nonterminal.
        nonterminal: String,
    },
    /// Nonterminals with epsilon productions. Some transformations require
    /// an epsilon-free grammar.
    EpsilonProductions {
        /// Nonterminals that directly produce epsilon.
        nonterminals: Vec<String>,
    },
    /// The full set of nonterminals participating in unit-production
    /// cycles.
    UnitCycle {
        /// All cycle participants, not just one witness.
        participants: Vec<String>,
    },
    /// Direct or indirect left recursion was detected. Reported before
    /// elimination so a caller can choose to eliminate or abort.
    LeftRecursion {
        /// Left-recursive nonterminals, in declaration order.
        nonterminals: Vec<String>,
        /// True when the grammar has epsilon productions, in which case
        /// detection is an under-approximation.
        approximate: bool,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DeadNonTerminal { nonterminal } => {
                write!(f, "nonterminal `{}` has no productions", nonterminal)
            }
            Diagnostic::EpsilonProductions { nonterminals } => {
                write!(
                    f,
                    "epsilon productions at: {}",
                    nonterminals.join(", ")
                )
            }
            Diagnostic::UnitCycle { participants } => {
                write!(
                    f,
                    "unit-production cycle through: {}",
                    participants.join(", ")
                )
            }
            Diagnostic::LeftRecursion {
                nonterminals,
                approximate,
            } => {
                write!(f, "left recursion at: {}", nonterminals.join(", "))?;
                if *approximate {
                    write!(f, " (under-approximation: grammar has epsilon productions)")?;
                }
                Ok(())
            }
        }
    }
}

/// A malformed grammar model was handed to the builder.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GrammarError {
    /// No start symbol was declared.
    #[error("no start symbol declared")]
    MissingStart,
    /// A name was declared both terminal and nonterminal.
    #[error("`{name}` is declared both as a terminal and as a nonterminal")]
    SymbolKindOverlap {
        /// The doubly declared name.
        name: String,
    },
    /// A production body references an undeclared symbol.
    #[error("production for `{head}` references undefined symbol `{symbol}`")]
    UndefinedSymbol {
        /// Head of the offending production.
        head: String,
        /// The undeclared symbol.
        symbol: Symbol,
    },
    /// Epsilon mixed with other symbols in one body.
    #[error("epsilon mixed with other symbols in a production for `{head}`")]
    MisplacedEpsilon {
        /// Head of the offending production.
        head: String,
    },
    /// The same body was given twice for one head.
    #[error("duplicate production: {production}")]
    DuplicateProduction {
        /// The repeated production.
        production: Production,
    },
}

/// A grammar transformation could not be applied.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TransformError {
    /// The transformation requires an epsilon-free grammar.
    #[error("grammar has epsilon productions at: {}", nonterminals.join(", "))]
    EpsilonProductions {
        /// Nonterminals that directly produce epsilon.
        nonterminals: Vec<String>,
    },
    /// A unit-production cycle where a precondition forbids it.
    #[error("unit-production cycle through: {}", participants.join(", "))]
    CyclicProductions {
        /// All cycle participants.
        participants: Vec<String>,
    },
    /// Left factoring did not reach a fixed point within its bound.
    #[error("left factoring of `{nonterminal}` did not converge within {bound} steps")]
    NonTerminatingFactorization {
        /// The nonterminal being factored when the bound was hit.
        nonterminal: String,
        /// The step bound in effect.
        bound: usize,
    },
}

/// The grammar is not LL(1): a prediction-table cell would receive two
/// different productions. There is no silent tie-break.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("not LL(1): on ({nonterminal}, {lookahead}), both `{existing}` and `{competing}` apply")]
pub struct Ll1Conflict {
    /// The conflicted nonterminal.
    pub nonterminal: String,
    /// The lookahead triggering the conflict.
    pub lookahead: Lookahead,
    /// The production already in the cell.
    pub existing: Production,
    /// The production that collided with it.
    pub competing: Production,
}

/// The parser rejected the input. Only the first failure is reported;
/// there is no recovery or resynchronization.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    /// The predicted terminal did not match the input.
    #[error("unexpected token at position {position}: expected `{expected}`, found `{found}`")]
    UnexpectedToken {
        /// The terminal the parser predicted.
        expected: String,
        /// The actual token, or end of input.
        found: Lookahead,
        /// Position of the mismatch.
        position: usize,
    },
    /// The derivation completed with input left over.
    #[error("trailing input at position {position}")]
    TrailingInput {
        /// Position of the first unconsumed token.
        position: usize,
    },
    /// No prediction-table entry for the current nonterminal and token.
    #[error("no production for `{nonterminal}` applies to `{found}` at position {position}")]
    NoApplicableProduction {
        /// The stuck nonterminal.
        nonterminal: String,
        /// The offending token, or end of input.
        found: Lookahead,
        /// Position of the offending token.
        position: usize,
        /// Lookaheads for which a production does exist.
        expected: Vec<Lookahead>,
    },
    /// The cap on expansions without consuming input was hit; the table
    /// was likely built from a grammar that violates the preconditions.
    #[error("expansion limit exceeded while expanding `{nonterminal}` at position {position}")]
    ExpansionLimitExceeded {
        /// The nonterminal being expanded when the cap was hit.
        nonterminal: String,
        /// Position at which expansion stopped consuming input.
        position: usize,
    },
}
