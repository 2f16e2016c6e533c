//! Library for analysis and transformations of context-free grammars,
//! with LL(1) prediction-table construction and table-driven predictive
//! parsing.
//!
//! A [`Grammar`] is built once and never mutated; every transformation
//! returns a new grammar plus a [`Provenance`] map for its fresh
//! nonterminals. The typical pipeline runs property analysis, eliminates
//! left recursion, left-factors, and builds a [`PredictionTable`] that a
//! [`Parser`] executes against a token stream; see the `pipeline` module
//! for the fail-fast composition. Conversion to Chomsky Normal Form is an
//! independent exit from the same grammar model.

#![deny(unsafe_code)]
#![deny(
    missing_docs,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![cfg_attr(test, deny(warnings))]
#![cfg_attr(test, allow(missing_docs))]

pub mod analysis;
pub mod cnf;
pub mod diagnostic;
pub mod factor;
pub mod grammar;
pub mod parse;
pub mod pipeline;
pub mod predict;
pub mod recursion;
pub mod symbol;

pub use crate::diagnostic::{
    Diagnostic, GrammarError, Ll1Conflict, ParseError, TransformError,
};
pub use crate::grammar::{Grammar, GrammarBuilder, Production, ProductionRef, Provenance};
pub use crate::parse::{Parser, Token};
pub use crate::pipeline::{build_predictive_parser, PipelineError, PipelineOutput};
pub use crate::predict::{FirstSets, FollowSets, Lookahead, PredictionTable};
pub use crate::symbol::Symbol;
