//! Fail-fast composition of the grammar-to-parser pipeline.
//!
//! The table builder requires a left-recursion-free, left-factored
//! grammar; this module is the caller that enforces those preconditions,
//! auto-remediating left recursion when it is detected.

use thiserror::Error;

use crate::analysis;
use crate::diagnostic::{Diagnostic, Ll1Conflict, TransformError};
use crate::factor::left_factor;
use crate::grammar::{Grammar, Provenance};
use crate::predict::PredictionTable;
use crate::recursion::eliminate_left_recursion;

/// A pipeline stage failed; the remainder of the pipeline was aborted.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum PipelineError {
    /// A grammar rewrite could not be applied.
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// The grammar is not LL(1).
    #[error(transparent)]
    Conflict(#[from] Ll1Conflict),
}

/// Everything the pipeline produced on success.
pub struct PipelineOutput {
    /// The transformed grammar the table was built from.
    pub grammar: Grammar,
    /// Fresh nonterminals introduced along the way, mapped to origins.
    pub provenance: Provenance,
    /// The LL(1) prediction table.
    pub table: PredictionTable,
    /// Diagnostics gathered before transformation; never silently dropped.
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs analysis, left-recursion elimination (when needed), left factoring
/// and table construction, aborting on the first failure.
pub fn build_predictive_parser(grammar: &Grammar) -> Result<PipelineOutput, PipelineError> {
    let diagnostics = analysis::diagnose(grammar);
    for diagnostic in &diagnostics {
        log::debug!("pipeline diagnostic: {}", diagnostic);
    }

    let mut provenance = Provenance::new();
    let mut current = grammar.clone();

    let recursion = analysis::LeftRecursion::new(&current);
    if recursion.is_left_recursive() {
        log::debug!(
            "eliminating left recursion at: {}",
            recursion.recursive_nonterminals().join(", ")
        );
        let (rewritten, stage_provenance) = eliminate_left_recursion(&current)?;
        current = rewritten;
        provenance.merge(stage_provenance);
    }

    let (factored, stage_provenance) = left_factor(&current)?;
    provenance.merge(stage_provenance);

    let table = PredictionTable::build(&factored)?;

    Ok(PipelineOutput {
        grammar: factored,
        provenance,
        table,
        diagnostics,
    })
}
