//! Grammar property analysis: nullable symbols, unit-production cycles,
//! and left recursion.

use std::collections::BTreeSet;

use bit_matrix::BitMatrix;
use bit_vec::BitVec;

use crate::diagnostic::Diagnostic;
use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// Computes the set of nullable nonterminals.
///
/// A nonterminal is nullable if it has an epsilon body, or a body consisting
/// entirely of nullable nonterminals. Fixed point via a changed flag.
pub fn nullable_set(grammar: &Grammar) -> BTreeSet<String> {
    let n = grammar.num_nonterminals();
    let mut nullable = BitVec::from_elem(n, false);
    let mut changed = true;
    while changed {
        changed = false;
        for (i, nt) in grammar.nonterminals().enumerate() {
            if nullable[i] {
                continue;
            }
            let derives_empty = grammar.alternatives(nt).iter().any(|body| {
                body.iter().all(|sym| match sym {
                    Symbol::NonTerminal(name) => grammar
                        .nonterminal_index(name)
                        .map_or(false, |j| nullable[j]),
                    _ => false,
                })
            });
            if derives_empty {
                nullable.set(i, true);
                changed = true;
            }
        }
    }
    grammar
        .nonterminals()
        .enumerate()
        .filter(|&(i, _)| nullable[i])
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Returns the unit derivation matrix: `A ⇒+ B` through unit productions
/// only. A rule of form `A -> A` is a self-loop, not a cycle, and is
/// excluded.
pub(crate) fn unit_derivation_matrix(grammar: &Grammar) -> BitMatrix {
    let n = grammar.num_nonterminals();
    let mut unit_derivation = BitMatrix::new(n, n);

    for prod in grammar.productions() {
        if let [Symbol::NonTerminal(name)] = prod.body {
            if name != prod.head {
                if let (Some(i), Some(j)) = (
                    grammar.nonterminal_index(prod.head),
                    grammar.nonterminal_index(name),
                ) {
                    unit_derivation.set(i, j, true);
                }
            }
        }
    }

    unit_derivation.transitive_closure();
    unit_derivation
}

/// Provides information about cycles among unit derivations in the grammar.
pub struct Cycles<'a> {
    grammar: &'a Grammar,
    unit_derivation: BitMatrix,
    cycle_free: bool,
}

impl<'a> Cycles<'a> {
    /// Analyzes the grammar's unit-production cycles.
    pub fn new(grammar: &'a Grammar) -> Self {
        let unit_derivation = unit_derivation_matrix(grammar);
        let cycle_free =
            (0..grammar.num_nonterminals()).all(|i| !unit_derivation[(i, i)]);
        Cycles {
            grammar,
            unit_derivation,
            cycle_free,
        }
    }

    /// Checks whether the grammar is cycle-free.
    pub fn cycle_free(&self) -> bool {
        self.cycle_free
    }

    /// The full set of nonterminals participating in any cycle, in
    /// declaration order.
    pub fn participants(&self) -> Vec<&str> {
        self.grammar
            .nonterminals()
            .enumerate()
            .filter(|&(i, _)| self.unit_derivation[(i, i)])
            .map(|(_, name)| name)
            .collect()
    }
}

/// Direct and indirect left-recursion detection.
///
/// Builds the leftmost-nonterminal graph (an edge `A -> B` for every
/// production `A -> B γ`) and takes its transitive closure; `A` is
/// left-recursive iff it reaches itself.
///
/// Detection assumes an epsilon-free grammar. On a grammar with epsilon
/// productions the result is an under-approximation and is flagged as such
/// through [`fn is_approximate`], never silently trusted.
///
/// [`fn is_approximate`]: LeftRecursion::is_approximate
pub struct LeftRecursion {
    recursive: Vec<String>,
    approximate: bool,
}

impl LeftRecursion {
    /// Analyzes the grammar's left recursion.
    pub fn new(grammar: &Grammar) -> Self {
        let n = grammar.num_nonterminals();
        let mut leftmost = BitMatrix::new(n, n);

        for prod in grammar.productions() {
            if let Some(Symbol::NonTerminal(name)) = prod.body.first() {
                if let (Some(i), Some(j)) = (
                    grammar.nonterminal_index(prod.head),
                    grammar.nonterminal_index(name),
                ) {
                    leftmost.set(i, j, true);
                }
            }
        }
        leftmost.transitive_closure();

        let recursive = grammar
            .nonterminals()
            .enumerate()
            .filter(|&(i, _)| leftmost[(i, i)])
            .map(|(_, name)| name.to_string())
            .collect();
        LeftRecursion {
            recursive,
            approximate: grammar.has_epsilon_productions(),
        }
    }

    /// Checks whether any nonterminal is left-recursive.
    pub fn is_left_recursive(&self) -> bool {
        !self.recursive.is_empty()
    }

    /// Left-recursive nonterminals, in declaration order.
    pub fn recursive_nonterminals(&self) -> &[String] {
        &self.recursive
    }

    /// True when the grammar has epsilon productions, making this result
    /// an under-approximation.
    pub fn is_approximate(&self) -> bool {
        self.approximate
    }
}

/// Runs all analyses and collects their reports.
pub fn diagnose(grammar: &Grammar) -> Vec<Diagnostic> {
    let mut out = vec![];

    for nt in grammar.nonterminals() {
        if grammar.alternatives(nt).is_empty() {
            out.push(Diagnostic::DeadNonTerminal {
                nonterminal: nt.to_string(),
            });
        }
    }

    let epsilon: Vec<String> = grammar
        .epsilon_producers()
        .into_iter()
        .map(String::from)
        .collect();
    if !epsilon.is_empty() {
        out.push(Diagnostic::EpsilonProductions {
            nonterminals: epsilon,
        });
    }

    let cycles = Cycles::new(grammar);
    if !cycles.cycle_free() {
        out.push(Diagnostic::UnitCycle {
            participants: cycles.participants().iter().map(|s| s.to_string()).collect(),
        });
    }

    let recursion = LeftRecursion::new(grammar);
    if recursion.is_left_recursive() {
        out.push(Diagnostic::LeftRecursion {
            nonterminals: recursion.recursive_nonterminals().to_vec(),
            approximate: recursion.is_approximate(),
        });
    }

    log::debug!("analysis produced {} diagnostics", out.len());
    out
}
