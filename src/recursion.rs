//! Left-recursion elimination.
//!
//! Paull's ordering: substitute earlier nonterminals into leading positions,
//! then eliminate direct recursion with a fresh tail nonterminal. The
//! rewrite is language-preserving and, unlike the textbook variant with an
//! epsilon tail, keeps the grammar epsilon-free:
//!
//! ```text
//! A -> A β | α      becomes      A  -> α | α A'
//!                                A' -> β | β A'
//! ```

use std::collections::BTreeMap;

use crate::analysis::Cycles;
use crate::diagnostic::TransformError;
use crate::grammar::{dedup_bodies, fresh_name, Body, Grammar, Provenance};
use crate::symbol::Symbol;

/// Rewrites the grammar to remove all direct and indirect left recursion.
///
/// Preconditions: the grammar must be epsilon-free and free of
/// unit-production cycles. Run epsilon elimination first if needed.
///
/// Fresh tail nonterminals are named after their origin with a `'` suffix
/// and recorded in the returned provenance map.
pub fn eliminate_left_recursion(
    grammar: &Grammar,
) -> Result<(Grammar, Provenance), TransformError> {
    let epsilon = grammar.epsilon_producers();
    if !epsilon.is_empty() {
        return Err(TransformError::EpsilonProductions {
            nonterminals: epsilon.into_iter().map(String::from).collect(),
        });
    }
    let cycles = Cycles::new(grammar);
    if !cycles.cycle_free() {
        return Err(TransformError::CyclicProductions {
            participants: cycles
                .participants()
                .into_iter()
                .map(String::from)
                .collect(),
        });
    }

    let order: Vec<String> = grammar.nonterminals().map(String::from).collect();
    let position: BTreeMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let mut alts: Vec<Vec<Body>> = order
        .iter()
        .map(|name| grammar.alternatives(name).to_vec())
        .collect();
    let mut used = grammar.declared_names();
    let mut provenance = Provenance::new();
    // Fresh tail nonterminals, appended after the original ordering.
    let mut tails: Vec<(String, Vec<Body>)> = vec![];

    for i in 0..order.len() {
        // Substitute alternatives of every earlier nonterminal into leading
        // position. After iteration `j`, no alternative of `A_i` starts
        // with `A_k` for `k <= j`.
        for j in 0..i {
            let current = std::mem::take(&mut alts[i]);
            let mut rewritten = Vec::with_capacity(current.len());
            for body in current {
                let leads_with_j = match body.first() {
                    Some(Symbol::NonTerminal(name)) => position.get(name.as_str()) == Some(&j),
                    _ => false,
                };
                if leads_with_j {
                    for delta in &alts[j] {
                        let mut substituted = delta.clone();
                        substituted.extend_from_slice(&body[1..]);
                        rewritten.push(substituted);
                    }
                } else {
                    rewritten.push(body);
                }
            }
            dedup_bodies(&mut rewritten);
            alts[i] = rewritten;
        }

        // Eliminate direct recursion on `A_i`.
        let current = std::mem::take(&mut alts[i]);
        let mut recursive: Vec<Body> = vec![];
        let mut rest: Vec<Body> = vec![];
        for body in current {
            let self_leading = match body.first() {
                Some(Symbol::NonTerminal(name)) => *name == order[i],
                _ => false,
            };
            if self_leading {
                // `A -> A` contributes nothing to the language and would
                // force an epsilon tail alternative; drop it.
                if body.len() > 1 {
                    recursive.push(body[1..].to_vec());
                }
            } else {
                rest.push(body);
            }
        }

        if recursive.is_empty() {
            alts[i] = rest;
            continue;
        }

        let tail = fresh_name(&order[i], &mut used);
        provenance.record(tail.clone(), order[i].clone());
        log::debug!(
            "eliminating direct left recursion on {} ({} recursive alternatives) via {}",
            order[i],
            recursive.len(),
            tail
        );

        let mut new_alts = Vec::with_capacity(rest.len() * 2);
        for alpha in &rest {
            new_alts.push(alpha.clone());
            let mut with_tail = alpha.clone();
            with_tail.push(Symbol::NonTerminal(tail.clone()));
            new_alts.push(with_tail);
        }
        let mut tail_alts = Vec::with_capacity(recursive.len() * 2);
        for beta in &recursive {
            tail_alts.push(beta.clone());
            let mut with_tail = beta.clone();
            with_tail.push(Symbol::NonTerminal(tail.clone()));
            tail_alts.push(with_tail);
        }
        dedup_bodies(&mut new_alts);
        dedup_bodies(&mut tail_alts);
        alts[i] = new_alts;
        tails.push((tail, tail_alts));
    }

    let mut nonterminals = order;
    let mut alternatives = alts;
    for (name, bodies) in tails {
        nonterminals.push(name);
        alternatives.push(bodies);
    }

    Ok((
        Grammar::from_parts(
            grammar.start().to_string(),
            grammar.terminal_names(),
            nonterminals,
            alternatives,
        ),
        provenance,
    ))
}
