//! Left factoring.
//!
//! Rewrites the grammar so that no two alternatives of one nonterminal
//! share a common leading symbol. Shared prefixes move into fresh suffix
//! nonterminals, recursively, until a fixed point is reached.

use std::collections::VecDeque;

use crate::diagnostic::TransformError;
use crate::grammar::{fresh_name, Body, Grammar, Provenance};
use crate::symbol::Symbol;

/// Step bound proportional to grammar size. Factoring of sensible grammars
/// converges long before this; pathological ones hit the bound instead of
/// looping.
fn default_bound(grammar: &Grammar) -> usize {
    8 * grammar.num_body_symbols() + 64
}

/// Left-factors the grammar with the default step bound.
pub fn left_factor(grammar: &Grammar) -> Result<(Grammar, Provenance), TransformError> {
    left_factor_bounded(grammar, default_bound(grammar))
}

/// Left-factors the grammar, giving up with
/// [`TransformError::NonTerminatingFactorization`] after `bound` factoring
/// steps.
pub fn left_factor_bounded(
    grammar: &Grammar,
    bound: usize,
) -> Result<(Grammar, Provenance), TransformError> {
    let mut nonterminals: Vec<String> = grammar.nonterminals().map(String::from).collect();
    let mut alternatives: Vec<Vec<Body>> = nonterminals
        .iter()
        .map(|name| grammar.alternatives(name).to_vec())
        .collect();
    let mut used = grammar.declared_names();
    let mut provenance = Provenance::new();
    let mut steps = 0usize;

    let mut worklist: VecDeque<usize> = (0..nonterminals.len()).collect();
    while let Some(i) = worklist.pop_front() {
        loop {
            let group = match shared_prefix_group(&alternatives[i]) {
                Some(group) => group,
                None => break,
            };
            steps += 1;
            if steps > bound {
                return Err(TransformError::NonTerminatingFactorization {
                    nonterminal: nonterminals[i].clone(),
                    bound,
                });
            }

            let prefix_len = longest_common_prefix(&alternatives[i], &group);
            let origin = nonterminals[i].clone();
            let fresh = fresh_name(&origin, &mut used);
            provenance.record(fresh.clone(), origin.clone());
            log::debug!(
                "factoring {} alternatives of {} with shared prefix of length {} into {}",
                group.len(),
                origin,
                prefix_len,
                fresh
            );

            // Suffixes become the fresh nonterminal's alternatives; an
            // empty suffix becomes an epsilon alternative.
            let suffixes: Vec<Body> = group
                .iter()
                .map(|&k| alternatives[i][k][prefix_len..].to_vec())
                .collect();

            let mut factored = alternatives[i][group[0]][..prefix_len].to_vec();
            factored.push(Symbol::NonTerminal(fresh.clone()));

            let mut rewritten = Vec::with_capacity(alternatives[i].len());
            for (k, body) in alternatives[i].drain(..).enumerate() {
                if k == group[0] {
                    rewritten.push(factored.clone());
                } else if !group.contains(&k) {
                    rewritten.push(body);
                }
            }
            alternatives[i] = rewritten;

            worklist.push_back(nonterminals.len());
            nonterminals.push(fresh);
            alternatives.push(suffixes);
        }
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

/// Finds the first group of two or more alternatives sharing a leading
/// symbol, in alternative order. Returns their indices.
fn shared_prefix_group(alternatives: &[Body]) -> Option<Vec<usize>> {
    for (i, body) in alternatives.iter().enumerate() {
        let lead = match body.first() {
            Some(sym) => sym,
            None => continue,
        };
        let group: Vec<usize> = alternatives
            .iter()
            .enumerate()
            .filter(|(_, other)| other.first() == Some(lead))
            .map(|(k, _)| k)
            .collect();
        if group.len() >= 2 {
            debug_assert_eq!(group[0], i);
            return Some(group);
        }
    }
    None
}

/// Length of the longest common prefix of the given alternatives.
fn longest_common_prefix(alternatives: &[Body], group: &[usize]) -> usize {
    let first = &alternatives[group[0]];
    let mut len = first.len();
    for &k in &group[1..] {
        let body = &alternatives[k];
        let common = first
            .iter()
            .zip(body.iter())
            .take_while(|(a, b)| a == b)
            .count();
        len = len.min(common);
    }
    debug_assert!(len >= 1);
    len
}
