//! Conversion to Chomsky Normal Form.
//!
//! Ordered, composable rewrite stages, each producing a new grammar:
//! start decoupling, epsilon elimination, unit-production elimination,
//! terminal isolation (TERM) and binarization (BIN). Stage order is
//! significant: epsilon elimination must precede unit elimination, which
//! must precede TERM/BIN.

use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::{nullable_set, unit_derivation_matrix};
use crate::grammar::{dedup_bodies, fresh_name, Body, Grammar, Provenance};
use crate::symbol::Symbol;

/// Introduces a fresh start symbol `S' -> S`, preventing later stages from
/// entangling the start symbol with recursive structure.
pub fn decouple_start(grammar: &Grammar) -> (Grammar, Provenance) {
    let mut used = grammar.declared_names();
    let new_start = fresh_name(grammar.start(), &mut used);
    let mut provenance = Provenance::new();
    provenance.record(new_start.clone(), grammar.start().to_string());

    let mut nonterminals = vec![new_start.clone()];
    nonterminals.extend(grammar.nonterminals().map(String::from));
    let mut alternatives = vec![vec![vec![Symbol::NonTerminal(
        grammar.start().to_string(),
    )]]];
    for name in grammar.nonterminals() {
        alternatives.push(grammar.alternatives(name).to_vec());
    }

    (
        Grammar::from_parts(
            new_start,
            grammar.terminal_names(),
            nonterminals,
            alternatives,
        ),
        provenance,
    )
}

/// Eliminates epsilon productions.
///
/// For every production, enumerates the alternatives obtained by dropping
/// any subset of nullable-nonterminal occurrences from its body. Bodies
/// that become empty are dropped, except that one epsilon alternative is
/// kept at the start symbol if and only if the grammar's language contains
/// the empty string.
pub fn eliminate_epsilon(grammar: &Grammar) -> (Grammar, Provenance) {
    let nullable = nullable_set(grammar);
    let start_nullable = nullable.contains(grammar.start());

    let nonterminals: Vec<String> = grammar.nonterminals().map(String::from).collect();
    let mut alternatives = Vec::with_capacity(nonterminals.len());
    for name in &nonterminals {
        let mut bodies: Vec<Body> = vec![];
        for body in grammar.alternatives(name) {
            for variant in nullable_variants(body, &nullable) {
                if !variant.is_empty() {
                    bodies.push(variant);
                }
            }
        }
        if name == grammar.start() && start_nullable {
            bodies.push(vec![]);
        }
        dedup_bodies(&mut bodies);
        alternatives.push(bodies);
    }

    log::debug!(
        "epsilon elimination: {} nullable nonterminals, start nullable: {}",
        nullable.len(),
        start_nullable
    );
    (
        Grammar::from_parts(
            grammar.start().to_string(),
            grammar.terminal_names(),
            nonterminals,
            alternatives,
        ),
        Provenance::new(),
    )
}

/// All bodies obtained by keeping or dropping each nullable occurrence.
fn nullable_variants(body: &[Symbol], nullable: &BTreeSet<String>) -> Vec<Body> {
    let mut variants: Vec<Body> = vec![vec![]];
    for sym in body {
        let is_nullable = match sym {
            Symbol::NonTerminal(name) => nullable.contains(name),
            _ => false,
        };
        if is_nullable {
            let mut doubled = Vec::with_capacity(variants.len() * 2);
            for variant in variants {
                let mut kept = variant.clone();
                kept.push(sym.clone());
                doubled.push(kept);
                doubled.push(variant);
            }
            variants = doubled;
        } else {
            for variant in &mut variants {
                variant.push(sym.clone());
            }
        }
    }
    variants
}

/// Eliminates unit productions `A -> B` by replacing them with the
/// non-unit productions of every `B` in the unit-derivation closure of `A`.
pub fn eliminate_unit_productions(grammar: &Grammar) -> (Grammar, Provenance) {
    let closure = unit_derivation_matrix(grammar);
    let nonterminals: Vec<String> = grammar.nonterminals().map(String::from).collect();

    let non_unit = |body: &Body| -> bool {
        !matches!(&body[..], [Symbol::NonTerminal(_)])
    };

    let mut alternatives = Vec::with_capacity(nonterminals.len());
    for (i, name) in nonterminals.iter().enumerate() {
        let mut bodies: Vec<Body> = grammar
            .alternatives(name)
            .iter()
            .filter(|body| non_unit(body))
            .cloned()
            .collect();
        for (j, reached) in nonterminals.iter().enumerate() {
            if i != j && closure[(i, j)] {
                bodies.extend(
                    grammar
                        .alternatives(reached)
                        .iter()
                        .filter(|body| non_unit(body))
                        .cloned(),
                );
            }
        }
        dedup_bodies(&mut bodies);
        alternatives.push(bodies);
    }

    (
        Grammar::from_parts(
            grammar.start().to_string(),
            grammar.terminal_names(),
            nonterminals,
            alternatives,
        ),
        Provenance::new(),
    )
}

/// TERM: in every body of length at least two, replaces each terminal with
/// a fresh nonterminal producing exactly that terminal. One fresh
/// nonterminal per distinct terminal.
pub fn isolate_terminals(grammar: &Grammar) -> (Grammar, Provenance) {
    let mut used = grammar.declared_names();
    let mut provenance = Provenance::new();
    let mut proxies: BTreeMap<String, String> = BTreeMap::new();

    let mut nonterminals: Vec<String> = grammar.nonterminals().map(String::from).collect();
    let mut alternatives: Vec<Vec<Body>> = Vec::with_capacity(nonterminals.len());
    for name in &nonterminals {
        let bodies = grammar
            .alternatives(name)
            .iter()
            .map(|body| {
                if body.len() < 2 {
                    return body.clone();
                }
                body.iter()
                    .map(|sym| match sym {
                        Symbol::Terminal(t) => {
                            let proxy = proxies.entry(t.clone()).or_insert_with(|| {
                                let fresh = fresh_name(t, &mut used);
                                provenance.record(fresh.clone(), t.clone());
                                fresh
                            });
                            Symbol::NonTerminal(proxy.clone())
                        }
                        other => other.clone(),
                    })
                    .collect()
            })
            .collect();
        alternatives.push(bodies);
    }

    for (terminal, proxy) in proxies {
        nonterminals.push(proxy);
        alternatives.push(vec![vec![Symbol::Terminal(terminal)]]);
    }

    (
        Grammar::from_parts(
            grammar.start().to_string(),
            grammar.terminal_names(),
            nonterminals,
            alternatives,
        ),
        provenance,
    )
}

/// BIN: replaces every body of length greater than two with a chain of
/// fresh binary nonterminals.
pub fn binarize(grammar: &Grammar) -> (Grammar, Provenance) {
    let mut used = grammar.declared_names();
    let mut provenance = Provenance::new();

    let mut nonterminals: Vec<String> = grammar.nonterminals().map(String::from).collect();
    let mut alternatives: Vec<Vec<Body>> = nonterminals
        .iter()
        .map(|name| grammar.alternatives(name).to_vec())
        .collect();
    let mut chains: Vec<(String, Body)> = vec![];

    for (i, head) in nonterminals.iter().enumerate() {
        for body_index in 0..alternatives[i].len() {
            if alternatives[i][body_index].len() <= 2 {
                continue;
            }
            let body = alternatives[i][body_index].clone();
            // head -> X1 R1; R1 -> X2 R2; ...; R(n-2) -> X(n-1) Xn
            let mut link_names: Vec<String> = vec![];
            for _ in 0..body.len() - 2 {
                let link = fresh_name(head, &mut used);
                provenance.record(link.clone(), head.clone());
                link_names.push(link);
            }
            alternatives[i][body_index] = vec![
                body[0].clone(),
                Symbol::NonTerminal(link_names[0].clone()),
            ];
            for (k, link) in link_names.iter().enumerate() {
                let next = if k + 1 < link_names.len() {
                    Symbol::NonTerminal(link_names[k + 1].clone())
                } else {
                    body[body.len() - 1].clone()
                };
                chains.push((link.clone(), vec![body[k + 1].clone(), next]));
            }
        }
    }

    for (name, body) in chains {
        nonterminals.push(name);
        alternatives.push(vec![body]);
    }

    (
        Grammar::from_parts(
            grammar.start().to_string(),
            grammar.terminal_names(),
            nonterminals,
            alternatives,
        ),
        provenance,
    )
}

/// Runs all five stages in order and merges their provenance.
pub fn chomsky_normal_form(grammar: &Grammar) -> (Grammar, Provenance) {
    let (grammar, mut provenance) = decouple_start(grammar);
    log::debug!("CNF start decoupling: {} productions", grammar.num_productions());
    let (grammar, _) = eliminate_epsilon(&grammar);
    log::debug!("CNF epsilon elimination: {} productions", grammar.num_productions());
    let (grammar, _) = eliminate_unit_productions(&grammar);
    log::debug!("CNF unit elimination: {} productions", grammar.num_productions());
    let (grammar, term_provenance) = isolate_terminals(&grammar);
    provenance.merge(term_provenance);
    let (grammar, bin_provenance) = binarize(&grammar);
    provenance.merge(bin_provenance);
    log::debug!("CNF final: {} productions", grammar.num_productions());
    (grammar, provenance)
}

/// Checks the CNF shape: every production is `A -> B C` or `A -> a`, plus
/// optionally an epsilon production at the start symbol. A start epsilon
/// production is only admissible while the start symbol occurs in no body.
pub fn is_cnf(grammar: &Grammar) -> bool {
    let start_nullable = grammar
        .alternatives(grammar.start())
        .iter()
        .any(Vec::is_empty);
    grammar.productions().all(|prod| match prod.body {
        [] => prod.head == grammar.start(),
        [Symbol::Terminal(_)] => true,
        [Symbol::NonTerminal(left), Symbol::NonTerminal(right)] => {
            !start_nullable || (left != grammar.start() && right != grammar.start())
        }
        _ => false,
    })
}
