//! FIRST sets.

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// The FIRST set of a nonterminal or of a symbol string: the terminals
/// that can begin a derived string, and whether the empty string can be
/// derived.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FirstSet {
    /// Terminals that can begin a derivation.
    pub terminals: BTreeSet<String>,
    /// Whether epsilon belongs to the set.
    pub has_empty: bool,
}

impl FirstSet {
    fn len(&self) -> usize {
        self.terminals.len() + self.has_empty as usize
    }
}

/// Collector of FIRST sets, one per nonterminal.
pub struct FirstSets {
    map: BTreeMap<String, FirstSet>,
}

impl FirstSets {
    /// Computes all FIRST sets of the grammar by worklist iteration: each
    /// production's body contributes the FIRST set of its symbol string to
    /// its head, until no set grows.
    pub fn new(grammar: &Grammar) -> Self {
        let mut this = FirstSets {
            map: grammar
                .nonterminals()
                .map(|name| (name.to_string(), FirstSet::default()))
                .collect(),
        };

        let mut changed = true;
        while changed {
            changed = false;
            for prod in grammar.productions() {
                let from_body = this.first_of_string(prod.body);
                if let Some(set) = this.map.get_mut(prod.head) {
                    let before = set.len();
                    set.terminals.extend(from_body.terminals);
                    set.has_empty |= from_body.has_empty;
                    changed |= set.len() != before;
                }
            }
        }
        this
    }

    /// Returns the FIRST set of a nonterminal.
    pub fn first(&self, nonterminal: &str) -> Option<&FirstSet> {
        self.map.get(nonterminal)
    }

    /// Calculates the FIRST set of a string of symbols: FIRST of the first
    /// symbol, extended with FIRST of the remainder while the leading
    /// symbols are nullable; epsilon belongs iff the whole string is
    /// nullable.
    pub fn first_of_string(&self, body: &[Symbol]) -> FirstSet {
        let mut out = FirstSet::default();
        for sym in body {
            match sym {
                Symbol::Terminal(name) => {
                    out.terminals.insert(name.clone());
                    return out;
                }
                Symbol::NonTerminal(name) => match self.map.get(name) {
                    Some(set) => {
                        out.terminals.extend(set.terminals.iter().cloned());
                        if !set.has_empty {
                            return out;
                        }
                    }
                    // A nonterminal with no entry derives nothing.
                    None => return out,
                },
                Symbol::Epsilon => {}
            }
        }
        out.has_empty = true;
        out
    }
}
