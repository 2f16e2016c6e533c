//! FOLLOW sets.

use std::collections::{BTreeMap, BTreeSet};

use super::{FirstSets, Lookahead};
use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// FOLLOW sets, one per nonterminal, over lookaheads (terminals or the
/// end-of-input marker).
pub struct FollowSets {
    map: BTreeMap<String, BTreeSet<Lookahead>>,
}

impl FollowSets {
    /// Computes all FOLLOW sets of the grammar.
    ///
    /// The end-of-input marker is in FOLLOW(start). For every production
    /// `A -> α B β`, FOLLOW(B) gains FIRST(β) minus epsilon, and gains
    /// FOLLOW(A) when β is nullable. Iterates a reverse scan per body
    /// until no set grows.
    pub fn new(grammar: &Grammar, first_sets: &FirstSets) -> Self {
        let mut this = FollowSets {
            map: grammar
                .nonterminals()
                .map(|name| (name.to_string(), BTreeSet::new()))
                .collect(),
        };
        if let Some(set) = this.map.get_mut(grammar.start()) {
            set.insert(Lookahead::End);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for prod in grammar.productions() {
                // The set of lookaheads that can follow the symbol at the
                // current position; starts as FOLLOW(head) at the end of
                // the body.
                let mut trailer = this
                    .map
                    .get(prod.head)
                    .cloned()
                    .unwrap_or_default();

                for sym in prod.body.iter().rev() {
                    match sym {
                        Symbol::Terminal(name) => {
                            trailer.clear();
                            trailer.insert(Lookahead::Terminal(name.clone()));
                        }
                        Symbol::NonTerminal(name) => {
                            if let Some(followed) = this.map.get_mut(name) {
                                let before = followed.len();
                                followed.extend(trailer.iter().cloned());
                                changed |= followed.len() != before;
                            }
                            if let Some(first) = first_sets.first(name) {
                                if !first.has_empty {
                                    trailer.clear();
                                }
                                trailer.extend(
                                    first
                                        .terminals
                                        .iter()
                                        .cloned()
                                        .map(Lookahead::Terminal),
                                );
                            } else {
                                trailer.clear();
                            }
                        }
                        Symbol::Epsilon => {}
                    }
                }
            }
        }
        this
    }

    /// Returns the FOLLOW set of a nonterminal.
    pub fn follow(&self, nonterminal: &str) -> Option<&BTreeSet<Lookahead>> {
        self.map.get(nonterminal)
    }
}
