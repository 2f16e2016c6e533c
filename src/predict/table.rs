//! LL(1) prediction-table construction.

use std::collections::BTreeMap;

use super::{FirstSets, FollowSets, Lookahead};
use crate::diagnostic::Ll1Conflict;
use crate::grammar::{Grammar, Production};

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct TableKey {
    nonterminal: String,
    lookahead: Lookahead,
}

/// The LL(1) prediction table: a mapping from (nonterminal, lookahead) to
/// the single production to apply.
///
/// Construction assumes the grammar is already left-recursion-free and
/// left-factored; composing those stages is the caller's concern (see the
/// `pipeline` module).
#[derive(Debug)]
pub struct PredictionTable {
    start: String,
    num_nonterminals: usize,
    map: BTreeMap<TableKey, Production>,
}

impl PredictionTable {
    /// Computes FIRST and FOLLOW sets and fills in the table.
    ///
    /// For every production `A -> α`: the cell `(A, a)` is filled for
    /// every terminal `a` in FIRST(α); when α is nullable, the cell
    /// `(A, b)` is filled for every lookahead `b` in FOLLOW(A). A cell
    /// receiving two different productions means the grammar is not
    /// LL(1), reported as [`Ll1Conflict`] — never silently overwritten.
    pub fn build(grammar: &Grammar) -> Result<Self, Ll1Conflict> {
        let first = FirstSets::new(grammar);
        let follow = FollowSets::new(grammar, &first);

        let mut this = PredictionTable {
            start: grammar.start().to_string(),
            num_nonterminals: grammar.num_nonterminals(),
            map: BTreeMap::new(),
        };

        for prod in grammar.productions() {
            let body_first = first.first_of_string(prod.body);
            for terminal in &body_first.terminals {
                this.insert(
                    prod.head,
                    Lookahead::Terminal(terminal.clone()),
                    prod.to_production(),
                )?;
            }
            if body_first.has_empty {
                if let Some(lhs_follow) = follow.follow(prod.head) {
                    for lookahead in lhs_follow {
                        this.insert(prod.head, lookahead.clone(), prod.to_production())?;
                    }
                }
            }
        }

        log::debug!(
            "built prediction table with {} cells for {} nonterminals",
            this.map.len(),
            this.num_nonterminals
        );
        Ok(this)
    }

    fn insert(
        &mut self,
        nonterminal: &str,
        lookahead: Lookahead,
        production: Production,
    ) -> Result<(), Ll1Conflict> {
        let key = TableKey {
            nonterminal: nonterminal.to_string(),
            lookahead,
        };
        match self.map.get(&key) {
            None => {
                self.map.insert(key, production);
                Ok(())
            }
            Some(existing) if *existing == production => Ok(()),
            Some(existing) => Err(Ll1Conflict {
                nonterminal: key.nonterminal,
                lookahead: key.lookahead,
                existing: existing.clone(),
                competing: production,
            }),
        }
    }

    /// Returns the production to apply for a nonterminal and lookahead.
    pub fn get(&self, nonterminal: &str, lookahead: &Lookahead) -> Option<&Production> {
        self.map.get(&TableKey {
            nonterminal: nonterminal.to_string(),
            lookahead: lookahead.clone(),
        })
    }

    /// The start symbol the parser begins with.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Number of nonterminals in the source grammar; feeds the parser's
    /// expansion cap.
    pub fn num_nonterminals(&self) -> usize {
        self.num_nonterminals
    }

    /// The lookaheads for which a production exists for the given
    /// nonterminal. Used for diagnostic quality in parse errors.
    pub fn expected_lookaheads(&self, nonterminal: &str) -> Vec<Lookahead> {
        self.map
            .keys()
            .filter(|key| key.nonterminal == nonterminal)
            .map(|key| key.lookahead.clone())
            .collect()
    }

    /// Iterates over all filled cells.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Lookahead, &Production)> {
        self.map
            .iter()
            .map(|(key, prod)| (key.nonterminal.as_str(), &key.lookahead, prod))
    }
}
