//! Table-driven predictive parsing.

use crate::diagnostic::ParseError;
use crate::grammar::Production;
use crate::predict::{Lookahead, PredictionTable};
use crate::symbol::Symbol;

/// One input token: a terminal identity plus its source position, as
/// supplied by the tokenizer collaborator.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Which terminal this token is.
    pub terminal: String,
    /// Source position, opaque to the parser beyond error reporting.
    pub position: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(terminal: impl Into<String>, position: usize) -> Self {
        Token {
            terminal: terminal.into(),
            position,
        }
    }
}

// An empty stack plays the role of the end-of-input marker.
#[derive(Clone, Debug)]
enum StackEntry {
    Terminal(String),
    NonTerminal(String),
}

/// Table-driven predictive parser.
///
/// Consumes the token sequence strictly left to right with one token of
/// lookahead, producing either a derivation trace (the ordered list of
/// productions applied, a leftmost derivation) or the first failure.
#[derive(Clone, Copy)]
pub struct Parser<'a> {
    table: &'a PredictionTable,
    expansion_limit: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a prediction table.
    pub fn new(table: &'a PredictionTable) -> Self {
        // Expansions at one input position go through epsilon-only chains,
        // bounded by the nonterminal count; the slack covers tables built
        // from grammars that violate the preconditions.
        Parser {
            table,
            expansion_limit: 4 * table.num_nonterminals() + 8,
        }
    }

    /// Overrides the cap on expansions per input position.
    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = limit;
        self
    }

    /// Parses the token sequence, returning the derivation trace on
    /// acceptance or the first failure encountered. No error recovery.
    pub fn parse(&self, tokens: &[Token]) -> Result<Vec<Production>, ParseError> {
        let mut stack = vec![StackEntry::NonTerminal(self.table.start().to_string())];
        let mut pos = 0usize;
        let mut trace: Vec<Production> = vec![];
        let mut expansions_here = 0usize;

        let end_position = |tokens: &[Token]| -> usize {
            tokens.last().map_or(0, |token| token.position + 1)
        };

        while let Some(top) = stack.last() {
            match top.clone() {
                StackEntry::Terminal(expected) => match tokens.get(pos) {
                    Some(token) if token.terminal == expected => {
                        stack.pop();
                        pos += 1;
                        expansions_here = 0;
                    }
                    Some(token) => {
                        return Err(ParseError::UnexpectedToken {
                            expected,
                            found: Lookahead::Terminal(token.terminal.clone()),
                            position: token.position,
                        });
                    }
                    None => {
                        return Err(ParseError::UnexpectedToken {
                            expected,
                            found: Lookahead::End,
                            position: end_position(tokens),
                        });
                    }
                },
                StackEntry::NonTerminal(nonterminal) => {
                    let lookahead = tokens
                        .get(pos)
                        .map_or(Lookahead::End, |token| {
                            Lookahead::Terminal(token.terminal.clone())
                        });
                    let production = match self.table.get(&nonterminal, &lookahead) {
                        Some(production) => production,
                        None => {
                            let position = tokens
                                .get(pos)
                                .map_or_else(|| end_position(tokens), |token| token.position);
                            return Err(ParseError::NoApplicableProduction {
                                expected: self.table.expected_lookaheads(&nonterminal),
                                nonterminal,
                                found: lookahead,
                                position,
                            });
                        }
                    };
                    expansions_here += 1;
                    if expansions_here > self.expansion_limit {
                        let position = tokens
                            .get(pos)
                            .map_or_else(|| end_position(tokens), |token| token.position);
                        return Err(ParseError::ExpansionLimitExceeded {
                            nonterminal,
                            position,
                        });
                    }
                    log::trace!("expanding {} on {}: {}", nonterminal, lookahead, production);
                    stack.pop();
                    for sym in production.body.iter().rev() {
                        match sym {
                            Symbol::Terminal(name) => {
                                stack.push(StackEntry::Terminal(name.clone()))
                            }
                            Symbol::NonTerminal(name) => {
                                stack.push(StackEntry::NonTerminal(name.clone()))
                            }
                            // Bodies never store epsilon; an epsilon
                            // production is an empty body.
                            Symbol::Epsilon => {}
                        }
                    }
                    trace.push(production.clone());
                }
            }
        }

        match tokens.get(pos) {
            None => Ok(trace),
            Some(token) => Err(ParseError::TrailingInput {
                position: token.position,
            }),
        }
    }
}
